use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_MAX_DEPTH, JobRequest, OutputMode};

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatChoice {
    /// Plain text dump
    Txt,
    /// Structured JSON record
    Json,
}

impl From<FormatChoice> for OutputMode {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Txt => Self::Text,
            FormatChoice::Json => Self::Structured,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dirdigest")]
#[command(author, version, about = "Dump or digest a directory tree into a single artifact")]
#[command(long_about = "Walks a directory tree and writes one consolidated artifact: \
    the project structure plus file contents (text or JSON), or a condensed digest.\n\n\
    Exit codes:\n  \
    0 - Artifact written (possibly with unreadable items recorded inline)\n  \
    1 - Scan failed (destination could not be written)\n  \
    2 - Configuration error")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress and summary output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory and write the artifact
    Scan(ScanArgs),

    /// Print the structure tree of a directory
    Tree(TreeArgs),
}

/// Exclusion lists shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ExclusionArgs {
    /// Extensions to skip (comma-separated, e.g. ".log,.tmp")
    #[arg(long, value_name = "LIST")]
    pub exclude_ext: Option<String>,

    /// Directory names to skip (comma-separated)
    #[arg(long, value_name = "LIST")]
    pub exclude_dir: Option<String>,

    /// Exact file names to skip (comma-separated)
    #[arg(long, value_name = "LIST")]
    pub exclude_file: Option<String>,
}

impl ExclusionArgs {
    pub fn apply_to(&self, request: &mut JobRequest) {
        if let Some(extensions) = &self.exclude_ext {
            request.exclude_extensions.clone_from(extensions);
        }
        if let Some(folders) = &self.exclude_dir {
            request.exclude_folders.clone_from(folders);
        }
        if let Some(files) = &self.exclude_file {
            request.exclude_files.clone_from(files);
        }
    }
}

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScanArgs {
    /// Directory to scan (falls back to the saved settings)
    pub root: Option<PathBuf>,

    /// Artifact to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Artifact format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatChoice>,

    #[command(flatten)]
    pub exclusions: ExclusionArgs,

    /// Maximum bytes of content per file (0 = unbounded)
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<String>,

    /// Group file bodies by extension
    #[arg(long)]
    pub group_by_type: bool,

    /// File names to emit first (comma-separated, order kept)
    #[arg(long, value_name = "LIST")]
    pub priority: Option<String>,

    /// Omit size/type/modification lines
    #[arg(long)]
    pub no_metadata: bool,

    /// Write a condensed digest instead of a full dump
    #[arg(long)]
    pub digest: bool,

    /// Depth bound for the structure tree
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Settings file to load (and save with --save-settings)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Skip loading saved settings
    #[arg(long)]
    pub no_settings: bool,

    /// Save the effective settings after validation
    #[arg(long)]
    pub save_settings: bool,
}

impl ScanArgs {
    /// Overlay the flags that were given on top of `request`.
    pub fn apply_to(&self, request: &mut JobRequest) {
        if let Some(root) = &self.root {
            request.root = root.display().to_string();
        }
        if let Some(output) = &self.output {
            request.output = output.display().to_string();
        }
        if let Some(format) = self.format {
            request.output_format = OutputMode::from(format).as_token().to_string();
        }
        self.exclusions.apply_to(request);
        if let Some(size) = &self.max_file_size {
            request.max_file_size.clone_from(size);
        }
        if self.group_by_type {
            request.group_by_extension = true;
        }
        if let Some(priority) = &self.priority {
            request.priority_files.clone_from(priority);
        }
        if self.no_metadata {
            request.include_metadata = false;
        }
        if self.digest {
            request.digest = true;
        }
        if let Some(depth) = self.max_depth {
            request.max_depth = depth;
        }
    }
}

#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Directory to render
    #[arg(default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub exclusions: ExclusionArgs,

    /// Depth bound for the structure tree
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
