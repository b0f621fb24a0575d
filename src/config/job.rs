use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::error::{DirDigestError, Result};

/// Default depth bound for the structure tree.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default content cap in bytes (0 disables truncation).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50_000;

const DEFAULT_EXCLUDE_EXTENSIONS: &str = ".exe, .dll, .zip, .mp4, .jpg, .jpeg, .png, .gif, .bin";
const DEFAULT_EXCLUDE_FOLDERS: &str = "node_modules, __pycache__, .git, venv, .vscode, build, dist";
const DEFAULT_PRIORITY_FILES: &str = "settings.py, urls.py, models.py, views.py";

/// Which serializer writes the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Structured,
}

impl OutputMode {
    /// The token stored in settings files (`txt` / `json`).
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Structured => "json",
        }
    }

    /// Guess the mode from the artifact's file extension.
    #[must_use]
    pub fn infer_from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Self::Structured } else { Self::Text }
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "json" | "structured" => Ok(Self::Structured),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Raw run parameters exactly as a collaborator supplies them.
///
/// Lists are comma-separated strings and the size is unparsed text; nothing
/// here has been validated yet. See [`ScanJob::from_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub root: String,
    pub output: String,
    pub exclude_extensions: String,
    pub exclude_folders: String,
    pub exclude_files: String,
    pub max_file_size: String,
    /// `txt` | `json`; empty means "infer from the output path".
    pub output_format: String,
    pub group_by_extension: bool,
    pub priority_files: String,
    pub include_metadata: bool,
    pub digest: bool,
    pub max_depth: usize,
}

impl Default for JobRequest {
    fn default() -> Self {
        Self {
            root: String::new(),
            output: String::new(),
            exclude_extensions: DEFAULT_EXCLUDE_EXTENSIONS.to_string(),
            exclude_folders: DEFAULT_EXCLUDE_FOLDERS.to_string(),
            exclude_files: String::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE.to_string(),
            output_format: String::new(),
            group_by_extension: false,
            priority_files: DEFAULT_PRIORITY_FILES.to_string(),
            include_metadata: true,
            digest: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The three independent exclusion rule sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    /// Lower-cased extensions with a leading dot (`.log`).
    pub extensions: HashSet<String>,
    /// Exact directory names.
    pub folders: HashSet<String>,
    /// Exact file names.
    pub files: HashSet<String>,
}

impl ExclusionRules {
    #[must_use]
    pub fn new(extensions: &str, folders: &str, files: &str) -> Self {
        Self {
            extensions: parse_list(extensions)
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            folders: parse_list(folders).into_iter().collect(),
            files: parse_list(files).into_iter().collect(),
        }
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanJob {
    pub root: PathBuf,
    pub output: PathBuf,
    pub exclusions: ExclusionRules,
    /// Content cap in bytes; 0 = unbounded.
    pub max_file_size: u64,
    pub output_mode: OutputMode,
    pub group_by_extension: bool,
    pub include_metadata: bool,
    pub priority_files: Vec<String>,
    pub digest: bool,
    pub max_depth: usize,
}

impl ScanJob {
    /// Validate a raw request and turn it into a job.
    ///
    /// # Errors
    /// Returns [`DirDigestError::Config`] if the root is missing or not a
    /// directory, the output path is empty, the size is not a non-negative
    /// integer, or the format is unknown.
    pub fn from_request(request: &JobRequest) -> Result<Self> {
        let root = request.root.trim();
        if root.is_empty() {
            return Err(DirDigestError::Config(
                "a source folder is required".to_string(),
            ));
        }
        let root = PathBuf::from(root);
        if !root.is_dir() {
            return Err(DirDigestError::Config(format!(
                "source folder is not a directory: {}",
                root.display()
            )));
        }

        let output = request.output.trim();
        if output.is_empty() {
            return Err(DirDigestError::Config(
                "an output file is required".to_string(),
            ));
        }
        let output = PathBuf::from(output);

        let max_file_size = parse_max_file_size(&request.max_file_size)?;
        let output_mode = if request.output_format.trim().is_empty() {
            OutputMode::infer_from_path(&output)
        } else {
            request
                .output_format
                .parse()
                .map_err(DirDigestError::Config)?
        };

        Ok(Self {
            root,
            output,
            exclusions: ExclusionRules::new(
                &request.exclude_extensions,
                &request.exclude_folders,
                &request.exclude_files,
            ),
            max_file_size,
            output_mode,
            group_by_extension: request.group_by_extension,
            include_metadata: request.include_metadata,
            priority_files: parse_list(&request.priority_files),
            digest: request.digest,
            max_depth: request.max_depth,
        })
    }

    /// Display name of the scanned project: the root's final component.
    #[must_use]
    pub fn project_name(&self) -> String {
        project_name(&self.root)
    }
}

/// Final path component of `root`, resolving `.`-style roots first.
#[must_use]
pub fn project_name(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().into_owned();
    }
    dunce::canonicalize(root)
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

/// Split a comma-separated list, trimming items and dropping empties and
/// duplicates while keeping first-occurrence order.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// `LOG` / `log` / `.Log` all become `.log`.
#[must_use]
pub fn normalize_extension(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

fn parse_max_file_size(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u64>().map_err(|_| {
        DirDigestError::Config(format!(
            "invalid max file size '{trimmed}': expected a non-negative integer"
        ))
    })
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
