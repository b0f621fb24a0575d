//! Persisted run settings.
//!
//! A flat `key=value` file, one setting per line, remembering the last
//! parameters a user ran with. Unknown keys and malformed lines are ignored
//! so older or hand-edited files still load.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::filesystem::{FileSystem, RealFileSystem};
use super::job::JobRequest;
use crate::error::{DirDigestError, Result};

/// Settings file looked up in the current directory.
pub const LOCAL_SETTINGS_NAME: &str = "file_scanner_config.txt";
const USER_SETTINGS_NAME: &str = "settings.txt";

/// Every key the settings file understands, in the order they are written.
pub const SETTINGS_KEYS: [&str; 11] = [
    "source_folder",
    "output_file",
    "exclude_extensions",
    "exclude_folders",
    "exclude_files",
    "max_file_size",
    "output_format",
    "group_by_type",
    "prioritize_files",
    "include_metadata",
    "ai_friendly",
];

/// Values read from a settings file. `None` means "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub source_folder: Option<String>,
    pub output_file: Option<String>,
    pub exclude_extensions: Option<String>,
    pub exclude_folders: Option<String>,
    pub exclude_files: Option<String>,
    pub max_file_size: Option<u64>,
    pub output_format: Option<String>,
    pub group_by_type: Option<bool>,
    pub prioritize_files: Option<String>,
    pub include_metadata: Option<bool>,
    pub ai_friendly: Option<bool>,
}

impl Settings {
    /// Parse `key=value` lines. Only the first `=` splits a line.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut settings = Self::default();
        for line in content.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            settings.set(key.trim(), value);
        }
        settings
    }

    fn set(&mut self, key: &str, value: &str) {
        let text = || Some(value.to_string());
        match key {
            "source_folder" => self.source_folder = text(),
            "output_file" => self.output_file = text(),
            "exclude_extensions" => self.exclude_extensions = text(),
            "exclude_folders" => self.exclude_folders = text(),
            "exclude_files" => self.exclude_files = text(),
            "max_file_size" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    self.max_file_size = value.parse().ok();
                }
            }
            "output_format" => self.output_format = text(),
            "group_by_type" => self.group_by_type = parse_flag(value),
            "prioritize_files" => self.prioritize_files = text(),
            "include_metadata" => self.include_metadata = parse_flag(value),
            "ai_friendly" => self.ai_friendly = parse_flag(value),
            _ => {}
        }
    }

    /// Snapshot a request so it can be written back.
    #[must_use]
    pub fn from_request(request: &JobRequest) -> Self {
        Self {
            source_folder: Some(request.root.clone()),
            output_file: Some(request.output.clone()),
            exclude_extensions: Some(request.exclude_extensions.clone()),
            exclude_folders: Some(request.exclude_folders.clone()),
            exclude_files: Some(request.exclude_files.clone()),
            max_file_size: request.max_file_size.trim().parse().ok(),
            output_format: Some(request.output_format.clone()),
            group_by_type: Some(request.group_by_extension),
            prioritize_files: Some(request.priority_files.clone()),
            include_metadata: Some(request.include_metadata),
            ai_friendly: Some(request.digest),
        }
    }

    /// Overlay every present value onto `request`.
    pub fn apply_to(&self, request: &mut JobRequest) {
        overlay(&mut request.root, self.source_folder.as_ref());
        overlay(&mut request.output, self.output_file.as_ref());
        overlay(
            &mut request.exclude_extensions,
            self.exclude_extensions.as_ref(),
        );
        overlay(&mut request.exclude_folders, self.exclude_folders.as_ref());
        overlay(&mut request.exclude_files, self.exclude_files.as_ref());
        if let Some(size) = self.max_file_size {
            request.max_file_size = size.to_string();
        }
        overlay(&mut request.output_format, self.output_format.as_ref());
        overlay(&mut request.priority_files, self.prioritize_files.as_ref());
        if let Some(flag) = self.group_by_type {
            request.group_by_extension = flag;
        }
        if let Some(flag) = self.include_metadata {
            request.include_metadata = flag;
        }
        if let Some(flag) = self.ai_friendly {
            request.digest = flag;
        }
    }

    /// Render as `key=value` lines; absent values are skipped.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for key in SETTINGS_KEYS {
            if let Some(value) = self.value_of(key) {
                writeln!(out, "{key}={value}").ok();
            }
        }
        out
    }

    fn value_of(&self, key: &str) -> Option<String> {
        match key {
            "source_folder" => self.source_folder.clone(),
            "output_file" => self.output_file.clone(),
            "exclude_extensions" => self.exclude_extensions.clone(),
            "exclude_folders" => self.exclude_folders.clone(),
            "exclude_files" => self.exclude_files.clone(),
            "max_file_size" => self.max_file_size.map(|size| size.to_string()),
            "output_format" => self.output_format.clone(),
            "group_by_type" => self.group_by_type.map(render_flag),
            "prioritize_files" => self.prioritize_files.clone(),
            "include_metadata" => self.include_metadata.map(render_flag),
            "ai_friendly" => self.ai_friendly.map(render_flag),
            _ => None,
        }
    }
}

fn overlay(target: &mut String, value: Option<&String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn render_flag(flag: bool) -> String {
    if flag { "True" } else { "False" }.to_string()
}

/// Locates, loads and saves the settings file.
///
/// Search order:
/// 1. An explicit path, if one was given
/// 2. `file_scanner_config.txt` in the current directory
/// 3. `settings.txt` in the platform config directory
#[derive(Debug)]
pub struct SettingsStore<F: FileSystem = RealFileSystem> {
    fs: F,
    explicit_path: Option<PathBuf>,
}

impl SettingsStore<RealFileSystem> {
    #[must_use]
    pub const fn new(explicit_path: Option<PathBuf>) -> Self {
        Self {
            fs: RealFileSystem,
            explicit_path,
        }
    }
}

impl<F: FileSystem> SettingsStore<F> {
    #[must_use]
    pub const fn with_fs(fs: F, explicit_path: Option<PathBuf>) -> Self {
        Self { fs, explicit_path }
    }

    fn local_path(&self) -> Option<PathBuf> {
        self.fs
            .current_dir()
            .ok()
            .map(|dir| dir.join(LOCAL_SETTINGS_NAME))
    }

    fn user_path(&self) -> Option<PathBuf> {
        self.fs.config_dir().map(|dir| dir.join(USER_SETTINGS_NAME))
    }

    /// The first existing settings file in search order.
    #[must_use]
    pub fn find(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit_path {
            return self.fs.exists(path).then(|| path.clone());
        }
        [self.local_path(), self.user_path()]
            .into_iter()
            .flatten()
            .find(|path| self.fs.exists(path))
    }

    /// Load settings, or defaults when no file exists.
    ///
    /// # Errors
    /// Returns an error if a settings file exists but cannot be read.
    pub fn load(&self) -> Result<Settings> {
        let Some(path) = self.find() else {
            debug!("no settings file found");
            return Ok(Settings::default());
        };
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| DirDigestError::SettingsRead {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(Settings::parse(&content))
    }

    /// Write settings to the explicit path, else over the file that
    /// [`find`](Self::find) returns, else to the user config directory.
    ///
    /// # Errors
    /// Returns an error if no location is available or the write fails.
    pub fn save(&self, settings: &Settings) -> Result<PathBuf> {
        let path = self
            .explicit_path
            .clone()
            .or_else(|| self.find())
            .or_else(|| self.user_path())
            .or_else(|| self.local_path())
            .ok_or_else(|| {
                DirDigestError::Config("no location available for settings".to_string())
            })?;
        self.write_to(&path, settings)?;
        Ok(path)
    }

    fn write_to(&self, path: &Path, settings: &Settings) -> Result<()> {
        self.fs
            .write(path, &settings.render())
            .map_err(|source| DirDigestError::SettingsWrite {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
