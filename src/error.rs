use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirDigestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output: {path}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read settings: {path}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save settings: {path}")]
    SettingsWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Scan worker failed: {0}")]
    Worker(String),
}

impl DirDigestError {
    /// Process exit code for a run that ended with this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::SettingsRead { .. } | Self::SettingsWrite { .. } => {
                crate::EXIT_CONFIG_ERROR
            }
            Self::Destination { .. } | Self::Io(_) | Self::JsonSerialize(_) | Self::Worker(_) => {
                crate::EXIT_SCAN_FAILED
            }
        }
    }

    pub(crate) fn destination(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Destination {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DirDigestError>;

/// A failure tied to a single file or directory.
///
/// These never abort a run: they are embedded in the artifact at the point
/// where they occurred.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("permission denied: {}", path.display())]
    AccessDenied { path: PathBuf },

    #[error("{reason}")]
    ReadFailure { path: PathBuf, reason: String },
}

impl ItemError {
    /// Classify an I/O error raised while touching `path`.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            Self::AccessDenied { path }
        } else {
            Self::ReadFailure {
                path,
                reason: err.to_string(),
            }
        }
    }

    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::AccessDenied { path } | Self::ReadFailure { path, .. } => path,
        }
    }

    #[must_use]
    pub const fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
