use std::path::{Path, PathBuf};

use crate::config::ExclusionRules;

/// Decides whether a directory entry takes part in a scan.
pub trait ItemFilter {
    fn should_include(&self, path: &Path, is_dir: bool) -> bool;
}

/// Lower-cased extension of `name` with a leading dot, or `""`.
///
/// Dot-files (`.gitignore`) and names without a dot have no extension.
#[must_use]
pub fn dotted_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Name-based exclusion from three independent rule sets.
///
/// Directories are matched only by exact name; files by exact name or by
/// lower-cased extension.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    rules: ExclusionRules,
    skipped_file: Option<PathBuf>,
}

impl ExclusionFilter {
    #[must_use]
    pub const fn new(rules: ExclusionRules) -> Self {
        Self {
            rules,
            skipped_file: None,
        }
    }

    /// Also leave out one concrete file, e.g. the artifact being written.
    ///
    /// `path` should be canonical; candidates sharing its file name are
    /// canonicalized before comparing.
    #[must_use]
    pub fn with_skipped_file(mut self, path: Option<PathBuf>) -> Self {
        self.skipped_file = path;
        self
    }

    #[must_use]
    pub fn include(&self, name: &str, extension: &str, is_dir: bool) -> bool {
        if is_dir {
            return !self.rules.folders.contains(name);
        }
        !self.rules.files.contains(name) && !self.rules.extensions.contains(extension)
    }

    fn is_skipped_file(&self, path: &Path) -> bool {
        let Some(skipped) = &self.skipped_file else {
            return false;
        };
        if path.file_name() != skipped.file_name() {
            return false;
        }
        dunce::canonicalize(path).is_ok_and(|abs| &abs == skipped)
    }
}

impl ItemFilter for ExclusionFilter {
    fn should_include(&self, path: &Path, is_dir: bool) -> bool {
        let Some(name) = path.file_name() else {
            return true;
        };
        let name = name.to_string_lossy();
        self.include(&name, &dotted_extension(&name), is_dir)
            && (is_dir || !self.is_skipped_file(path))
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
