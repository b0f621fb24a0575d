use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::warn;

use crate::analyzer::{ExtractorRegistry, Symbols};
use crate::error::ItemError;
use crate::language::LanguageRegistry;
use crate::scanner::{WalkEntry, dotted_extension};

/// `ctime`-style layout used for modification times.
pub const MODIFIED_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Text of one file as it will be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub text: String,
    pub truncated: bool,
    /// Byte length before truncation.
    pub original_size: u64,
}

impl FileContent {
    /// Cap `text` at `max_size` bytes (0 means no cap).
    ///
    /// The cut backs off to the nearest UTF-8 character boundary, so the kept
    /// text can be up to three bytes shorter than `max_size` when a
    /// multi-byte character straddles the limit. ASCII text keeps exactly
    /// `max_size` bytes.
    #[must_use]
    pub fn new(mut text: String, max_size: u64) -> Self {
        let original_size = text.len() as u64;
        let limit = usize::try_from(max_size).unwrap_or(usize::MAX);
        if max_size == 0 || text.len() <= limit {
            return Self {
                text,
                truncated: false,
                original_size,
            };
        }

        let mut end = limit;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        Self {
            text,
            truncated: true,
            original_size,
        }
    }

    #[must_use]
    pub fn shown_size(&self) -> usize {
        self.text.len()
    }
}

/// Everything collected about one admitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    /// Dotted lower-case extension, or empty.
    pub extension: String,
    pub language: String,
    pub depth: usize,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub body: Result<FileContent, ItemError>,
    pub symbols: Symbols,
}

impl FileRecord {
    #[must_use]
    pub fn modified_display(&self) -> Option<String> {
        self.modified
            .map(|time| time.format(MODIFIED_FORMAT).to_string())
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.body.is_err()
    }
}

/// One event of the content pass, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    Directory { path: PathBuf, name: String, depth: usize },
    File(FileRecord),
    /// A directory that could not be listed; `depth` is the directory's own.
    DirectoryError { error: ItemError, depth: usize },
}

/// Reads admitted files into [`FileRecord`]s.
pub struct FileReader<'a> {
    max_size: u64,
    languages: &'a LanguageRegistry,
    extractors: &'a ExtractorRegistry,
}

impl<'a> FileReader<'a> {
    #[must_use]
    pub const fn new(
        max_size: u64,
        languages: &'a LanguageRegistry,
        extractors: &'a ExtractorRegistry,
    ) -> Self {
        Self {
            max_size,
            languages,
            extractors,
        }
    }

    #[must_use]
    pub const fn extractors(&self) -> &ExtractorRegistry {
        self.extractors
    }

    /// Build the record for a walked file. Failures end up in `body`.
    #[must_use]
    pub fn read(&self, entry: &WalkEntry) -> FileRecord {
        let extension = dotted_extension(&entry.name);
        let language = self.languages.tag_for(&extension).to_string();

        let metadata = fs::metadata(&entry.path);
        let (size, modified) = metadata.as_ref().map_or((0, None), |meta| {
            (meta.len(), meta.modified().ok().map(DateTime::<Local>::from))
        });

        let text = match metadata {
            Ok(_) => read_text(&entry.path),
            Err(err) => Err(ItemError::from_io(&entry.path, &err)),
        };
        if let Err(error) = &text {
            warn!(path = %entry.path.display(), %error, "failed to read file");
        }

        let symbols = text
            .as_ref()
            .map(|text| self.extractors.extract(text, &language))
            .unwrap_or_default();
        let body = text.map(|text| FileContent::new(text, self.max_size));

        FileRecord {
            path: entry.path.clone(),
            name: entry.name.clone(),
            extension,
            language,
            depth: entry.depth,
            size,
            modified,
            body,
            symbols,
        }
    }
}

/// Read a whole file as UTF-8.
///
/// # Errors
/// Returns [`ItemError::AccessDenied`] on permission errors and
/// [`ItemError::ReadFailure`] for any other I/O error or invalid UTF-8.
pub fn read_text(path: &Path) -> Result<String, ItemError> {
    let bytes = fs::read(path).map_err(|err| ItemError::from_io(path, &err))?;
    String::from_utf8(bytes).map_err(|err| ItemError::ReadFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
