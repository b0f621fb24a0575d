use std::path::PathBuf;

use crate::error::ItemError;
use crate::output::StructureLine;

use super::{FileRecord, ScanEntry};

/// What every dump starts with; known before the content pass begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub project_name: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub scan_date: String,
    pub structure: Vec<StructureLine>,
    pub readme: Option<Result<String, ItemError>>,
}

/// A header plus every content-pass event, for formats that need them all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub header: ReportHeader,
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            ScanEntry::File(record) => Some(record),
            _ => None,
        })
    }

    /// Unreadable files and directories embedded in the report.
    #[must_use]
    pub fn inline_errors(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| match entry {
                ScanEntry::File(record) => record.is_error(),
                ScanEntry::DirectoryError { .. } => true,
                ScanEntry::Directory { .. } => false,
            })
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Success,
    /// The artifact was written but some items were recorded as errors.
    PartialSuccess,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub output: PathBuf,
    pub total: u64,
    pub processed: u64,
    /// Files written to the artifact (all admitted files for a dump, key files for a digest).
    pub files: usize,
    pub inline_errors: usize,
}

impl ScanOutcome {
    #[must_use]
    pub const fn status(&self) -> ScanStatus {
        if self.inline_errors == 0 {
            ScanStatus::Success
        } else {
            ScanStatus::PartialSuccess
        }
    }
}
