use std::io;

use serde::Serialize;

use crate::error::{ItemError, Result};
use crate::scan::{FileRecord, ScanEntry, ScanReport};

use super::OutputFormatter;

/// Machine-readable project dump.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    project_name: &'a str,
    scan_date: &'a str,
    structure: Vec<String>,
    files: Vec<JsonEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    readme: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonEntry<'a> {
    File(JsonFile<'a>),
    DirectoryError { path: String, error: String },
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    name: &'a str,
    extension: &'a str,
    language: &'a str,
    size: u64,
    modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classes: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    docstring: Option<&'a str>,
}

impl JsonFormatter {
    /// Serialize the report straight into `writer`.
    ///
    /// # Errors
    /// Returns the writer's I/O error.
    pub fn write_to<W: io::Write>(&self, report: &ScanReport, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &document(report)).map_err(io::Error::from)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(&document(report))?)
    }
}

fn document(report: &ScanReport) -> JsonOutput<'_> {
    let header = &report.header;
    JsonOutput {
        project_name: &header.project_name,
        scan_date: &header.scan_date,
        structure: header.structure.iter().map(ToString::to_string).collect(),
        files: report.entries.iter().filter_map(convert_entry).collect(),
        readme: header.readme.as_ref().map(|readme| match readme {
            Ok(text) => text.clone(),
            Err(_) => "[Ошибка чтения README]".to_string(),
        }),
    }
}

fn convert_entry(entry: &ScanEntry) -> Option<JsonEntry<'_>> {
    match entry {
        ScanEntry::Directory { .. } => None,
        ScanEntry::File(record) => Some(JsonEntry::File(convert_file(record))),
        ScanEntry::DirectoryError { error, .. } => Some(JsonEntry::DirectoryError {
            path: error.path().display().to_string(),
            error: directory_error_message(error),
        }),
    }
}

fn convert_file(record: &FileRecord) -> JsonFile<'_> {
    let (content, truncated, original_size, error) = match &record.body {
        Ok(body) => (
            Some(body.text.as_str()),
            Some(body.truncated),
            body.truncated.then_some(body.original_size),
            None,
        ),
        Err(err) => (None, None, None, Some(err.to_string())),
    };

    JsonFile {
        path: record.path.display().to_string(),
        name: &record.name,
        extension: &record.extension,
        language: &record.language,
        size: record.size,
        modified: record.modified_display(),
        content,
        truncated,
        original_size,
        error,
        functions: non_empty(&record.symbols.functions),
        classes: non_empty(&record.symbols.classes),
        docstring: Some(record.symbols.docstring.as_str()).filter(|doc| !doc.is_empty()),
    }
}

fn non_empty(items: &[String]) -> Option<&[String]> {
    (!items.is_empty()).then_some(items)
}

fn directory_error_message(error: &ItemError) -> String {
    match error {
        ItemError::AccessDenied { path } => {
            format!("Ошибка доступа к папке: {}", path.display())
        }
        ItemError::ReadFailure { path, reason } => {
            format!("Ошибка обработки папки {}: {reason}", path.display())
        }
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
