use std::path::PathBuf;

use serde_json::Value;

use super::*;
use crate::analyzer::Symbols;
use crate::scan::{FileContent, ReportHeader};

fn record(name: &str, text: &str, max_size: u64) -> FileRecord {
    FileRecord {
        path: PathBuf::from(format!("/p/{name}")),
        name: name.to_string(),
        extension: crate::scanner::dotted_extension(name),
        language: "python".to_string(),
        depth: 1,
        size: text.len() as u64,
        modified: None,
        body: Ok(FileContent::new(text.to_string(), max_size)),
        symbols: Symbols::default(),
    }
}

fn report(
    project_name: &str,
    readme: Option<std::result::Result<String, ItemError>>,
    entries: Vec<ScanEntry>,
) -> ScanReport {
    ScanReport {
        header: ReportHeader {
            project_name: project_name.to_string(),
            scan_date: "2026-10-16 12:00:00".to_string(),
            structure: Vec::new(),
            readme,
        },
        entries,
    }
}

fn format(entries: Vec<ScanEntry>, readme: Option<std::result::Result<String, ItemError>>) -> Value {
    let report = report("демо", readme, entries);
    let json = JsonFormatter.format(&report).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn top_level_fields_in_order() {
    let report = report("p", Some(Ok("hi".to_string())), Vec::new());
    let json = JsonFormatter.format(&report).unwrap();

    let positions: Vec<usize> = ["project_name", "scan_date", "structure", "files", "readme"]
        .iter()
        .map(|key| json.find(&format!("\"{key}\"")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn non_ascii_is_kept_verbatim() {
    let report = report("проект", None, Vec::new());
    let json = JsonFormatter.format(&report).unwrap();
    assert!(json.contains("\"проект\""));
}

#[test]
fn readme_omitted_when_absent_and_placeholder_on_error() {
    let value = format(Vec::new(), None);
    assert!(value.get("readme").is_none());

    let value = format(
        Vec::new(),
        Some(Err(ItemError::ReadFailure {
            path: PathBuf::from("/p/README"),
            reason: "x".to_string(),
        })),
    );
    assert_eq!(value["readme"], "[Ошибка чтения README]");
}

#[test]
fn untruncated_record_fields() {
    let value = format(vec![ScanEntry::File(record("b.py", "0123456789", 20))], None);
    let file = &value["files"][0];

    assert_eq!(file["path"], "/p/b.py");
    assert_eq!(file["name"], "b.py");
    assert_eq!(file["extension"], ".py");
    assert_eq!(file["language"], "python");
    assert_eq!(file["size"], 10);
    assert!(file["modified"].is_null());
    assert_eq!(file["content"], "0123456789");
    assert_eq!(file["truncated"], false);
    assert!(file.get("original_size").is_none());
    assert!(file.get("error").is_none());
    assert!(file.get("functions").is_none());
}

#[test]
fn truncated_record_carries_original_size() {
    let value = format(vec![ScanEntry::File(record("a.py", &"x".repeat(30), 20))], None);
    let file = &value["files"][0];

    assert_eq!(file["content"].as_str().unwrap().len(), 20);
    assert_eq!(file["truncated"], true);
    assert_eq!(file["original_size"], 30);
}

#[test]
fn symbols_included_when_present() {
    let mut file = record("m.py", "def f(): pass", 0);
    file.symbols = Symbols {
        functions: vec!["f".to_string()],
        classes: Vec::new(),
        docstring: "Doc".to_string(),
    };

    let value = format(vec![ScanEntry::File(file)], None);
    let file = &value["files"][0];

    assert_eq!(file["functions"], serde_json::json!(["f"]));
    assert!(file.get("classes").is_none());
    assert_eq!(file["docstring"], "Doc");
}

#[test]
fn read_error_replaces_content() {
    let mut file = record("blob.py", "", 0);
    file.body = Err(ItemError::AccessDenied {
        path: PathBuf::from("/p/blob.py"),
    });

    let value = format(vec![ScanEntry::File(file)], None);
    let file = &value["files"][0];

    assert!(file.get("content").is_none());
    assert!(file.get("truncated").is_none());
    assert_eq!(file["error"], "permission denied: /p/blob.py");
}

#[test]
fn directories_are_skipped_and_directory_errors_become_records() {
    let entries = vec![
        ScanEntry::Directory {
            path: PathBuf::from("/p/src"),
            name: "src".to_string(),
            depth: 1,
        },
        ScanEntry::DirectoryError {
            error: ItemError::AccessDenied {
                path: PathBuf::from("/p/locked"),
            },
            depth: 1,
        },
    ];

    let value = format(entries, None);
    let files = value["files"].as_array().unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["path"], "/p/locked");
    assert_eq!(files[0]["error"], "Ошибка доступа к папке: /p/locked");
}

#[test]
fn write_to_matches_format() {
    let report = report("p", None, vec![ScanEntry::File(record("a.py", "x = 1", 0))]);

    let mut buffer = Vec::new();
    JsonFormatter.write_to(&report, &mut buffer).unwrap();

    assert_eq!(String::from_utf8(buffer).unwrap(), JsonFormatter.format(&report).unwrap());
}
