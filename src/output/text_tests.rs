use std::path::PathBuf;

use super::*;
use crate::analyzer::Symbols;
use crate::scan::{FileContent, ReportHeader};

fn record(path: &str, language: &str, text: &str, depth: usize) -> FileRecord {
    let path = PathBuf::from(path);
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let extension = crate::scanner::dotted_extension(&name);
    FileRecord {
        path,
        name,
        extension,
        language: language.to_string(),
        depth,
        size: text.len() as u64,
        modified: None,
        body: Ok(FileContent::new(text.to_string(), 0)),
        symbols: Symbols::default(),
    }
}

fn report(entries: Vec<ScanEntry>) -> ScanReport {
    ScanReport {
        header: ReportHeader {
            project_name: "demo".to_string(),
            scan_date: "2026-10-16 12:00:00".to_string(),
            structure: Vec::new(),
            readme: None,
        },
        entries,
    }
}

fn dir(name: &str, depth: usize) -> ScanEntry {
    ScanEntry::Directory {
        path: PathBuf::from(name),
        name: name.to_string(),
        depth,
    }
}

#[test]
fn header_contains_project_and_date() {
    let output = TextFormatter::new().format(&report(Vec::new())).unwrap();

    let rule = "=".repeat(80);
    assert!(output.starts_with(&format!(
        "{rule}\nПРОЕКТ: demo\nДАТА СКАНИРОВАНИЯ: 2026-10-16 12:00:00\n{rule}\n\n"
    )));
    assert!(output.contains(&format!("СТРУКТУРА ПРОЕКТА:\n{rule}\n")));
    assert!(output.ends_with(&format!("СОДЕРЖИМОЕ ФАЙЛОВ:\n{rule}\n\n")));
}

#[test]
fn readme_block_and_read_error() {
    let mut with_readme = report(Vec::new());
    with_readme.header.readme = Some(Ok("# Hello".to_string()));
    let output = TextFormatter::new().format(&with_readme).unwrap();
    assert!(output.contains(&format!("README:\n{}\n# Hello\n\n", "=".repeat(80))));

    let mut broken = report(Vec::new());
    broken.header.readme = Some(Err(ItemError::ReadFailure {
        path: PathBuf::from("README.md"),
        reason: "bad bytes".to_string(),
    }));
    let output = TextFormatter::new().format(&broken).unwrap();
    assert!(output.contains("[Ошибка чтения README: bad bytes]\n\n"));
}

#[test]
fn recognized_language_is_fenced_with_symbols() {
    let mut file = record("/p/app.py", "python", "class A:\n    pass", 1);
    file.symbols = Symbols {
        functions: vec!["run".to_string()],
        classes: vec!["A".to_string()],
        docstring: "Docs.".to_string(),
    };

    let output = TextFormatter::new()
        .format(&report(vec![ScanEntry::File(file)]))
        .unwrap();

    assert!(output.contains("📄 app.py\n"));
    assert!(output.contains("ФАЙЛ: /p/app.py\n"));
    assert!(output.contains("СОДЕРЖИТ:\nКлассы: A\nФункции: run\n\n"));
    assert!(output.contains("ДОКУМЕНТАЦИЯ:\nDocs.\n\n"));
    assert!(output.contains("```python\nclass A:\n    pass\n```\n\n"));
}

#[test]
fn plain_text_is_written_raw() {
    let output = TextFormatter::new()
        .format(&report(vec![ScanEntry::File(record(
            "/p/notes.txt",
            "text",
            "just notes",
            1,
        ))]))
        .unwrap();

    assert!(output.contains(&format!("{}\njust notes\n\n", "=".repeat(80))));
    assert!(!output.contains("```"));
}

#[test]
fn truncated_file_gets_notice_instead_of_fence() {
    let mut file = record("/p/a.py", "python", "", 1);
    file.body = Ok(FileContent::new("a".repeat(30), 20));

    let output = TextFormatter::new()
        .format(&report(vec![ScanEntry::File(file)]))
        .unwrap();

    assert!(output.contains(&format!(
        "{}\n\n... (файл усечен, показано 20 из 30 байт)\n",
        "a".repeat(20)
    )));
    assert!(!output.contains("```python"));
}

#[test]
fn metadata_block_when_enabled() {
    let file = record("/p/b.txt", "text", "0123456789", 1);

    let output = TextFormatter::new()
        .with_metadata(true)
        .format(&report(vec![ScanEntry::File(file)]))
        .unwrap();

    assert!(output.contains("РАЗМЕР: 10 байт\nТИП: text\nПОСЛЕДНЕЕ ИЗМЕНЕНИЕ: неизвестно\n"));
    assert!(output.contains(&format!("{}\n\n0123456789", "-".repeat(80))));
}

#[test]
fn read_error_placeholder() {
    let mut file = record("/p/blob.txt", "text", "", 1);
    file.body = Err(ItemError::ReadFailure {
        path: PathBuf::from("/p/blob.txt"),
        reason: "invalid utf-8".to_string(),
    });

    let output = TextFormatter::new()
        .format(&report(vec![ScanEntry::File(file)]))
        .unwrap();

    assert!(output.contains("[Ошибка чтения файла: invalid utf-8]\n\n"));
}

#[test]
fn directories_and_files_are_indented_by_depth() {
    let output = TextFormatter::new()
        .format(&report(vec![
            dir("src", 1),
            ScanEntry::File(record("/p/src/lib.rs", "rust", "", 2)),
            dir("deep", 2),
        ]))
        .unwrap();

    assert!(output.contains("📂 src/\n"));
    assert!(output.contains("    📄 lib.rs\n"));
    assert!(output.contains("    📂 deep/\n"));
}

#[test]
fn priority_file_comes_first_and_only_once() {
    let entries = vec![
        ScanEntry::File(record("/p/a.txt", "text", "AAA", 1)),
        dir("pkg", 1),
        ScanEntry::File(record("/p/pkg/main.py", "python", "MAIN", 2)),
        ScanEntry::File(record("/p/z.txt", "text", "ZZZ", 1)),
    ];

    let output = TextFormatter::new()
        .with_priority_files(vec!["main.py".to_string()])
        .format(&report(entries))
        .unwrap();

    let priority = output.find("ПРИОРИТЕТНЫЙ ФАЙЛ: /p/pkg/main.py").unwrap();
    let ordinary = output.find("AAA").unwrap();
    assert!(priority < ordinary);
    assert_eq!(output.matches("MAIN").count(), 1);
    assert!(!output.contains("📄 main.py"));
}

#[test]
fn priority_name_selects_first_match_only() {
    let entries = vec![
        ScanEntry::File(record("/p/a/main.py", "python", "FIRST", 2)),
        ScanEntry::File(record("/p/b/main.py", "python", "SECOND", 2)),
    ];

    let output = TextFormatter::new()
        .with_priority_files(vec!["main.py".to_string(), "missing.py".to_string()])
        .format(&report(entries))
        .unwrap();

    assert_eq!(output.matches("ПРИОРИТЕТНЫЙ ФАЙЛ").count(), 1);
    assert!(output.contains("ПРИОРИТЕТНЫЙ ФАЙЛ: /p/a/main.py"));
    assert!(output.contains("📄 main.py"));
    assert_eq!(output.matches("SECOND").count(), 1);
}

#[test]
fn grouping_uses_first_seen_extension_order() {
    let entries = vec![
        ScanEntry::File(record("/p/b.txt", "text", "B", 1)),
        ScanEntry::File(record("/p/a.py", "python", "A", 1)),
        ScanEntry::File(record("/p/c.txt", "text", "C", 1)),
    ];

    let output = TextFormatter::new()
        .with_grouping(true)
        .format(&report(entries))
        .unwrap();

    let txt = output.find("ФАЙЛЫ ТИПА: .txt (text)").unwrap();
    let py = output.find("ФАЙЛЫ ТИПА: .py (python)").unwrap();
    assert!(txt < py);
    let b = output.find("ФАЙЛ: /p/b.txt").unwrap();
    let c = output.find("ФАЙЛ: /p/c.txt").unwrap();
    assert!(b < c && c < py);
    assert!(!output.contains("📄"));
}

#[test]
fn priority_files_are_left_out_of_their_groups() {
    let entries = vec![
        ScanEntry::File(record("/p/lib.rs", "rust", "LIB", 1)),
        ScanEntry::File(record("/p/main.py", "python", "MAIN", 1)),
        ScanEntry::File(record("/p/notes.txt", "text", "NOTES", 1)),
        ScanEntry::File(record("/p/util.py", "python", "UTIL", 1)),
    ];

    let output = TextFormatter::new()
        .with_grouping(true)
        .with_priority_files(vec!["main.py".to_string(), "lib.rs".to_string()])
        .format(&report(entries))
        .unwrap();

    let main = output.find("ПРИОРИТЕТНЫЙ ФАЙЛ: /p/main.py").unwrap();
    let lib = output.find("ПРИОРИТЕТНЫЙ ФАЙЛ: /p/lib.rs").unwrap();
    let txt = output.find("ФАЙЛЫ ТИПА: .txt (text)").unwrap();
    let py = output.find("ФАЙЛЫ ТИПА: .py (python)").unwrap();
    assert!(main < lib && lib < txt && txt < py);

    let py_group = &output[py..];
    assert!(py_group.contains("ФАЙЛ: /p/util.py"));
    assert!(!py_group.contains("main.py"));
    assert!(!output.contains("ФАЙЛЫ ТИПА: .rs"));
    assert_eq!(output.matches("MAIN").count(), 1);
    assert_eq!(output.matches("LIB").count(), 1);
}

#[test]
fn directory_errors_render_inline() {
    let entries = vec![
        ScanEntry::DirectoryError {
            error: ItemError::AccessDenied {
                path: PathBuf::from("/p/locked"),
            },
            depth: 1,
        },
        ScanEntry::DirectoryError {
            error: ItemError::ReadFailure {
                path: PathBuf::from("/p/odd"),
                reason: "boom".to_string(),
            },
            depth: 0,
        },
    ];

    let output = TextFormatter::new().format(&report(entries)).unwrap();

    assert!(output.contains("    [Ошибка доступа к папке: /p/locked]\n\n"));
    assert!(output.contains("[Ошибка обработки папки /p/odd: boom]\n\n"));
}

#[test]
fn pieces_concatenate_to_the_full_dump() {
    let file = record("/p/src/a.txt", "text", "A", 2);
    let entries = vec![dir("src", 1), ScanEntry::File(file.clone())];
    let report = report(entries.clone());
    let formatter = TextFormatter::new().with_metadata(true);

    let mut pieces = TextFormatter::header(&report.header);
    for entry in &entries {
        pieces.push_str(&formatter.entry(entry));
    }

    assert_eq!(pieces, formatter.format(&report).unwrap());
    assert!(formatter.entry(&ScanEntry::File(file)).starts_with("    📄 a.txt\n"));
}

#[test]
fn priority_section_frames_the_file() {
    let section = TextFormatter::new().priority_section(&record("/p/main.py", "python", "M", 1));

    let rule = "-".repeat(40);
    assert!(section.starts_with(&format!("\n{rule}\nПРИОРИТЕТНЫЙ ФАЙЛ: /p/main.py\n{rule}\n\n")));
    assert!(section.contains("ФАЙЛ: /p/main.py\n"));
    assert!(!section.contains("📄"));
}
