use std::collections::HashSet;
use std::fmt::Write;

use indexmap::IndexMap;

use crate::error::{ItemError, Result};
use crate::language::PLAIN_TEXT;
use crate::scan::{FileRecord, ReportHeader, ScanEntry, ScanReport};

use super::{OutputFormatter, join_lines};

const RULE_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;
const LEVEL_INDENT: &str = "    ";

/// Human-readable project dump.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    group_by_extension: bool,
    include_metadata: bool,
    priority_files: Vec<String>,
}

impl TextFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group_by_extension: false,
            include_metadata: false,
            priority_files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_grouping(mut self, group_by_extension: bool) -> Self {
        self.group_by_extension = group_by_extension;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, include_metadata: bool) -> Self {
        self.include_metadata = include_metadata;
        self
    }

    #[must_use]
    pub fn with_priority_files(mut self, names: Vec<String>) -> Self {
        self.priority_files = names;
        self
    }

    /// Everything before the first file: header, README and structure.
    #[must_use]
    pub fn header(header: &ReportHeader) -> String {
        let mut output = String::new();
        Self::write_header(&mut output, header);
        output
    }

    /// A priority file in its own framed section.
    #[must_use]
    pub fn priority_section(&self, record: &FileRecord) -> String {
        let mut output = String::new();
        Self::write_section(
            &mut output,
            &format!("ПРИОРИТЕТНЫЙ ФАЙЛ: {}", record.path.display()),
        );
        self.write_file(&mut output, record);
        output
    }

    /// One traversal event of the ungrouped body.
    #[must_use]
    pub fn entry(&self, entry: &ScanEntry) -> String {
        let mut output = String::new();
        self.write_entry(&mut output, entry);
        output
    }

    /// Indices (into `files`) of the first unselected match per priority name.
    fn select_priority(&self, files: &[&FileRecord]) -> Vec<usize> {
        let mut selected: Vec<usize> = Vec::new();
        for name in &self.priority_files {
            if let Some(idx) =
                (0..files.len()).find(|&idx| files[idx].name == *name && !selected.contains(&idx))
            {
                selected.push(idx);
            }
        }
        selected
    }

    fn write_header(output: &mut String, header: &ReportHeader) {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(output, "{rule}").ok();
        writeln!(output, "ПРОЕКТ: {}", header.project_name).ok();
        writeln!(output, "ДАТА СКАНИРОВАНИЯ: {}", header.scan_date).ok();
        writeln!(output, "{rule}\n").ok();

        match &header.readme {
            Some(Ok(readme)) => {
                writeln!(output, "README:\n{rule}").ok();
                writeln!(output, "{readme}\n\n{rule}\n").ok();
            }
            Some(Err(error)) => {
                writeln!(output, "[Ошибка чтения README: {error}]\n").ok();
            }
            None => {}
        }

        writeln!(output, "СТРУКТУРА ПРОЕКТА:\n{rule}").ok();
        writeln!(output, "{}\n", join_lines(&header.structure)).ok();
        writeln!(output, "{rule}\n").ok();

        writeln!(output, "СОДЕРЖИМОЕ ФАЙЛОВ:\n{rule}\n").ok();
    }

    fn write_section(output: &mut String, title: &str) {
        let rule = "-".repeat(SECTION_WIDTH);
        write!(output, "\n{rule}\n{title}\n{rule}\n\n").ok();
    }

    fn write_file(&self, output: &mut String, record: &FileRecord) {
        let rule = "=".repeat(RULE_WIDTH);
        write!(output, "\n{rule}\nФАЙЛ: {}\n{rule}\n", record.path.display()).ok();

        if self.include_metadata {
            writeln!(output, "РАЗМЕР: {} байт", record.size).ok();
            writeln!(output, "ТИП: {}", record.language).ok();
            let modified = record
                .modified_display()
                .unwrap_or_else(|| "неизвестно".to_string());
            writeln!(output, "ПОСЛЕДНЕЕ ИЗМЕНЕНИЕ: {modified}").ok();
            writeln!(output, "{}\n", "-".repeat(RULE_WIDTH)).ok();
        }

        let content = match &record.body {
            Ok(content) => content,
            Err(error) => {
                writeln!(output, "[Ошибка чтения файла: {error}]\n").ok();
                return;
            }
        };

        let recognized = record.language != PLAIN_TEXT;
        if recognized {
            let symbols = &record.symbols;
            if symbols.has_definitions() {
                writeln!(output, "СОДЕРЖИТ:").ok();
                if !symbols.classes.is_empty() {
                    writeln!(output, "Классы: {}", symbols.classes.join(", ")).ok();
                }
                if !symbols.functions.is_empty() {
                    writeln!(output, "Функции: {}", symbols.functions.join(", ")).ok();
                }
                writeln!(output).ok();
            }
            if !symbols.docstring.is_empty() {
                writeln!(output, "ДОКУМЕНТАЦИЯ:\n{}\n", symbols.docstring).ok();
            }
        }

        if content.truncated {
            writeln!(
                output,
                "{}\n\n... (файл усечен, показано {} из {} байт)",
                content.text,
                content.shown_size(),
                content.original_size
            )
            .ok();
        } else if recognized {
            writeln!(output, "```{}\n{}\n```\n", record.language, content.text).ok();
        } else {
            writeln!(output, "{}\n", content.text).ok();
        }
    }

    fn write_directory_error(output: &mut String, error: &ItemError, depth: usize) {
        let indent = LEVEL_INDENT.repeat(depth);
        let path = error.path().display();
        match error {
            ItemError::AccessDenied { .. } => {
                writeln!(output, "{indent}[Ошибка доступа к папке: {path}]\n").ok();
            }
            ItemError::ReadFailure { reason, .. } => {
                writeln!(output, "{indent}[Ошибка обработки папки {path}: {reason}]\n").ok();
            }
        }
    }

    fn write_grouped(
        &self,
        output: &mut String,
        report: &ScanReport,
        files: &[&FileRecord],
        selected: &HashSet<usize>,
    ) {
        let mut groups: IndexMap<&str, Vec<&FileRecord>> = IndexMap::new();
        for (idx, file) in files.iter().enumerate() {
            if !selected.contains(&idx) {
                groups.entry(file.extension.as_str()).or_default().push(file);
            }
        }

        for (extension, members) in &groups {
            let language = members.first().map_or(PLAIN_TEXT, |f| f.language.as_str());
            Self::write_section(output, &format!("ФАЙЛЫ ТИПА: {extension} ({language})"));
            for file in members {
                self.write_file(output, file);
            }
        }

        for entry in &report.entries {
            if let ScanEntry::DirectoryError { error, depth } = entry {
                Self::write_directory_error(output, error, *depth);
            }
        }
    }

    fn write_entry(&self, output: &mut String, entry: &ScanEntry) {
        match entry {
            ScanEntry::Directory { name, depth, .. } => {
                let indent = LEVEL_INDENT.repeat(depth.saturating_sub(1));
                writeln!(output, "{indent}📂 {name}/").ok();
            }
            ScanEntry::File(record) => {
                let indent = LEVEL_INDENT.repeat(record.depth.saturating_sub(1));
                writeln!(output, "{indent}📄 {}", record.name).ok();
                self.write_file(output, record);
            }
            ScanEntry::DirectoryError { error, depth } => {
                Self::write_directory_error(output, error, *depth);
            }
        }
    }

    fn write_in_order(&self, output: &mut String, report: &ScanReport, selected: &HashSet<usize>) {
        let mut file_idx = 0;
        for entry in &report.entries {
            if let ScanEntry::File(_) = entry {
                let idx = file_idx;
                file_idx += 1;
                if selected.contains(&idx) {
                    continue;
                }
            }
            self.write_entry(output, entry);
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        let mut output = Self::header(&report.header);

        let files: Vec<&FileRecord> = report.files().collect();
        let priority = self.select_priority(&files);
        for &idx in &priority {
            output.push_str(&self.priority_section(files[idx]));
        }

        let selected: HashSet<usize> = priority.into_iter().collect();
        if self.group_by_extension {
            self.write_grouped(&mut output, report, &files, &selected);
        } else {
            self.write_in_order(&mut output, report, &selected);
        }

        Ok(output)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
