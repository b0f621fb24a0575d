use indexmap::IndexMap;

use crate::error::ItemError;
use crate::output::StructureLine;
use crate::scan::{FileReader, FileRecord};
use crate::scanner::{WalkEntry, WalkVisitor, dotted_extension};

/// File names that always make a file a key file.
pub const KEY_FILE_NAMES: [&str; 7] = [
    "settings.py",
    "urls.py",
    "models.py",
    "views.py",
    "main.py",
    "app.py",
    "index.py",
];

/// Extensions that make a file a key file.
pub const KEY_EXTENSIONS: [&str; 5] = [".py", ".js", ".html", ".css", ".java"];

/// At most this many key files are detailed.
pub const MAX_KEY_FILES: usize = 10;

const TOP_EXTENSIONS: usize = 5;

#[must_use]
pub fn is_key_file(name: &str, extension: &str) -> bool {
    KEY_FILE_NAMES.contains(&name) || KEY_EXTENSIONS.contains(&extension)
}

/// A detailed key file with its one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    pub record: FileRecord,
    pub description: String,
}

/// Condensed result of a digest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSummary {
    pub project_name: String,
    pub structure: Vec<StructureLine>,
    pub readme: Option<Result<String, ItemError>>,
    /// Extension to file count, in first-seen order.
    pub histogram: IndexMap<String, u64>,
    pub key_files: Vec<KeyFile>,
    pub total_files: u64,
    pub errors: Vec<ItemError>,
}

impl DigestSummary {
    /// Up to five most frequent extensions; ties keep first-seen order.
    #[must_use]
    pub fn top_extensions(&self) -> Vec<(&str, u64)> {
        let mut counts: Vec<(&str, u64)> = self
            .histogram
            .iter()
            .map(|(ext, &count)| (ext.as_str(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(TOP_EXTENSIONS);
        counts
    }

    /// Free-text overview assembled from the counts and key files.
    #[must_use]
    pub fn synopsis(&self) -> String {
        let mut lines = vec![format!("Проект содержит всего {} файлов.", self.total_files)];

        let top = self.top_extensions();
        if !top.is_empty() {
            lines.push("Распределение по типам файлов:".to_string());
            for (ext, count) in top {
                let ext = if ext.is_empty() { "(без расширения)" } else { ext };
                lines.push(format!("- {ext}: {count} файлов"));
            }
        }

        if !self.key_files.is_empty() {
            lines.push("\nКлючевые файлы проекта:".to_string());
            for key in &self.key_files {
                lines.push(format!("- {}: {}", key.record.name, key.description));
            }
        }

        lines.join("\n")
    }
}

/// Walk visitor collecting the digest: a histogram over every admitted file
/// and full records for the first key files.
pub struct DigestBuilder<'a> {
    reader: &'a FileReader<'a>,
    histogram: IndexMap<String, u64>,
    key_files: Vec<KeyFile>,
    total_files: u64,
    errors: Vec<ItemError>,
}

impl<'a> DigestBuilder<'a> {
    #[must_use]
    pub fn new(reader: &'a FileReader<'a>) -> Self {
        Self {
            reader,
            histogram: IndexMap::new(),
            key_files: Vec::new(),
            total_files: 0,
            errors: Vec::new(),
        }
    }

    fn describe(&self, record: &FileRecord) -> String {
        if record.body.is_ok() && self.reader.extractors().supports(&record.language) {
            format!(
                "Файл содержит {} функций и {} классов.",
                record.symbols.functions.len(),
                record.symbols.classes.len()
            )
        } else {
            "Файл проекта".to_string()
        }
    }

    #[must_use]
    pub fn finish(
        self,
        project_name: String,
        structure: Vec<StructureLine>,
        readme: Option<Result<String, ItemError>>,
    ) -> DigestSummary {
        DigestSummary {
            project_name,
            structure,
            readme,
            histogram: self.histogram,
            key_files: self.key_files,
            total_files: self.total_files,
            errors: self.errors,
        }
    }
}

impl WalkVisitor for DigestBuilder<'_> {
    fn visit_file(&mut self, entry: &WalkEntry) {
        let extension = dotted_extension(&entry.name);
        let key = is_key_file(&entry.name, &extension);
        *self.histogram.entry(extension).or_insert(0) += 1;
        self.total_files += 1;

        if key && self.key_files.len() < MAX_KEY_FILES {
            let record = self.reader.read(entry);
            let description = self.describe(&record);
            self.key_files.push(KeyFile {
                record,
                description,
            });
        }
    }

    fn visit_error(&mut self, error: &ItemError, _depth: usize) {
        self.errors.push(error.clone());
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
