use std::fmt::Write;

use crate::digest::{DigestSummary, KeyFile};

use super::join_lines;

/// Renders a [`DigestSummary`] as a markdown document.
#[derive(Debug, Default, Clone, Copy)]
pub struct DigestFormatter;

impl DigestFormatter {
    #[must_use]
    pub fn format(&self, summary: &DigestSummary) -> String {
        let mut output = String::new();
        write!(output, "# Проект: {}\n\n", summary.project_name).ok();

        if let Some(readme) = &summary.readme {
            let text = readme
                .as_deref()
                .unwrap_or("[Ошибка чтения README]");
            write!(output, "## README\n\n{text}\n\n").ok();
        }

        write!(output, "## Краткое описание проекта\n\n{}\n\n", summary.synopsis()).ok();

        write!(
            output,
            "## Структура проекта\n\n```\n{}\n```\n\n",
            join_lines(&summary.structure)
        )
        .ok();

        output.push_str("## Ключевые файлы\n\n");
        for key in &summary.key_files {
            Self::write_key_file(&mut output, key);
        }

        output
    }

    fn write_key_file(output: &mut String, key: &KeyFile) {
        let record = &key.record;
        let symbols = &record.symbols;

        write!(output, "### {}\n\n", record.name).ok();
        write!(output, "Путь: `{}`\n\n", record.path.display()).ok();
        if !symbols.docstring.is_empty() {
            write!(output, "Документация: {}\n\n", symbols.docstring).ok();
        }
        if !symbols.classes.is_empty() {
            write!(output, "Классы: {}\n\n", symbols.classes.join(", ")).ok();
        }
        if !symbols.functions.is_empty() {
            write!(output, "Функции: {}\n\n", symbols.functions.join(", ")).ok();
        }
        write!(output, "Описание: {}\n\n", key.description).ok();

        match &record.body {
            Ok(content) => {
                write!(output, "```{}\n{}\n```\n\n", record.language, content.text).ok();
                if content.truncated {
                    write!(
                        output,
                        "... (файл усечен, показано {} из {} байт)\n\n",
                        content.shown_size(),
                        content.original_size
                    )
                    .ok();
                }
            }
            Err(_) => {
                write!(output, "```{}\n[Ошибка чтения файла]\n```\n\n", record.language).ok();
            }
        }
    }
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
