use std::collections::HashMap;

use regex::Regex;

use super::types::Symbols;

/// Language-specific symbol extraction.
///
/// Implementations match text patterns only. They are not aware of
/// nesting, strings or comments, so a definition inside a literal still
/// counts. They must never panic on odd input.
pub trait SymbolExtractor: Send + Sync {
    fn extract(&self, content: &str) -> Symbols;
}

/// Extractor used for languages nothing is registered for.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExtractor;

impl SymbolExtractor for NoopExtractor {
    fn extract(&self, _content: &str) -> Symbols {
        Symbols::default()
    }
}

/// Python `def` / `class` / `"""docstring"""` extractor.
pub struct PythonExtractor {
    fn_pattern: Regex,
    class_pattern: Regex,
    doc_pattern: Regex,
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fn_pattern: Regex::new(r"def\s+(\w+)\s*\(").expect("Invalid regex"),
            class_pattern: Regex::new(r"class\s+(\w+)\s*[(:]").expect("Invalid regex"),
            doc_pattern: Regex::new(r#"(?s)"""(.*?)""""#).expect("Invalid regex"),
        }
    }

    fn names(pattern: &Regex, content: &str) -> Vec<String> {
        pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl SymbolExtractor for PythonExtractor {
    fn extract(&self, content: &str) -> Symbols {
        let docstring = self
            .doc_pattern
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Symbols {
            functions: Self::names(&self.fn_pattern, content),
            classes: Self::names(&self.class_pattern, content),
            docstring,
        }
    }
}

/// Maps language tags to extractors, with a no-op default.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Box<dyn SymbolExtractor>>,
    fallback: NoopExtractor,
}

impl ExtractorRegistry {
    /// A registry with no extractors at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
            fallback: NoopExtractor,
        }
    }

    pub fn register(&mut self, language: &str, extractor: Box<dyn SymbolExtractor>) {
        self.extractors.insert(language.to_lowercase(), extractor);
    }

    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        self.extractors.contains_key(&language.to_lowercase())
    }

    #[must_use]
    pub fn get(&self, language: &str) -> &dyn SymbolExtractor {
        self.extractors
            .get(&language.to_lowercase())
            .map_or(&self.fallback as &dyn SymbolExtractor, AsRef::as_ref)
    }

    #[must_use]
    pub fn extract(&self, content: &str, language: &str) -> Symbols {
        self.get(language).extract(content)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("python", Box::new(PythonExtractor::new()));
        registry
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<_> = self.extractors.keys().collect();
        languages.sort();
        f.debug_struct("ExtractorRegistry")
            .field("languages", &languages)
            .finish()
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
