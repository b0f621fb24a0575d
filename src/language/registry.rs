use std::collections::HashMap;

/// Tag reported for extensions no language claims.
pub const PLAIN_TEXT: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    pub extensions: Vec<String>,
}

impl Language {
    #[must_use]
    pub fn new(name: &str, extensions: Vec<&str>) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.into_iter().map(String::from).collect(),
        }
    }
}

/// Maps file extensions (without the dot, lower-case) to language tags.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    extension_map: HashMap<String, usize>,
}

impl LanguageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
            extension_map: HashMap::new(),
        }
    }

    pub fn register(&mut self, language: Language) {
        let idx = self.languages.len();
        for ext in &language.extensions {
            self.extension_map.insert(ext.to_lowercase(), idx);
        }
        self.languages.push(language);
    }

    #[must_use]
    pub fn get_by_extension(&self, ext: &str) -> Option<&Language> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_lowercase();
        self.extension_map
            .get(&ext)
            .map(|&idx| &self.languages[idx])
    }

    /// Language tag for an extension, falling back to [`PLAIN_TEXT`].
    ///
    /// Accepts the extension with or without its leading dot.
    #[must_use]
    pub fn tag_for(&self, ext: &str) -> &str {
        self.get_by_extension(ext)
            .map_or(PLAIN_TEXT, |lang| lang.name.as_str())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        for (name, extensions) in [
            ("python", vec!["py"]),
            ("javascript", vec!["js"]),
            ("typescript", vec!["ts"]),
            ("html", vec!["html"]),
            ("css", vec!["css"]),
            ("java", vec!["java"]),
            ("c", vec!["c", "h"]),
            ("cpp", vec!["cpp"]),
            ("csharp", vec!["cs"]),
            ("php", vec!["php"]),
            ("ruby", vec!["rb"]),
            ("go", vec!["go"]),
            ("rust", vec!["rs"]),
            ("json", vec!["json"]),
            ("xml", vec!["xml"]),
            ("markdown", vec!["md"]),
            ("text", vec!["txt"]),
            ("bash", vec!["sh"]),
            ("batch", vec!["bat"]),
            ("powershell", vec!["ps1"]),
            ("sql", vec!["sql"]),
            ("yaml", vec!["yaml", "yml"]),
        ] {
            registry.register(Language::new(name, extensions));
        }

        registry
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
