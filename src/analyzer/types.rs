/// Shallow summary of a source file's top-level symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbols {
    /// Function names in order of appearance.
    pub functions: Vec<String>,
    /// Class names in order of appearance.
    pub classes: Vec<String>,
    /// First documentation block, trimmed; empty if none.
    pub docstring: String,
}

impl Symbols {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.docstring.is_empty()
    }

    #[must_use]
    pub fn has_definitions(&self) -> bool {
        !self.functions.is_empty() || !self.classes.is_empty()
    }
}
