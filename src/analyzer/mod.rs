mod extractor;
mod types;

pub use extractor::{ExtractorRegistry, NoopExtractor, PythonExtractor, SymbolExtractor};
pub use types::Symbols;
