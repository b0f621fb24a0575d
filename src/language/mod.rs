mod registry;

pub use registry::{Language, LanguageRegistry, PLAIN_TEXT};
