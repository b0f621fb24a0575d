mod digest;
mod json;
mod text;
mod tree;

pub use digest::DigestFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;
pub use tree::{StructureLine, TreeRenderer, join_lines};

use crate::error::Result;
use crate::scan::ScanReport;

/// Trait for rendering a collected dump into an artifact.
pub trait OutputFormatter {
    /// Format the report into a string.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, report: &ScanReport) -> Result<String>;
}
