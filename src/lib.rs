pub mod analyzer;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod language;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scan;
pub mod scanner;

pub use error::{DirDigestError, ItemError, Result};
pub use scan::{ScanHandle, ScanOrchestrator, ScanOutcome, ScanStatus};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_SCAN_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
