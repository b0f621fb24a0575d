use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

use super::ProgressObserver;

/// Terminal progress bar fed by scan progress notifications.
///
/// The bar is disabled in quiet mode or when stderr is not a TTY.
#[derive(Clone)]
pub struct ScanProgress {
    progress_bar: ProgressBar,
}

impl ScanProgress {
    /// Creates a progress bar; its length is taken from the first notification.
    ///
    /// # Panics
    ///
    /// This function will panic if the progress bar template is invalid.
    /// The template is a compile-time constant, so this should never happen.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        Self::new_with_visibility(quiet, is_tty)
    }

    fn new_with_visibility(quiet: bool, is_tty: bool) -> Self {
        let progress_bar = if quiet || !is_tty {
            ProgressBar::hidden()
        } else {
            Self::create_visible_progress_bar()
        };

        Self { progress_bar }
    }

    fn create_visible_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} Scanning [{bar:40.cyan/blue}] {pos}/{len} items ({percent}%)",
                )
                // SAFETY: Template is a static string with valid format specifiers
                .expect("valid template")
                .progress_chars("█▓░"),
        );
        pb
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    #[must_use]
    pub fn length(&self) -> Option<u64> {
        self.progress_bar.length()
    }

    /// Finishes the progress bar and clears it from the terminal.
    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl ProgressObserver for ScanProgress {
    fn on_progress(&self, processed: u64, total: u64) {
        if self.progress_bar.length() != Some(total) {
            self.progress_bar.set_length(total);
        }
        self.progress_bar.set_position(processed);
    }
}

#[cfg(test)]
#[path = "bar_tests.rs"]
mod tests;
