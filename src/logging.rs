use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an `EnvFilter` directive, e.g. `dirdigest=debug`.
pub const LOG_ENV: &str = "DIRDIGEST_LOG";

/// Filter directive derived from the command-line verbosity flags.
#[must_use]
pub const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber writing to stderr.
///
/// `DIRDIGEST_LOG` wins over the flags when set to a valid directive.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: u8, quiet: bool) {
    let filter = env::var(LOG_ENV)
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
