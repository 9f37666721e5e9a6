//! Logging and tracing configuration
//!
//! Structured logging via the `tracing` crate. Initialize once at startup:
//!
//! ```rust
//! aqf_check::logging::init();
//! ```
//!
//! Set `RUST_LOG` to control log levels at runtime:
//! ```bash
//! RUST_LOG=debug ./aqf-check dump.zip          # All debug logs
//! RUST_LOG=aqf_check=trace ./aqf-check dump/   # Trace for this crate only
//! RUST_LOG=warn ./aqf-check dump.zip           # Only warnings and errors
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging/tracing system
///
/// Call this once at application startup.
pub fn init() {
    // Build filter from environment or use defaults
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default: info in release, debug in debug builds
        if cfg!(debug_assertions) {
            EnvFilter::new("aqf_check=debug")
        } else {
            EnvFilter::new("aqf_check=info")
        }
    });

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(true)      // Show module path
            .with_thread_ids(false) // Hide thread IDs (cleaner)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    // Set as global default (ignore error if already set)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Initialize logging with verbose output (file:line, thread IDs)
pub fn init_verbose() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .pretty(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info};

    #[test]
    fn test_init() {
        init();
        info!("Test log message");
        debug!(key = "value", "Structured log");
    }
}
