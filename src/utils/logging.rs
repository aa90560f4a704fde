// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Fallback filter when `RUST_LOG` is unset. Debug mode surfaces skipped
/// review blocks and saved pages from this crate without flooding the
/// output with reqwest/hyper internals.
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "info,review_scraper=debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber. `RUST_LOG` always wins over the default.
/// Logs go to stderr; stdout carries only the help text and the run summary.
pub fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();

    tracing::debug!("Logging setup complete.");
}
