// src/logging.rs
// =============================================================================
// Structured logging setup for the CLI.
//
// Logs go to stderr so that `--json` output on stdout stays machine-readable.
// The level is taken from RUST_LOG (e.g. RUST_LOG=cms_link_checker=debug),
// defaulting to "info".
// =============================================================================

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Call once, at startup.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
