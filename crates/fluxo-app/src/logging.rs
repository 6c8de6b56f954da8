//! # Logging
//!
//! Tracing subscriber setup shared by the binary and embedding hosts.
//!
//! ```text
//! RUST_LOG set?  ──yes──►  use it
//!      │
//!      no
//!      ▼
//! [logging].filter from fluxo.toml  (default "info,fluxo=debug")
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::{default_log_filter, AppConfig};

/// Initializes the tracing subscriber with the default filter.
pub fn init_tracing() {
    init_with_filter(&default_log_filter());
}

/// Initializes the tracing subscriber with the filter from `config`.
pub fn init_from_config(config: &AppConfig) {
    init_with_filter(&config.logging.filter);
}

/// `RUST_LOG` always wins over `fallback`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
