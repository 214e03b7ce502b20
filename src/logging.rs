//! Logging setup
//!
//! One `tracing` subscriber per process: `RUST_LOG` wins when set,
//! otherwise the configured level is applied to this crate.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the env filter for a logging config
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("datadash={}", config.level)))
}

/// Initialise the global subscriber (pretty or JSON output)
///
/// Calling this twice is harmless: the second attempt is ignored.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logging already initialised: {}", e);
    }
}
