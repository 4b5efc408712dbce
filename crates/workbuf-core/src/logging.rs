use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, WorkbufError};

/// Builds the filter for the global subscriber. `RUST_LOG` wins over the
/// configured level when it is set and parses.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            WorkbufError::InvalidConfiguration(format!(
                "invalid log filter '{}': {}",
                config.level, e
            ))
        })
}

/// Installs a `tracing` subscriber for the process. Fails if one is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
    installed.map_err(|e| WorkbufError::Logging(e.to_string()))
}
