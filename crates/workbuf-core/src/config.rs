use std::path::Path;

use config as cfg;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, WorkbufError};

/// How a full queue computes its next capacity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Grow by the initial capacity on every growth event.
    ///
    /// Each growth copies every live element, so N pushes on a never-drained
    /// queue cost O(N² / increment) copies in total. This matches the
    /// observed behavior of the buffers this crate replaces.
    #[default]
    ConstantIncrement,
    /// Double the capacity on every growth event (amortized O(1) push).
    Doubling,
}

impl GrowthPolicy {
    /// Capacity after one growth event. `current` is non-zero for any
    /// validated queue, so the result is always strictly larger.
    pub fn next_capacity(&self, current: usize, increment: usize) -> usize {
        match self {
            Self::ConstantIncrement => current + increment,
            Self::Doubling => current * 2,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::ConstantIncrement => "Grow by the initial capacity (O(n) copy per growth)",
            Self::Doubling => "Double the capacity (amortized O(1) push)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QueueConfig {
    /// Initial slot count; also the growth increment under
    /// `GrowthPolicy::ConstantIncrement`.
    #[serde(default = "QueueConfig::default_initial_capacity")]
    pub initial_capacity: usize,
    #[serde(default)]
    pub growth: GrowthPolicy,
}

impl QueueConfig {
    fn default_initial_capacity() -> usize {
        64
    }

    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth: GrowthPolicy::default(),
        }
    }

    pub fn growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(WorkbufError::InvalidCapacity {
                capacity: self.initial_capacity,
            });
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::with_capacity(Self::default_initial_capacity())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "WORKBUF";

    /// Loads settings from an optional file (format picked by extension)
    /// overlaid with `WORKBUF__SECTION__KEY` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = cfg::Config::builder();
        if let Some(path) = path {
            debug!("Loading workbuf settings from {}", path.display());
            builder = builder.add_source(cfg::File::from(path).required(true));
        }
        builder = builder.add_source(
            cfg::Environment::with_prefix(Self::ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        info!(
            initial_capacity = settings.queue.initial_capacity,
            growth = ?settings.queue.growth,
            "Loaded workbuf settings"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.queue.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(WorkbufError::InvalidConfiguration(
                "logging.level must not be empty".into(),
            ));
        }
        Ok(())
    }
}
