use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbufError {
    #[error("Invalid capacity: {capacity} (initial capacity must be greater than zero)")]
    InvalidCapacity { capacity: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, WorkbufError>;
