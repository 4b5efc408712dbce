pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod timefmt;
pub mod traits;

pub use config::{GrowthPolicy, LoggingConfig, QueueConfig, Settings};
pub use error::*;
pub use logging::{env_filter, init_logging};
pub use node::*;
pub use traits::*;
