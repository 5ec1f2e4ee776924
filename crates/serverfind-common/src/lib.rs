pub mod activity;
pub mod errors;
pub mod types;

pub use activity::{ActivityLog, LogEntry, LogLevel};
pub use errors::{BridgeError, ConfigError, ServerfindError, StoreError};
pub use types::Color;

pub type Result<T> = std::result::Result<T, ServerfindError>;
