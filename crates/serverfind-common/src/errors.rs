use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures crossing the control surface <-> content boundary.
///
/// Absent document structure is never reported through this type; it is an
/// ordinary empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("no active tab")]
    NoActiveTab,

    #[error("no content receiver in tab {0}")]
    NoReceiver(u32),

    #[error("message rejected: unknown type {0:?}")]
    RejectedKind(String),

    #[error("failed to decode message: {0}")]
    Decode(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Encoding(String),

    #[error("store path error: {0}")]
    PathError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServerfindError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Other(String),
}
