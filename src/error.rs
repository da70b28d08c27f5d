use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("no data directory available")]
    NoDataDir,
}

/// Rejections raised before a draft or patch reaches the list service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message text is empty")]
    EmptyText,
    #[error("message text is {0} characters, the limit is 30")]
    TextTooLong(usize),
    #[error("unknown icon: {0}")]
    UnknownIcon(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("overlay permission denied")]
    PermissionDenied,
    #[error("overlay bridge call failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}
