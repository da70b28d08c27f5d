//! Quick-send rider status messages.

pub mod app;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use app::{App, AppConfig, SendTracker};
pub use error::{BridgeError, ConfigError, SendError, StorageError, ValidationError};
pub use models::{Message, MessageDraft, MessagePatch, SendConfirmation};
