use std::sync::Arc;

use crate::error::StorageError;
use crate::models::catalog::default_messages;
use crate::models::{Message, SendConfirmation};
use crate::storage::KeyValueStorage;

pub const MESSAGES_KEY: &str = "@bike_messenger_messages";
pub const LAST_SENT_KEY: &str = "@bike_messenger_last_sent";

/// Sole writer of the persisted message collection. Storage failures are
/// logged and never reach the caller.
pub struct MessageStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl MessageStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Installs the defaults on first run.
    pub async fn load(&self) -> Vec<Message> {
        match self.try_load().await {
            Ok(Some(mut messages)) => {
                messages.sort_by_key(|m| m.order);
                messages
            }
            Ok(None) => {
                let defaults = default_messages();
                self.save(&defaults).await;
                defaults
            }
            Err(e) => {
                log::error!("Failed to load messages: {}", e);
                default_messages()
            }
        }
    }

    async fn try_load(&self) -> Result<Option<Vec<Message>>, StorageError> {
        match self.storage.get(MESSAGES_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save(&self, messages: &[Message]) {
        if let Err(e) = self.try_save(messages).await {
            log::error!("Failed to save messages: {}", e);
        }
    }

    async fn try_save(&self, messages: &[Message]) -> Result<(), StorageError> {
        let json = serde_json::to_string(messages)?;
        self.storage.set(MESSAGES_KEY, &json).await
    }

    pub async fn save_last_sent(&self, confirmation: &SendConfirmation) {
        let result = match serde_json::to_string(confirmation) {
            Ok(json) => self.storage.set(LAST_SENT_KEY, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            log::warn!("Failed to record last sent message: {}", e);
        }
    }

    /// Informational only; never merged into the collection.
    pub async fn last_sent(&self) -> Option<SendConfirmation> {
        let raw = match self.storage.get(LAST_SENT_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Failed to read last sent message: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw).ok()
    }
}
