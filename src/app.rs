use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{ConfigError, SendError, StorageError, ValidationError};
use crate::models::{Message, MessageDraft, MessagePatch, SendConfirmation};
use crate::services::{
    FloatingService, FloatingStart, MessageListService, MessageStore, NotificationService,
    OverlayCapability, SimulatedTransport, Transport,
};
use crate::storage::{self, KeyValueStorage, SqliteStorage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the SQLite file; the platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    pub send_delay_ms: u64,
    pub confirmation_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            send_delay_ms: 150,
            confirmation_ttl_secs: 3,
        }
    }
}

impl AppConfig {
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("bike-messenger.toml"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::toml_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::toml_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn db_path(&self) -> Option<PathBuf> {
        let dir = self.data_dir.clone().or_else(storage::default_data_dir)?;
        Some(dir.join(storage::DB_FILE))
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    pub fn confirmation_ttl(&self) -> Duration {
        Duration::from_secs(self.confirmation_ttl_secs)
    }
}

/// Id of the message whose dispatch is in flight. Clones share the marker.
#[derive(Debug, Clone, Default)]
pub struct SendTracker {
    current: Arc<Mutex<Option<String>>>,
}

impl SendTracker {
    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn is_sending(&self, id: &str) -> bool {
        self.slot().as_deref() == Some(id)
    }

    fn begin(&self, id: &str) -> Option<SendingGuard> {
        let mut slot = self.slot();
        if slot.as_deref() == Some(id) {
            return None;
        }
        *slot = Some(id.to_string());
        Some(SendingGuard {
            tracker: self.clone(),
        })
    }
}

/// Clears the marker on drop, including when the send future is cancelled.
struct SendingGuard {
    tracker: SendTracker,
}

impl Drop for SendingGuard {
    fn drop(&mut self) {
        *self.tracker.slot() = None;
    }
}

pub struct App {
    store: Arc<MessageStore>,
    list: MessageListService,
    notifier: NotificationService,
    floating: FloatingService,
    messages: Vec<Message>,
    last_sent: Option<(SendConfirmation, Instant)>,
    confirmation_ttl: Duration,
    sending: SendTracker,
}

impl App {
    pub async fn start(
        config: &AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        transport: Arc<dyn Transport>,
        overlay: OverlayCapability,
    ) -> Self {
        let store = Arc::new(MessageStore::new(storage));
        let messages = store.load().await;
        log::info!("Loaded {} messages", messages.len());
        Self {
            list: MessageListService::new(store.clone()),
            store,
            notifier: NotificationService::new(transport),
            floating: FloatingService::new(overlay),
            messages,
            last_sent: None,
            confirmation_ttl: config.confirmation_ttl(),
            sending: SendTracker::default(),
        }
    }

    pub async fn from_config(
        config: &AppConfig,
        overlay: OverlayCapability,
    ) -> Result<Self, StorageError> {
        let path = config.db_path().ok_or(StorageError::NoDataDir)?;
        let storage = Arc::new(SqliteStorage::open(path)?);
        let transport = Arc::new(SimulatedTransport::new(config.send_delay()));
        Ok(Self::start(config, storage, transport, overlay).await)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn notifier(&self) -> &NotificationService {
        &self.notifier
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn is_sending(&self, id: &str) -> bool {
        self.sending.is_sending(id)
    }

    pub fn send_tracker(&self) -> SendTracker {
        self.sending.clone()
    }

    async fn rebind(&mut self, next: Vec<Message>) {
        self.messages = next;
        if self.floating.is_running() {
            self.floating.update(&self.messages).await;
        }
    }

    pub async fn add_message(&mut self, draft: &MessageDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        let next = self.list.add(&self.messages, draft).await;
        self.rebind(next).await;
        Ok(())
    }

    pub async fn update_message(
        &mut self,
        id: &str,
        patch: &MessagePatch,
    ) -> Result<(), ValidationError> {
        patch.validate()?;
        let next = self.list.update(&self.messages, id, patch).await;
        self.rebind(next).await;
        Ok(())
    }

    pub async fn delete_message(&mut self, id: &str) {
        let next = self.list.delete(&self.messages, id).await;
        self.rebind(next).await;
    }

    pub async fn reorder_messages(&mut self, from: usize, to: usize) -> bool {
        let len = self.messages.len();
        if from >= len || to >= len {
            log::warn!("Rejected reorder {} -> {} on {} messages", from, to, len);
            return false;
        }
        let next = self.list.reorder(&self.messages, from, to).await;
        self.rebind(next).await;
        true
    }

    /// Unknown ids and repeat sends of a pending id yield `Ok(None)`. A failed
    /// dispatch leaves the collection unchanged.
    pub async fn send_message(&mut self, id: &str) -> Result<Option<SendConfirmation>, SendError> {
        let Some(message) = self.message(id).cloned() else {
            return Ok(None);
        };
        let Some(_pending) = self.sending.begin(id) else {
            log::debug!("Send of {} already in flight", id);
            return Ok(None);
        };
        let confirmation = match self.notifier.send(&message).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                log::error!("Failed to send message {}: {}", id, e);
                return Err(e);
            }
        };
        self.last_sent = Some((confirmation.clone(), Instant::now()));
        let next = self.list.mark_sent(&self.messages, &confirmation).await;
        self.rebind(next).await;
        Ok(Some(confirmation))
    }

    pub async fn handle_overlay_send(
        &mut self,
        id: &str,
    ) -> Result<Option<SendConfirmation>, SendError> {
        log::debug!("Send requested from overlay for {}", id);
        self.send_message(id).await
    }

    pub async fn reset_to_defaults(&mut self) {
        let next = self.list.reset_to_defaults().await;
        self.rebind(next).await;
    }

    pub fn last_sent(&self) -> Option<&SendConfirmation> {
        self.last_sent
            .as_ref()
            .filter(|(_, at)| at.elapsed() < self.confirmation_ttl)
            .map(|(confirmation, _)| confirmation)
    }

    pub fn overlay_supported(&self) -> bool {
        self.floating.is_supported()
    }

    pub fn is_floating(&self) -> bool {
        self.floating.is_running()
    }

    pub async fn has_overlay_permission(&self) -> bool {
        self.floating.has_permission().await
    }

    pub fn request_overlay_permission(&self) {
        if !self.floating.is_supported() {
            log::warn!("Floating overlay is not available on this platform");
            return;
        }
        self.floating.request_permission();
    }

    pub async fn start_floating(&mut self) -> FloatingStart {
        self.floating.start(&self.messages).await
    }

    pub async fn stop_floating(&mut self) -> bool {
        self.floating.stop().await
    }

    pub async fn minimize_and_float(&mut self) -> FloatingStart {
        let outcome = if self.floating.is_running() {
            FloatingStart::Started
        } else {
            self.start_floating().await
        };
        self.floating.minimize_app();
        outcome
    }
}
