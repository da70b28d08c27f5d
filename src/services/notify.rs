use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::SendError;
use crate::models::{Message, SendConfirmation};

pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(150);

/// One call delivers at most once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, message: &Message) -> Result<(), SendError>;
}

/// Stand-in transport: waits a fixed delay and reports success.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_DELAY)
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn dispatch(&self, message: &Message) -> Result<(), SendError> {
        tokio::time::sleep(self.delay).await;
        log::debug!("Simulated delivery of {}", message.id);
        Ok(())
    }
}

pub type SendListener = Arc<dyn Fn(&SendConfirmation) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, SendListener)>,
}

pub struct NotificationService {
    transport: Arc<dyn Transport>,
    listeners: Mutex<Listeners>,
}

impl NotificationService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            listeners: Mutex::new(Listeners::default()),
        }
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Subscribers hear about a send only after the transport accepts it.
    pub async fn send(&self, message: &Message) -> Result<SendConfirmation, SendError> {
        self.transport.dispatch(message).await?;
        let confirmation = SendConfirmation::for_message(message, Utc::now().trunc_subsecs(3));
        self.notify(&confirmation);
        log::info!(
            "Sent \"{}\" at {}",
            message.text,
            crate::utils::format_time(confirmation.timestamp)
        );
        Ok(confirmation)
    }

    fn notify(&self, confirmation: &SendConfirmation) {
        // Snapshot so listeners may subscribe or unsubscribe from a callback.
        let snapshot: Vec<SendListener> = self
            .listeners()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(confirmation);
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SendConfirmation) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners();
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if `id` was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }

    pub fn clear(&self) {
        self.listeners().entries.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners().entries.len()
    }
}
