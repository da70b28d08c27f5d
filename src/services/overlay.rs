//! Floating overlay bridge.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::BridgeError;
use crate::models::Message;

/// Native overlay window controls.
#[async_trait]
pub trait OverlayBridge: Send + Sync {
    async fn has_overlay_permission(&self) -> Result<bool, BridgeError>;
    fn request_overlay_permission(&self);
    async fn start(&self, payload: &str) -> Result<bool, BridgeError>;
    async fn stop(&self) -> Result<bool, BridgeError>;
    async fn update(&self, payload: &str) -> Result<bool, BridgeError>;
    fn minimize_app(&self);
}

/// Resolved once at startup.
#[derive(Clone)]
pub enum OverlayCapability {
    Available(Arc<dyn OverlayBridge>),
    Unavailable,
}

impl OverlayCapability {
    pub fn is_supported(&self) -> bool {
        matches!(self, OverlayCapability::Available(_))
    }

    fn bridge(&self) -> Option<&Arc<dyn OverlayBridge>> {
        match self {
            OverlayCapability::Available(bridge) => Some(bridge),
            OverlayCapability::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingStart {
    Started,
    Failed,
    PermissionRequired,
    Unsupported,
}

/// Full collection, array order preserved, camelCase field names.
pub fn serialize_messages(messages: &[Message]) -> Result<String, serde_json::Error> {
    serde_json::to_string(messages)
}

pub struct FloatingService {
    capability: OverlayCapability,
    running: bool,
}

impl FloatingService {
    pub fn new(capability: OverlayCapability) -> Self {
        Self {
            capability,
            running: false,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_supported()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub async fn has_permission(&self) -> bool {
        let Some(bridge) = self.capability.bridge() else {
            return false;
        };
        match bridge.has_overlay_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                log::error!("Failed to check overlay permission: {}", e);
                false
            }
        }
    }

    pub fn request_permission(&self) {
        if let Some(bridge) = self.capability.bridge() {
            bridge.request_overlay_permission();
        }
    }

    pub async fn start(&mut self, messages: &[Message]) -> FloatingStart {
        let Some(bridge) = self.capability.bridge().cloned() else {
            log::warn!("Floating widget is not supported on this platform");
            return FloatingStart::Unsupported;
        };
        if !self.has_permission().await {
            return FloatingStart::PermissionRequired;
        }
        let payload = match serialize_messages(messages) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize messages for overlay: {}", e);
                return FloatingStart::Failed;
            }
        };
        match bridge.start(&payload).await {
            Ok(true) => {
                self.running = true;
                log::info!("Floating widget started with {} messages", messages.len());
                FloatingStart::Started
            }
            Ok(false) => {
                self.running = false;
                FloatingStart::Failed
            }
            Err(e) => {
                log::error!("Failed to start floating widget: {}", e);
                FloatingStart::Failed
            }
        }
    }

    pub async fn stop(&mut self) -> bool {
        let Some(bridge) = self.capability.bridge() else {
            return false;
        };
        match bridge.stop().await {
            Ok(stopped) => {
                if stopped {
                    self.running = false;
                }
                stopped
            }
            Err(e) => {
                log::error!("Failed to stop floating widget: {}", e);
                false
            }
        }
    }

    pub async fn update(&self, messages: &[Message]) -> bool {
        if !self.running {
            return false;
        }
        let Some(bridge) = self.capability.bridge() else {
            return false;
        };
        let payload = match serialize_messages(messages) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize messages for overlay: {}", e);
                return false;
            }
        };
        match bridge.update(&payload).await {
            Ok(updated) => updated,
            Err(e) => {
                log::error!("Failed to update floating messages: {}", e);
                false
            }
        }
    }

    pub fn minimize_app(&self) {
        if let Some(bridge) = self.capability.bridge() {
            bridge.minimize_app();
        }
    }
}
