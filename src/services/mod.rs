pub mod list;
pub mod notify;
pub mod overlay;
pub mod store;

pub use list::MessageListService;
pub use notify::{NotificationService, SimulatedTransport, SubscriptionId, Transport};
pub use overlay::{FloatingService, FloatingStart, OverlayBridge, OverlayCapability};
pub use store::MessageStore;
