pub mod catalog;
pub mod message;

pub use message::{Message, MessageDraft, MessagePatch, SendConfirmation};
