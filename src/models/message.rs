use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::catalog;

pub const MAX_TEXT_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub icon: String,
    pub color: String,
    pub order: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub send_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub text: String,
    pub icon: String,
    pub color: String,
}

impl MessageDraft {
    pub fn new(text: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.text)?;
        validate_icon(&self.icon)?;
        validate_color(&self.color)
    }
}

/// Fields an edit may touch. Identity, rank and send statistics are owned by
/// the list operations and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePatch {
    pub text: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl MessagePatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn icon(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            ..Self::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(text) = &self.text {
            validate_text(text)?;
        }
        if let Some(icon) = &self.icon {
            validate_icon(icon)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, msg: &mut Message) {
        if let Some(text) = &self.text {
            msg.text = text.trim().to_string();
        }
        if let Some(icon) = &self.icon {
            msg.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            msg.color = color.clone();
        }
    }
}

/// Never merged back into the message collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmation {
    pub message_id: String,
    pub message_text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SendConfirmation {
    pub fn for_message(msg: &Message, timestamp: DateTime<Utc>) -> Self {
        Self {
            message_id: msg.id.clone(),
            message_text: msg.text.clone(),
            timestamp,
        }
    }
}

pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    let len = text.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyText);
    }
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TextTooLong(len));
    }
    Ok(())
}

pub fn validate_icon(icon: &str) -> Result<(), ValidationError> {
    if catalog::icon(icon).is_none() {
        return Err(ValidationError::UnknownIcon(icon.to_string()));
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if catalog::parse_hex(color).is_none() {
        return Err(ValidationError::InvalidColor(color.to_string()));
    }
    Ok(())
}
