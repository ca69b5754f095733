//! Chat Message Data Structure
//!
//! Represents a message exchanged between two users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of message content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Plain text message
    #[default]
    Text,
    /// Image attachment, optionally captioned
    Image,
}

impl MessageType {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
        }
    }

    /// Parse from string (database or form field)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(MessageType::Text),
            "image" => Some(MessageType::Image),
            _ => None,
        }
    }
}

/// A stored message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message_type: MessageType,
    /// Text payload; a caption for images
    pub message: Option<String>,
    /// Path of the saved attachment, only for image messages
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a text message stamped with the current time
    pub fn text(sender_id: Uuid, recipient_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            message_type: MessageType::Text,
            message: Some(text.into()),
            image_url: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an image message stamped with the current time
    pub fn image(
        sender_id: Uuid,
        recipient_id: Uuid,
        image_url: impl Into<String>,
        caption: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            message_type: MessageType::Image,
            message: caption,
            image_url: Some(image_url.into()),
            timestamp: Utc::now(),
        }
    }

    /// Whether `user_id` sent or received this message
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    /// Whether the message travels between `a` and `b`, in either direction
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.recipient_id == b)
            || (self.sender_id == b && self.recipient_id == a)
    }
}

/// Sender projection embedded in listed messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SenderSummary {
    pub id: Uuid,
    pub name: String,
}

/// A message as returned by `GET /messages/{senderId}/{recipientId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: Uuid,
    pub sender: SenderSummary,
    pub recipient_id: Uuid,
    pub message_type: MessageType,
    pub message: Option<String>,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /deleteMessages`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeleteMessagesRequest {
    #[serde(default)]
    pub messages: Vec<Uuid>,
}

/// Response after deleting messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteMessagesResponse {
    pub message: String,
    pub deleted: u64,
}
