use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MERGE_WINDOW_MINUTES;
use crate::types::{ChatId, MessageId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Message,
    System,
    Join,
    Leave,
    Pin,
    Rename,
    Administrator,
    #[serde(other)]
    Unknown,
}

/// Where a page of messages is anchored when fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrollPosition {
    /// Newest page.
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "type")]
    pub message_type: Option<MessageType>,
    #[serde(default)]
    pub reply_id: Option<MessageId>,
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub edited: bool,
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A missing type counts as a plain message.
    pub fn is_plain(&self) -> bool {
        matches!(self.message_type, None | Some(MessageType::Message))
    }
}

/// Whether `message` should be drawn without its own sender header, folded
/// into `previous` (the message directly before it in time).
pub fn should_merge(message: &Message, previous: Option<&Message>) -> bool {
    if message.reply_id.is_some() || !message.is_plain() {
        return false;
    }
    let Some(previous) = previous else {
        return false;
    };
    if !previous.is_plain() {
        return false;
    }
    // Whole minutes, truncated.
    if (message.created_at - previous.created_at).num_minutes() > MERGE_WINDOW_MINUTES {
        return false;
    }
    previous.user_id == message.user_id
}
