//! Conversations, their members, ranks and the session user's association.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::permissions::ChatPermission;
use crate::types::{AssociationId, ChatId, UserId};
use crate::user::PartialUser;

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Direct,
    #[default]
    Group,
    #[serde(other)]
    Unknown,
}

/// A direct or group conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chat {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: ChatId,
    #[serde(rename = "type", deserialize_with = "crate::types::null_default")]
    pub chat_type: ChatType,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub name: String,
    /// Owner of the chat (the creator of a group).
    pub user_id: Option<UserId>,
    pub icon: Option<String>,
    pub background: Option<String>,
    pub description: Option<String>,
    /// Counterpart of a direct chat; `None` once that account is deleted.
    pub recipient: Option<PartialUser>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub users: Vec<ChatMember>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub ranks: Vec<ChatRank>,
    /// The session user's membership.
    pub association: Option<ChatAssociation>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub unread: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Server-provided recency key. Sent as either a number or a numeric string.
    #[serde(rename = "_redisSortDate")]
    pub sort_date: Option<Value>,
}

impl Chat {
    pub fn is_group(&self) -> bool {
        self.chat_type == ChatType::Group
    }

    pub fn is_direct(&self) -> bool {
        self.chat_type == ChatType::Direct
    }

    pub fn association_id(&self) -> Option<AssociationId> {
        self.association.as_ref().map(|a| a.id)
    }

    /// Numeric value of `_redisSortDate`, `0` when absent or malformed.
    pub fn sort_timestamp(&self) -> i64 {
        match &self.sort_date {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Placeholder returned by lookups that do not find a chat.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Most recent first; ties broken by the higher id so the order is total.
pub fn compare_recency(a: &Chat, b: &Chat) -> Ordering {
    b.sort_timestamp()
        .cmp(&a.sort_timestamp())
        .then_with(|| b.id.cmp(&a.id))
}

pub fn sort_by_recency(chats: &mut [Chat]) {
    chats.sort_by(compare_recency);
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// The join record between the session user and a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatAssociation {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: AssociationId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub rank: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub permissions: Vec<ChatPermission>,
    pub last_read: Option<i64>,
    pub notifications: Option<String>,
}

/// Another member of a chat, as listed in `Chat.users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMember {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: AssociationId,
    pub user_id: Option<UserId>,
    /// Rank ids assigned to the member, highest priority first.
    #[serde(deserialize_with = "crate::types::null_default")]
    pub ranks_map: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRank {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: String,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub name: String,
    pub color: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub index: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub permissions_map: Vec<ChatPermission>,
}

/// Custom emoji uploaded to a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatEmoji {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub icon: String,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat(id: i64, sort_date: Option<Value>) -> Chat {
        Chat {
            id: ChatId(id),
            sort_date,
            ..Chat::default()
        }
    }

    #[test]
    fn test_sort_by_recency_then_id() {
        let mut chats = vec![
            chat(1, Some(json!("100"))),
            chat(2, Some(json!(300))),
            chat(3, Some(json!("100"))),
            chat(4, None),
        ];
        sort_by_recency(&mut chats);

        let ids: Vec<i64> = chats.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_chat_type_parsing() {
        let chat: Chat = serde_json::from_value(json!({
            "id": 9,
            "type": "direct",
            "association": { "id": 12, "permissions": ["ADMIN"] }
        }))
        .unwrap();
        assert!(chat.is_direct());
        assert_eq!(chat.association_id(), Some(AssociationId(12)));
        assert_eq!(chat.unread, 0);
    }

    #[test]
    fn test_chat_null_fields_fall_back_to_defaults() {
        let chat: Chat = serde_json::from_value(json!({
            "id": 4,
            "type": null,
            "name": null,
            "unread": null,
            "users": null,
            "ranks": [{ "id": "r1", "name": null, "index": null, "permissionsMap": null }],
            "association": { "id": 8, "chatId": null, "permissions": null }
        }))
        .expect("nulls should decode as defaults");
        assert_eq!(chat.chat_type, ChatType::Group);
        assert_eq!(chat.name, "");
        assert_eq!(chat.unread, 0);
        assert!(chat.users.is_empty());
        assert_eq!(chat.ranks[0].index, 0);
        assert!(chat.ranks[0].permissions_map.is_empty());

        let association = chat.association.expect("association");
        assert_eq!(association.chat_id, ChatId(0));
        assert!(association.permissions.is_empty());
    }
}
