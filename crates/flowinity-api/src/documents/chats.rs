//! Chat list, read receipts and typing indicators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use flowinity_shared::{AssociationId, Chat, ChatEmoji};

use crate::graphql::{NoVariables, Operation};

// ---------------------------------------------------------------------------
// Chats
// ---------------------------------------------------------------------------

/// Every chat the session user belongs to, plus the emoji available to them.
pub struct Chats;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatsData {
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub chats: Vec<Chat>,
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub user_emoji: Vec<ChatEmoji>,
}

impl Operation for Chats {
    const NAME: &'static str = "Chats";
    const DOCUMENT: &'static str = concat!(
        r#"
query Chats {
  chats {
    id
    type
    name
    userId
    icon
    background
    description
    createdAt
    updatedAt
    unread
    _redisSortDate
    recipient { "#,
        partial_user_fields!(),
        r#" }
    users {
      id
      userId
      ranksMap
      createdAt
    }
    ranks {
      id
      name
      color
      index
      permissionsMap
    }
    association {
      id
      chatId
      userId
      rank
      permissions
      lastRead
      notifications
    }
  }
  userEmoji {
    id
    name
    icon
    chatId
    userId
    createdAt
  }
}
"#
    );

    type Variables = NoVariables;
    type Response = ChatsData;
}

// ---------------------------------------------------------------------------
// ReadChat
// ---------------------------------------------------------------------------

pub struct ReadChat;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadChatInput {
    pub association_id: AssociationId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadChatVariables {
    pub input: ReadChatInput,
}

impl ReadChatVariables {
    pub fn new(association_id: AssociationId) -> Self {
        Self {
            input: ReadChatInput { association_id },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadChatData {
    pub read_chat: Option<Value>,
}

impl Operation for ReadChat {
    const NAME: &'static str = "ReadChat";
    const DOCUMENT: &'static str = r#"
mutation ReadChat($input: ReadChatInput!) {
  readChat(input: $input)
}
"#;

    type Variables = ReadChatVariables;
    type Response = ReadChatData;
}

// ---------------------------------------------------------------------------
// Typing / CancelTyping
// ---------------------------------------------------------------------------

/// Variables shared by both typing mutations: the association being typed in.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypingVariables {
    pub input: AssociationId,
}

pub struct Typing;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypingData {
    pub typing: Option<Value>,
}

impl Operation for Typing {
    const NAME: &'static str = "Typing";
    const DOCUMENT: &'static str = r#"
mutation Typing($input: Float!) {
  typing(input: $input)
}
"#;

    type Variables = TypingVariables;
    type Response = TypingData;
}

pub struct CancelTyping;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CancelTypingData {
    pub cancel_typing: Option<Value>,
}

impl Operation for CancelTyping {
    const NAME: &'static str = "CancelTyping";
    const DOCUMENT: &'static str = r#"
mutation CancelTyping($input: Float!) {
  cancelTyping(input: $input)
}
"#;

    type Variables = TypingVariables;
    type Response = CancelTypingData;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_chat_variables_shape() {
        let request = ReadChat::request(&ReadChatVariables::new(AssociationId(12))).unwrap();
        assert_eq!(request.variables, json!({ "input": { "associationId": 12 } }));
    }

    #[test]
    fn test_typing_sends_bare_association_id() {
        let request = Typing::request(&TypingVariables {
            input: AssociationId(5),
        })
        .unwrap();
        assert_eq!(request.variables, json!({ "input": 5 }));
        assert_eq!(request.operation_name, "Typing");
    }

    #[test]
    fn test_chats_data_decodes() {
        let data: ChatsData = serde_json::from_value(json!({
            "chats": [{ "id": 1, "type": "group", "name": "Team", "unread": 3 }],
            "userEmoji": [{ "id": "e1", "icon": "abc.png", "chatId": 1 }]
        }))
        .unwrap();
        assert_eq!(data.chats.len(), 1);
        assert_eq!(data.chats[0].unread, 3);
        assert_eq!(data.user_emoji[0].id, "e1");
    }

    #[test]
    fn test_chats_data_tolerates_nulls() {
        let data: ChatsData = serde_json::from_value(json!({
            "chats": [
                { "id": 1, "type": "group", "name": null, "unread": null, "users": null },
                { "id": 2, "type": "direct", "name": "", "unread": 2 }
            ],
            "userEmoji": null
        }))
        .unwrap();
        assert_eq!(data.chats.len(), 2);
        assert_eq!(data.chats[0].name, "");
        assert_eq!(data.chats[0].unread, 0);
        assert_eq!(data.chats[1].unread, 2);
        assert!(data.user_emoji.is_empty());
    }
}
