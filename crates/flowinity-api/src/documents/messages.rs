use serde::{Deserialize, Serialize};

use flowinity_shared::{AssociationId, Message, MessageId, ScrollPosition};

use crate::graphql::Operation;

/// One page of a conversation's messages, newest first.
pub struct Messages;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesInput {
    pub association_id: AssociationId,
    pub position: ScrollPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl MessagesInput {
    /// The newest page of a conversation.
    pub fn newest(association_id: AssociationId) -> Self {
        Self {
            association_id,
            position: ScrollPosition::Top,
            offset: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessagesVariables {
    pub input: MessagesInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagesData {
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub messages: Vec<Message>,
}

impl Operation for Messages {
    const NAME: &'static str = "Messages";
    const DOCUMENT: &'static str = concat!(
        standard_message_fragment!(),
        r#"
query Messages($input: InfiniteMessagesInput!) {
  messages(input: $input) {
    ...StandardMessage
  }
}
"#
    );

    type Variables = MessagesVariables;
    type Response = MessagesData;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newest_page_variables() {
        let request = Messages::request(&MessagesVariables {
            input: MessagesInput::newest(AssociationId(8)),
        })
        .unwrap();
        assert_eq!(
            request.variables,
            json!({ "input": { "associationId": 8, "position": "TOP" } })
        );
        assert!(Messages::DOCUMENT.contains("fragment StandardMessage on Message"));
    }
}
