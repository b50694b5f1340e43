//! The query/mutation catalog.
//!
//! One [`Operation`](crate::Operation) per remote call the client makes. The
//! documents only declare which fields are requested or sent; the client does
//! no schema validation beyond what decoding into the response types implies.
//!
//! Fragments are macros expanding to string literals so documents can be
//! assembled with `concat!` at compile time.

macro_rules! partial_user_fields {
    () => {
        "id username status avatar moderator administrator createdAt nickname"
    };
}

macro_rules! standard_embed_fragment {
    () => {
        r#"
fragment StandardEmbed on Embed {
  media {
    url
    proxyUrl
    attachment
    width
    height
    isInternal
    videoEmbedUrl
    mimeType
    type
  }
  text {
    imageProxyUrl
    text
    heading
    subText
    icon
  }
  metadata {
    restricted
    url
    siteName
    siteIcon
    type
    id
  }
}
"#
    };
}

macro_rules! standard_message_fragment {
    () => {
        r#"
fragment StandardMessage on Message {
  id
  chatId
  userId
  content
  type
  replyId
  edited
  pinned
  createdAt
}
"#
    };
}

pub mod chats;
pub mod collections;
pub mod embeds;
pub mod messages;
pub mod user;

pub use chats::{CancelTyping, Chats, ReadChat, Typing};
pub use collections::{UserCollections, UserLightCollections};
pub use embeds::EmbedPrecache;
pub use messages::Messages;
pub use user::{GetUser, UpdateUser};
