// Data model shared by the Flowinity client crates.

pub mod chat;
pub mod collection;
pub mod constants;
pub mod embed;
pub mod message;
pub mod permissions;
pub mod types;
pub mod user;

pub use chat::{Chat, ChatAssociation, ChatEmoji, ChatMember, ChatRank, ChatType};
pub use collection::{Collection, CollectionPage, Pager};
pub use embed::Embed;
pub use message::{should_merge, Message, MessageType, ScrollPosition};
pub use permissions::ChatPermission;
pub use types::{null_default, AssociationId, ChatId, CollectionId, MessageId, UserId};
pub use user::{BlockedUser, Notification, PartialUser, Plan, User};
