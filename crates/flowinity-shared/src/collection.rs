//! Collections (shared file galleries) as listed by the collection queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CollectionId, UserId};
use crate::user::PartialUser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionPermissions {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub read: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub write: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub configure: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionPreview {
    pub updated_at: Option<DateTime<Utc>>,
    pub attachment: Option<PreviewAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewAttachment {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub attachment: String,
}

/// A share record linking a collection to another user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionUser {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub collection_id: CollectionId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub read: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub write: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub configure: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub accepted: bool,
    pub recipient_id: Option<UserId>,
    pub sender_id: Option<UserId>,
    pub identifier: Option<String>,
    pub user: Option<PartialUser>,
    pub sender: Option<PartialUser>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: CollectionId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub name: String,
    pub image: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub user_id: Option<UserId>,
    pub share_link: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub item_count: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub shared: bool,
    pub user: Option<PartialUser>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub users: Vec<CollectionUser>,
    pub recipient: Option<CollectionUser>,
    pub preview: Option<CollectionPreview>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub permissions_metadata: CollectionPermissions,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Pagination block returned alongside paged listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pager {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub total_items: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub current_page: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub page_size: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub total_pages: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub start_page: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub end_page: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub start_index: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub end_index: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub pages: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionPage {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub items: Vec<Collection>,
    pub pager: Option<Pager>,
}
