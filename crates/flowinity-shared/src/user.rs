//! Session user and the lightweight user projections that reference other
//! accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::GOLD_PLAN;
use crate::types::{CollectionId, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The authenticated account, as returned by the `currentUser` query.
///
/// Fields the client never interprets (`themeEngine`, `profileLayout`) are
/// kept as raw JSON so they survive a round trip through the profile update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: UserId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub description: Option<String>,
    pub stored_status: Option<String>,
    pub language: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub dark_theme: bool,
    pub theme_engine: Option<Value>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub discord_precache: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub excluded_collections: Vec<CollectionId>,
    pub insights: Option<String>,
    pub items_per_page: Option<i64>,
    pub name_color: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub privacy_policy_accepted: bool,
    pub profile_layout: Option<Value>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub public_profile: bool,
    pub weather_unit: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub pulse: bool,
    pub group_privacy: Option<String>,
    pub friend_requests: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub moderator: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub administrator: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub plan: Option<Plan>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub notifications: Vec<Notification>,
}

impl User {
    /// Whether the account is on the gold plan.
    pub fn is_gold(&self) -> bool {
        self.plan
            .as_ref()
            .is_some_and(|plan| plan.internal_name == GOLD_PLAN)
    }

    /// Build the lightweight projection of this account from live fields.
    pub fn to_partial(&self) -> PartialUser {
        PartialUser {
            id: self.id,
            username: self.username.clone(),
            status: self.stored_status.clone(),
            avatar: self.avatar.clone(),
            moderator: self.moderator,
            administrator: self.administrator,
            created_at: self.created_at,
            nickname: None,
        }
    }
}

/// Subscription plan attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plan {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub internal_name: String,
    pub max_file_size: Option<i64>,
    pub quota_max: Option<i64>,
}

/// In-app notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub message: String,
    pub route: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub dismissed: bool,
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Other accounts
// ---------------------------------------------------------------------------

/// A tracked (friend or chat co-member) account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialUser {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: UserId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub username: String,
    pub status: Option<String>,
    pub avatar: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub moderator: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub administrator: bool,
    pub created_at: Option<DateTime<Utc>>,
    /// Friend nickname chosen by the session user.
    pub nickname: Option<String>,
}

/// An account the session user has blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockedUser {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub id: i64,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub user_id: UserId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub blocked_user_id: UserId,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub silent: bool,
    pub created_at: Option<DateTime<Utc>>,
}
