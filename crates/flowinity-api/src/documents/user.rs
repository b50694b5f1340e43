//! Session bootstrap and profile update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use flowinity_shared::{BlockedUser, CollectionId, PartialUser, User};

use crate::graphql::{NoVariables, Operation};

// ---------------------------------------------------------------------------
// GetUser
// ---------------------------------------------------------------------------

/// Current user, tracked users and blocked users in one round trip.
pub struct GetUser;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetUserData {
    pub current_user: Option<User>,
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub tracked_users: Vec<PartialUser>,
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub blocked_users: Vec<BlockedUser>,
}

impl Operation for GetUser {
    const NAME: &'static str = "GetUser";
    const DOCUMENT: &'static str = concat!(
        r#"
query GetUser {
  currentUser {
    id
    username
    email
    avatar
    banner
    description
    storedStatus
    language
    darkTheme
    themeEngine
    discordPrecache
    excludedCollections
    insights
    itemsPerPage
    nameColor
    privacyPolicyAccepted
    profileLayout
    publicProfile
    weatherUnit
    pulse
    groupPrivacy
    friendRequests
    moderator
    administrator
    createdAt
    plan {
      id
      name
      internalName
      maxFileSize
      quotaMax
    }
    notifications {
      id
      message
      route
      dismissed
      createdAt
    }
  }
  trackedUsers { "#,
        partial_user_fields!(),
        r#" }
  blockedUsers {
    id
    userId
    blockedUserId
    silent
    createdAt
  }
}
"#
    );

    type Variables = NoVariables;
    type Response = GetUserData;
}

// ---------------------------------------------------------------------------
// UpdateUser
// ---------------------------------------------------------------------------

pub struct UpdateUser;

/// The whitelist of profile fields a profile update may change.
///
/// Built from the full [`User`] so that server-owned fields (plan,
/// notifications, moderation flags) are never echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub dark_theme: bool,
    pub description: Option<String>,
    pub discord_precache: bool,
    pub excluded_collections: Vec<CollectionId>,
    pub insights: Option<String>,
    pub items_per_page: Option<i64>,
    pub language: Option<String>,
    pub name_color: Option<String>,
    pub privacy_policy_accepted: bool,
    pub profile_layout: Option<Value>,
    pub public_profile: bool,
    pub stored_status: Option<String>,
    pub username: String,
    pub weather_unit: Option<String>,
    /// Only sent when it carries an AMOLED palette; a half-built theme is
    /// sent as `null` so the server keeps its own.
    pub theme_engine: Option<Value>,
    pub pulse: bool,
    pub group_privacy: Option<String>,
    pub friend_requests: Option<String>,
}

impl UpdateUserInput {
    pub fn from_user(user: &User) -> Self {
        let theme_engine = user
            .theme_engine
            .as_ref()
            .filter(|theme| has_amoled_palette(theme))
            .cloned();

        Self {
            dark_theme: user.dark_theme,
            description: user.description.clone(),
            discord_precache: user.discord_precache,
            excluded_collections: user.excluded_collections.clone(),
            insights: user.insights.clone(),
            items_per_page: user.items_per_page,
            language: user.language.clone(),
            name_color: user.name_color.clone(),
            privacy_policy_accepted: user.privacy_policy_accepted,
            profile_layout: user.profile_layout.clone(),
            public_profile: user.public_profile,
            stored_status: user.stored_status.clone(),
            username: user.username.clone(),
            weather_unit: user.weather_unit.clone(),
            theme_engine,
            pulse: user.pulse,
            group_privacy: user.group_privacy.clone(),
            friend_requests: user.friend_requests.clone(),
        }
    }
}

fn has_amoled_palette(theme: &Value) -> bool {
    match theme.pointer("/theme/amoled/colors") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserVariables {
    pub input: UpdateUserInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserData {
    pub update_user: Option<Value>,
}

impl Operation for UpdateUser {
    const NAME: &'static str = "UpdateUser";
    const DOCUMENT: &'static str = r#"
mutation UpdateUser($input: UpdateUserInput!) {
  updateUser(input: $input)
}
"#;

    type Variables = UpdateUserVariables;
    type Response = UpdateUserData;
}
