/// Application name
pub const APP_NAME: &str = "Flowinity";

/// Plan `internalName` that marks a paid (gold) subscription
pub const GOLD_PLAN: &str = "GOLD";

/// Locale used when the session user has no stored language
pub const DEFAULT_LANGUAGE: &str = "en";

/// Display name shown for a counterpart whose account no longer exists
pub const DELETED_USER: &str = "Deleted User";

/// Server-side placeholder name for groups that were never renamed
pub const UNNAMED_GROUP: &str = "Unnamed Group";

/// Title used when no conversation is selected
pub const NO_CHAT_TITLE: &str = "Communications";

/// Name of the placeholder returned by chat lookups that miss
pub const UNKNOWN_CHAT: &str = "Unknown Chat";

/// Number of member names spelled out in a synthesized group name
pub const GROUP_NAME_MEMBERS: usize = 3;

/// Rank colour sentinel meaning "use the surrounding text colour"
pub const INHERIT_COLOR: &str = "inherit";

/// Maximum gap, in whole minutes, between two merged messages
pub const MERGE_WINDOW_MINUTES: i64 = 5;

/// Unread totals at or above this value are shown as [`BADGE_OVERFLOW`]
pub const BADGE_OVERFLOW_THRESHOLD: u64 = 1000;
pub const BADGE_OVERFLOW: &str = "1k+";

/// Default GraphQL endpoint of a local development instance
pub const DEFAULT_API_URL: &str = "http://localhost:34582/graphql";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
