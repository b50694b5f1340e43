//! Well-known local storage keys.

/// Keys under which the client persists state between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Raw session token.
    Token,
    /// Serialized snapshot of the session user.
    UserStore,
    /// Serialized chat list.
    ChatStore,
    /// JSON array of trusted embed domains.
    TrustedDomains,
    /// JSON map of association id to draft text.
    Drafts,
    /// JSON map of emoji to usage count.
    Emoji,
    /// `"true"` / `"false"`: member sidebar visibility.
    MemberList,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        StorageKey::Token,
        StorageKey::UserStore,
        StorageKey::ChatStore,
        StorageKey::TrustedDomains,
        StorageKey::Drafts,
        StorageKey::Emoji,
        StorageKey::MemberList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::UserStore => "userStore",
            StorageKey::ChatStore => "chatStore",
            StorageKey::TrustedDomains => "trustedDomainsStore",
            StorageKey::Drafts => "draftStore",
            StorageKey::Emoji => "emojiStore",
            StorageKey::MemberList => "memberList",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
