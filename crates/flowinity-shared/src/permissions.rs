//! Chat permission tags carried by a [`ChatAssociation`](crate::chat::ChatAssociation).

use serde::{Deserialize, Serialize};

/// A role-like permission tag granted to a chat member.
///
/// Tags the client does not know about deserialize to [`ChatPermission::Unknown`]
/// so a newer server never breaks the chat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatPermission {
    Admin,
    Trusted,
    SendMessages,
    ReadChat,
    Embeds,
    PinMessages,
    DeleteMessages,
    ManageRanks,
    ViewAuditLog,
    ViewInsights,
    ManageChat,
    ManageIntegrations,
    Call,
    OverrideEntities,
    #[serde(other)]
    Unknown,
}

impl ChatPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Trusted => "TRUSTED",
            Self::SendMessages => "SEND_MESSAGES",
            Self::ReadChat => "READ_CHAT",
            Self::Embeds => "EMBEDS",
            Self::PinMessages => "PIN_MESSAGES",
            Self::DeleteMessages => "DELETE_MESSAGES",
            Self::ManageRanks => "MANAGE_RANKS",
            Self::ViewAuditLog => "VIEW_AUDIT_LOG",
            Self::ViewInsights => "VIEW_INSIGHTS",
            Self::ManageChat => "MANAGE_CHAT",
            Self::ManageIntegrations => "MANAGE_INTEGRATIONS",
            Self::Call => "CALL",
            Self::OverrideEntities => "OVERRIDE_ENTITIES",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ChatPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a member holding `granted` passes a check for any of `requested`.
///
/// A tag grants access when it is itself requested, or when it is `ADMIN` and
/// the check does not ask for `TRUSTED` (admins are not implicitly trusted).
pub fn grants_any(granted: &[ChatPermission], requested: &[ChatPermission]) -> bool {
    let wants_trusted = requested.contains(&ChatPermission::Trusted);
    granted.iter().any(|perm| {
        requested.contains(perm) || (!wants_trusted && *perm == ChatPermission::Admin)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_match() {
        let granted = [ChatPermission::SendMessages, ChatPermission::Embeds];
        assert!(grants_any(&granted, &[ChatPermission::Embeds]));
        assert!(!grants_any(&granted, &[ChatPermission::PinMessages]));
    }

    #[test]
    fn test_admin_implies_everything_but_trusted() {
        let granted = [ChatPermission::Admin];
        assert!(grants_any(&granted, &[ChatPermission::Admin]));
        assert!(grants_any(&granted, &[ChatPermission::ManageRanks]));
        assert!(!grants_any(&granted, &[ChatPermission::Trusted]));
        assert!(!grants_any(
            &granted,
            &[ChatPermission::Trusted, ChatPermission::ManageRanks]
        ));
    }

    #[test]
    fn test_unknown_tag_deserializes() {
        let perms: Vec<ChatPermission> =
            serde_json::from_str(r#"["ADMIN", "SOMETHING_NEW"]"#).unwrap();
        assert_eq!(perms, vec![ChatPermission::Admin, ChatPermission::Unknown]);
    }
}
