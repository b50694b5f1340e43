use serde::{Deserialize, Deserializer, Serialize};

// Remote ids are numeric (GraphQL `Float`/`Int`), wrapped so they cannot be mixed up.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Account id.
    UserId
);
numeric_id!(
    /// Conversation id.
    ChatId
);
numeric_id!(
    /// Id of the membership record joining the session user to a chat.
    AssociationId
);
numeric_id!(MessageId);
numeric_id!(CollectionId);

/// Field deserializer that reads an explicit `null` as the type's default.
/// Absent fields are covered by the container-level `#[serde(default)]`.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
