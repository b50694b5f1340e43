//! Collection listings.

use serde::{Deserialize, Serialize};

use flowinity_shared::CollectionPage;

use crate::graphql::{NoVariables, Operation};

// ---------------------------------------------------------------------------
// UserLightCollections
// ---------------------------------------------------------------------------

/// Minimal listing used by pickers, plus the pending invite count.
pub struct UserLightCollections;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserLightCollectionsData {
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub collections: CollectionPage,
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub collection_invites_count: i64,
}

impl Operation for UserLightCollections {
    const NAME: &'static str = "UserLightCollectionsQuery";
    const DOCUMENT: &'static str = r#"
query UserLightCollectionsQuery {
  collections {
    items {
      preview {
        updatedAt
      }
      updatedAt
      createdAt
      avatar
      banner
      itemCount
      id
      image
      shareLink
      permissionsMetadata {
        write
        read
        configure
      }
      name
    }
  }
  collectionInvitesCount
}
"#;

    type Variables = NoVariables;
    type Response = UserLightCollectionsData;
}

// ---------------------------------------------------------------------------
// UserCollections
// ---------------------------------------------------------------------------

/// Full paged listing with share records.
pub struct UserCollections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionFilter {
    All,
    Owned,
    Shared,
    Write,
    Configure,
    Read,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCollectionsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<CollectionFilter>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub only_invited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCollectionsVariables {
    pub input: UserCollectionsInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserCollectionsData {
    #[serde(deserialize_with = "flowinity_shared::null_default")]
    pub collections: CollectionPage,
}

impl Operation for UserCollections {
    const NAME: &'static str = "UserCollectionsQuery";
    const DOCUMENT: &'static str = r#"
query UserCollectionsQuery($input: UserCollectionsInput!) {
  collections(input: $input) {
    items {
      id
      name
      image
      userId
      shareLink
      user {
        username
        id
        createdAt
        administrator
        moderator
        avatar
      }
      preview {
        attachment {
          attachment
          id
        }
      }
      users {
        id
        createdAt
        updatedAt
        collectionId
        read
        write
        configure
        accepted
        recipientId
        senderId
        identifier
        user {
          username
          id
          administrator
          moderator
          avatar
        }
        sender {
          username
          id
          administrator
          moderator
          avatar
        }
      }
      recipient {
        id
        createdAt
        updatedAt
        collectionId
        read
        write
        configure
        accepted
        recipientId
        senderId
      }
      shared
      itemCount
      permissionsMetadata {
        write
        read
        configure
      }
    }
    pager {
      totalItems
      currentPage
      pageSize
      totalPages
      startPage
      endPage
      startIndex
      endIndex
      pages
    }
  }
}
"#;

    type Variables = UserCollectionsVariables;
    type Response = UserCollectionsData;
}
