use serde::{Deserialize, Serialize};

use flowinity_shared::{AssociationId, Embed};

use crate::graphql::Operation;

/// Ask the server to resolve a link embed ahead of sending the message that
/// contains it.
pub struct EmbedPrecache;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedPrecacheInput {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_id: Option<AssociationId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedPrecacheVariables {
    pub input: EmbedPrecacheInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedPrecacheData {
    pub embed_resolution_precache: Option<Embed>,
}

impl Operation for EmbedPrecache {
    const NAME: &'static str = "EmbedResolutionPrecache";
    const DOCUMENT: &'static str = concat!(
        standard_embed_fragment!(),
        r#"
mutation EmbedResolutionPrecache($input: EmbedPrecacheInput!) {
  embedResolutionPrecache(input: $input) {
    ...StandardEmbed
  }
}
"#
    );

    type Variables = EmbedPrecacheVariables;
    type Response = EmbedPrecacheData;
}
