//! Link embeds resolved server-side for messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Embed {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub media: Vec<EmbedMedia>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub text: Vec<EmbedText>,
    pub metadata: Option<EmbedMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedMedia {
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    pub attachment: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub is_internal: bool,
    pub video_embed_url: Option<String>,
    pub mime_type: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedText {
    pub image_proxy_url: Option<String>,
    pub text: Option<String>,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub heading: bool,
    #[serde(deserialize_with = "crate::types::null_default")]
    pub sub_text: bool,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedMetadata {
    #[serde(deserialize_with = "crate::types::null_default")]
    pub restricted: bool,
    pub url: Option<String>,
    pub site_name: Option<String>,
    pub site_icon: Option<String>,
    #[serde(rename = "type")]
    pub embed_type: Option<String>,
    pub id: Option<String>,
}
