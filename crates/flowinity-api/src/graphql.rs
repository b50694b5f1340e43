//! GraphQL request/response envelope and the [`Operation`] trait every
//! catalog document implements.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// A typed GraphQL document.
///
/// `DOCUMENT` is the exact text sent to the server, including any fragments
/// it spreads; `Variables` and `Response` describe the `variables` object and
/// the `data` object of the reply.
pub trait Operation {
    /// Operation name as declared in the document.
    const NAME: &'static str;
    const DOCUMENT: &'static str;

    type Variables: Serialize + Send + Sync;
    type Response: DeserializeOwned;

    fn request(variables: &Self::Variables) -> Result<GraphQlRequest> {
        let variables = serde_json::to_value(variables).map_err(|source| ApiError::Encode {
            operation: Self::NAME,
            source,
        })?;
        Ok(GraphQlRequest {
            query: Self::DOCUMENT,
            operation_name: Self::NAME,
            variables,
        })
    }
}

/// Variables of documents that take none. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables {}

/// Body of a GraphQL HTTP POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
    #[serde(default)]
    pub path: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

impl GraphQlResponse {
    /// Interpret a raw reply to `O`: any reported error fails the whole
    /// operation, otherwise `data` is decoded into `O::Response`.
    pub fn into_data<O: Operation>(self) -> Result<O::Response> {
        if !self.errors.is_empty() {
            return Err(ApiError::GraphQl {
                operation: O::NAME,
                messages: self.errors.into_iter().map(|e| e.message).collect(),
            });
        }
        let data = match self.data {
            Some(Value::Null) | None => return Err(ApiError::MissingData(O::NAME)),
            Some(data) => data,
        };
        serde_json::from_value(data).map_err(|source| ApiError::Decode {
            operation: O::NAME,
            source,
        })
    }
}
