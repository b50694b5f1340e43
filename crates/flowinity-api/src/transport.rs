//! The seam between the client and the remote API.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};

/// Executes one GraphQL request and returns the raw reply envelope.
///
/// Exactly one attempt is made per call; retries are left to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse>;

    /// Replace the session token sent with subsequent requests.
    fn set_token(&self, token: Option<String>);
}

/// GraphQL over HTTP POST.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flowinity-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: RwLock::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
        debug!(operation = request.operation_name, "sending GraphQL request");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = self.current_token() {
            builder = builder.header(reqwest::header::AUTHORIZATION, token);
        }

        let resp = builder.send().await?;
        let status = resp.status();

        // GraphQL servers report resolver errors with 200 and validation
        // errors with 400; both carry an envelope worth decoding.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse = resp.json().await?;
        Ok(envelope)
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}
