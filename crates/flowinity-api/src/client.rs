use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::graphql::Operation;
use crate::transport::Transport;

/// Typed front for a [`Transport`]. Cheap to clone; every store of a session
/// shares one.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Run `O` once against the remote API. Always goes to the network; the
    /// client keeps no response cache.
    pub async fn execute<O: Operation>(&self, variables: &O::Variables) -> Result<O::Response> {
        let request = O::request(variables)?;
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(operation = O::NAME, error = %e, "request failed");
            e
        })?;
        let data = response.into_data::<O>()?;
        debug!(operation = O::NAME, "request completed");
        Ok(data)
    }

    pub fn set_token(&self, token: Option<String>) {
        self.transport.set_token(token);
    }
}
