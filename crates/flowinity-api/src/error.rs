use thiserror::Error;

/// Errors produced while talking to the remote GraphQL API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered but reported GraphQL errors.
    #[error("GraphQL error in {operation}: {}", messages.join("; "))]
    GraphQl {
        operation: &'static str,
        messages: Vec<String>,
    },

    #[error("Response to {0} carried no data")]
    MissingData(&'static str),

    #[error("Failed to encode variables for {operation}: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode response to {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
