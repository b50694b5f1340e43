//! # flowinity-api
//!
//! Typed access to the Flowinity GraphQL API: the document catalog, the
//! request/response envelope and the transport seam.

pub mod client;
pub mod documents;
pub mod graphql;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

mod error;

pub use client::ApiClient;
pub use error::ApiError;
pub use graphql::{GraphQlRequest, GraphQlResponse, NoVariables, Operation};
pub use transport::{HttpTransport, Transport};
