//! # flowinity-client
//!
//! Client-side core of Flowinity: session stores, the route table with its
//! session guard, and the [`AppContext`] that wires them to the API and to
//! local storage. Rendering is left to the host.

pub mod config;
pub mod context;
pub mod error;
pub mod router;
pub mod stores;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::ClientError;
pub use router::{Navigation, Router};

const DEFAULT_LOG_FILTER: &str = "flowinity_client=debug,flowinity_api=info,flowinity_store=info,warn";

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
