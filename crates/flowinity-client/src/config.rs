//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so a local development client starts with no
//! configuration at all.

use std::path::PathBuf;
use std::time::Duration;

use flowinity_shared::constants::{DEFAULT_API_URL, DEFAULT_LANGUAGE, DEFAULT_REQUEST_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint.
    /// Env: `FLOWINITY_API_URL`
    /// Default: `http://localhost:34582/graphql`
    pub api_url: String,

    /// Directory holding the local storage database.
    /// Env: `FLOWINITY_DATA_DIR`
    /// Default: `None` (platform data directory).
    pub data_dir: Option<PathBuf>,

    /// Locale used when the session user has no language set.
    /// Env: `FLOWINITY_DEFAULT_LANGUAGE`
    /// Default: `en`
    pub default_language: String,

    /// Per-request HTTP timeout.
    /// Env: `FLOWINITY_REQUEST_TIMEOUT_SECS`
    /// Default: 30 seconds.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. `from_env` is this
    /// with `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("FLOWINITY_API_URL") {
            if url.starts_with("http://") || url.starts_with("https://") {
                config.api_url = url;
            } else {
                tracing::warn!(value = %url, "Invalid FLOWINITY_API_URL, using default");
            }
        }

        if let Some(dir) = lookup("FLOWINITY_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(language) = lookup("FLOWINITY_DEFAULT_LANGUAGE") {
            let language = language.trim();
            if language.is_empty() {
                tracing::warn!("Empty FLOWINITY_DEFAULT_LANGUAGE, using default");
            } else {
                config.default_language = language.to_string();
            }
        }

        if let Some(secs) = lookup("FLOWINITY_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.request_timeout = Duration::from_secs(parsed),
                _ => {
                    tracing::warn!(
                        value = %secs,
                        "Invalid FLOWINITY_REQUEST_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        config
    }
}
