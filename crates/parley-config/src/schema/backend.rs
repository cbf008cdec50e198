//! Dialog backend connection settings.

use serde::{Deserialize, Serialize};

/// Default Rasa REST channel endpoint on a local server.
pub const DEFAULT_BACKEND_ENDPOINT: &str = "http://localhost:5005/webhooks/rest/webhook";

/// REST backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Full URL of the webhook that accepts `{message, sender_id}` posts.
    pub endpoint: String,
    /// Whole-request timeout in seconds (valid range: 1-120).
    pub timeout_secs: u32,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BACKEND_ENDPOINT.into(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}
