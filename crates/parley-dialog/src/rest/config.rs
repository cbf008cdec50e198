//! REST client configuration.

use std::time::Duration;

/// REST backend client configuration.
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl RestConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
