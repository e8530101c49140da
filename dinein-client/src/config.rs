//! Client configuration

use std::time::Duration;

/// Client configuration for connecting to the dine-in server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Upper bound for checkout / payment; past it the outcome is uncertain
    pub mutation_timeout: Duration,

    /// New-order / notification detection
    pub fast_poll_interval: Duration,

    /// Full table refresh
    pub slow_poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            mutation_timeout: Duration::from_secs(10),
            fast_poll_interval: Duration::from_secs(5),
            slow_poll_interval: Duration::from_secs(30),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mutation_timeout(mut self, timeout: Duration) -> Self {
        self.mutation_timeout = timeout;
        self
    }

    /// Set both polling cadences
    pub fn with_poll_intervals(mut self, fast: Duration, slow: Duration) -> Self {
        self.fast_poll_interval = fast;
        self.slow_poll_interval = slow;
        self
    }

    /// Create an HTTP backend from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
