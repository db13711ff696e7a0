//! Binder configuration

use std::collections::HashSet;
use std::time::Duration;

/// Configuration for the binder
#[derive(Debug, Clone)]
pub struct BinderConfig {
    /// Base URL of the service (e.g. "https://api.example.com")
    pub host: Option<String>,
    /// Path prefix for the API version (e.g. "/1.1")
    pub api_root: String,
    /// Number of allowed retries after the first attempt
    pub retry_count: u32,
    /// Fixed pause between retry attempts
    pub retry_delay: Duration,
    /// Status codes considered retryable
    pub retry_errors: HashSet<u16>,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Request gzip-compressed response bodies
    pub compression: bool,
    /// Wait out server rate limit windows instead of consuming the retry budget
    pub wait_on_rate_limit: bool,
    /// Log a notification when waiting on a rate limit window
    pub wait_on_rate_limit_notify: bool,
    /// Safety margin added to computed rate limit waits
    pub rate_limit_margin: Duration,
    /// Upstream proxy URL
    pub proxy: Option<String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_root: String::new(),
            retry_count: 0,
            retry_delay: Duration::ZERO,
            retry_errors: [429, 500, 502, 503, 504].into_iter().collect(),
            timeout: Duration::from_secs(60),
            compression: false,
            wait_on_rate_limit: false,
            wait_on_rate_limit_notify: false,
            rate_limit_margin: Duration::from_secs(5),
            proxy: None,
            user_agent: format!("restbind/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BinderConfig {
    /// Create a new config builder
    pub fn builder() -> BinderConfigBuilder {
        BinderConfigBuilder::default()
    }
}

/// Builder for binder config
#[derive(Default)]
pub struct BinderConfigBuilder {
    config: BinderConfig,
}

impl BinderConfigBuilder {
    /// Set the service base URL
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    /// Set the API root path prefix
    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.config.api_root = root.into();
        self
    }

    /// Set the number of allowed retries
    pub fn retry_count(mut self, count: u32) -> Self {
        self.config.retry_count = count;
        self
    }

    /// Set the fixed inter-attempt pause
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set the retryable status codes
    pub fn retry_errors(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.config.retry_errors = codes.into_iter().collect();
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Request compressed response bodies
    pub fn compression(mut self) -> Self {
        self.config.compression = true;
        self
    }

    /// Wait out server rate limit windows
    pub fn wait_on_rate_limit(mut self) -> Self {
        self.config.wait_on_rate_limit = true;
        self
    }

    /// Log a notification when waiting on a rate limit window
    pub fn wait_on_rate_limit_notify(mut self) -> Self {
        self.config.wait_on_rate_limit_notify = true;
        self
    }

    /// Set the safety margin added to computed rate limit waits
    pub fn rate_limit_margin(mut self, margin: Duration) -> Self {
        self.config.rate_limit_margin = margin;
        self
    }

    /// Route requests through an upstream proxy
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = Some(url.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> BinderConfig {
        self.config
    }
}
