//! # Fetcher Configuration Module
//!
//! Configuration for retrieving the page under analysis. Origin servers are
//! much less likely to block a request that looks like it came from a desktop
//! browser, so the defaults carry a full set of browser navigation headers.
//!
//! ## Key Components
//!
//! - `FetcherConfig`: timeout, redirect budget and request headers
//! - `FetcherConfigBuilder`: builder pattern implementation for easier configuration

use std::time::Duration;

/// Browser User-Agent sent with every page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the page fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Overall request timeout in milliseconds
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// User agent to use for requests
    pub user_agent: String,

    /// Additional request headers, sent in order
    pub headers: Vec<(String, String)>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 12_000,
            max_redirects: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: vec![
                (
                    "Accept".to_string(),
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                        .to_string(),
                ),
                ("Accept-Language".to_string(), "en-US,en;q=0.9,pt;q=0.8".to_string()),
                ("DNT".to_string(), "1".to_string()),
                ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
                ("Sec-Fetch-Dest".to_string(), "document".to_string()),
                ("Sec-Fetch-Mode".to_string(), "navigate".to_string()),
                ("Sec-Fetch-Site".to_string(), "none".to_string()),
            ],
        }
    }
}

/// Builder for FetcherConfig
#[derive(Debug, Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: FetcherConfig::default(),
        }
    }

    /// Set the request timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Set the maximum number of redirects to follow
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add or replace a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .config
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.config.headers.push((name, value)),
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

impl FetcherConfig {
    /// Create a new builder
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::new()
    }

    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
