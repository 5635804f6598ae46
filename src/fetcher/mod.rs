//! # Page Fetcher Module
//!
//! Retrieves the raw HTML of the page under analysis. This is the first stage
//! of the analysis pipeline and the only one, besides URL parsing, whose
//! failure aborts an analysis: without a page there is nothing to extract.
//!
//! ## Key Components
//!
//! - `RawPage`: the fetched document together with its status and final URL
//! - `PageFetcher`: the seam the pipeline fetches through
//! - `HttpPageFetcher`: reqwest-backed implementation with browser-like headers,
//!   a bounded timeout and a bounded redirect count
//! - `StaticFetcher`: canned responses for tests and offline runs

mod config;
mod error;

pub use config::{DEFAULT_USER_AGENT, FetcherConfig, FetcherConfigBuilder};
pub use error::FetchError;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use std::future::Future;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A fetched page, consumed once by the extractor
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL that was requested
    pub url: Url,

    /// URL after redirects
    pub final_url: Url,

    /// Response body decoded as text
    pub html: String,

    /// HTTP status of the final response
    pub http_status: u16,
}

/// Something that can turn a URL into a [`RawPage`]
pub trait PageFetcher {
    /// Fetch the page at `url`
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<RawPage, FetchError>> + Send;
}

/// Page fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl HttpPageFetcher {
    /// Create a fetcher from the given configuration
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::Config(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Config(format!("invalid value for '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the configuration this fetcher was built with
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    fn classify_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout_ms)
        } else {
            FetchError::Http(err)
        }
    }
}

impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self, url), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<RawPage, FetchError> {
        debug!("Fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            warn!("Page fetch returned status {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| self.classify_error(e))?;

        info!(
            "Fetched page - status {}, {} bytes, final url {}",
            status,
            html.len(),
            final_url
        );

        Ok(RawPage {
            url: url.clone(),
            final_url,
            html,
            http_status: status.as_u16(),
        })
    }
}

/// Fetcher that answers every request with the same canned outcome
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    outcome: StaticOutcome,
}

#[derive(Debug, Clone)]
enum StaticOutcome {
    Page { html: String, status: u16 },
    Timeout(u64),
    Status(u16),
}

impl StaticFetcher {
    /// Serve `html` with status 200
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            outcome: StaticOutcome::Page {
                html: html.into(),
                status: 200,
            },
        }
    }

    /// Fail every fetch with a timeout
    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            outcome: StaticOutcome::Timeout(timeout_ms),
        }
    }

    /// Fail every fetch with the given status
    pub fn status(status: u16) -> Self {
        Self {
            outcome: StaticOutcome::Status(status),
        }
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawPage, FetchError> {
        match &self.outcome {
            StaticOutcome::Page { html, status } => Ok(RawPage {
                url: url.clone(),
                final_url: url.clone(),
                html: html.clone(),
                http_status: *status,
            }),
            StaticOutcome::Timeout(ms) => Err(FetchError::Timeout(*ms)),
            StaticOutcome::Status(status) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn fetcher() -> HttpPageFetcher {
        HttpPageFetcher::new(FetcherConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/article")
            .match_header("user-agent", Matcher::Regex("^Mozilla/5.0".to_string()))
            .match_header("accept-language", "en-US,en;q=0.9,pt;q=0.8")
            .match_header("sec-fetch-mode", "navigate")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><p>hello</p></body></html>")
            .expect(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/article", server.url())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.http_status, 200);
        assert!(page.html.contains("<p>hello</p>"));
        assert_eq!(page.url, url);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let result = fetcher().fetch(&url).await;

        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect_and_reports_final_url() {
        let mut server = Server::new_async().await;
        let redirect = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let target = server
            .mock("GET", "/new")
            .with_status(200)
            .with_body("<p>moved here</p>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/old", server.url())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.final_url.path(), "/new");
        assert!(page.html.contains("moved here"));
        redirect.assert_async().await;
        target.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_redirect_budget() {
        let mut server = Server::new_async().await;
        let _loop = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect_at_least(1)
            .create_async()
            .await;

        let fetcher = HttpPageFetcher::new(FetcherConfig::builder().max_redirects(3).build()).unwrap();
        let url = Url::parse(&format!("{}/loop", server.url())).unwrap();
        let result = fetcher.fetch(&url).await;

        assert!(matches!(result, Err(FetchError::Http(_))));
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let config = FetcherConfig::builder().header("bad header", "x").build();
        assert!(matches!(
            HttpPageFetcher::new(config),
            Err(FetchError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_static_fetcher_outcomes() {
        let url = Url::parse("https://example.com/").unwrap();

        let page = StaticFetcher::html("<p>x</p>").fetch(&url).await.unwrap();
        assert_eq!(page.http_status, 200);

        assert!(matches!(
            StaticFetcher::timeout(12_000).fetch(&url).await,
            Err(FetchError::Timeout(12_000))
        ));
        assert!(matches!(
            StaticFetcher::status(503).fetch(&url).await,
            Err(FetchError::Status { status: 503, .. })
        ));
    }
}
