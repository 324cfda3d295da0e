//! Page fetching.
//!
//! Scrapers depend on the [`PageFetcher`] trait rather than on `reqwest`
//! directly, so parsing drivers can be exercised against in-memory pages.
//! There is no retry logic: a failed fetch is reported once and the caller
//! moves on.

use crate::error::ScrapeError;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

/// Default User-Agent; the site serves the same markup to browsers and scripts.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Capability to turn a URL into raw markup.
pub trait PageFetcher {
    /// Fetch `url` and return its body.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Transport`] when no response was received,
    /// [`ScrapeError::Status`] when the status is not 200.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Serves pages from memory; unknown URLs answer 404.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    impl StaticFetcher {
        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;

    #[tokio::test]
    async fn test_static_fetcher_serves_known_pages() {
        let fetcher = StaticFetcher::default().with_page("https://example.com/a", "<p>a</p>");
        assert_eq!(fetcher.fetch("https://example.com/a").await.unwrap(), "<p>a</p>");
    }

    #[tokio::test]
    async fn test_static_fetcher_reports_missing_pages_as_status() {
        let fetcher = StaticFetcher::default();
        let err = fetcher.fetch("https://example.com/missing").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
    }

    #[test]
    fn test_http_fetcher_builds_with_custom_agent() {
        assert!(HttpFetcher::new("mathraining_harvest/0.1").is_ok());
    }
}
