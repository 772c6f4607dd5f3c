use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use super::{FetchStrategy, FetchedPage, PageFetcher, USER_AGENT};
use crate::error::ScrapeError;

/// Direct HTTP GET. Sees only the HTML the server sends.
pub struct StaticFetcher {
    client: reqwest::Client,
}

impl StaticFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn browser_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        header::HeaderValue::from_static("1"),
    );
    headers
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Static
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        tracing::info!(url, "fetching roster page over HTTP");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::load(format!("network/timeout: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::load(format!("HTTP {}", status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::load(format!("network/timeout: {}", e)))?;

        tracing::info!(bytes = html.len(), "downloaded roster page");
        Ok(FetchedPage {
            url: url.to_string(),
            html,
        })
    }
}
