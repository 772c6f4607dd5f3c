use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::config::IngestConfig;
use crate::error::ScrapeError;

#[cfg(feature = "browser")]
pub mod browser;
pub mod http;

pub use http::StaticFetcher;

#[cfg(feature = "browser")]
pub use browser::RenderedFetcher;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Plain HTTP GET; no script execution.
    Static,
    /// Chromium session; runs page scripts and waits out challenge pages.
    Rendered,
}

impl FromStr for FetchStrategy {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "http" => Ok(Self::Static),
            "rendered" | "browser" => Ok(Self::Rendered),
            other => Err(ScrapeError::Config(format!(
                "unknown fetch strategy '{}' (expected 'static' or 'rendered')",
                other
            ))),
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Rendered => f.write_str("rendered"),
        }
    }
}

/// Raw HTML of a loaded page.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn strategy(&self) -> FetchStrategy;

    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError>;

    /// Load the page again after it came back without member cards.
    async fn reload(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        self.fetch(url).await
    }

    /// Release external resources. Called once, on every exit path.
    async fn shutdown(&self) {}
}

/// Build the fetcher selected by configuration.
pub async fn build(config: &IngestConfig) -> Result<Box<dyn PageFetcher>, ScrapeError> {
    match config.strategy {
        FetchStrategy::Static => Ok(Box::new(StaticFetcher::new(config.http_timeout)?)),
        FetchStrategy::Rendered => build_rendered(config).await,
    }
}

#[cfg(feature = "browser")]
async fn build_rendered(config: &IngestConfig) -> Result<Box<dyn PageFetcher>, ScrapeError> {
    let fetcher = RenderedFetcher::launch(browser::BrowserOptions {
        headless: config.headless,
        ready_timeout: config.ready_timeout,
        ready_selector: config.target.selectors.cards.join(", "),
    })
    .await?;
    Ok(Box::new(fetcher))
}

#[cfg(not(feature = "browser"))]
async fn build_rendered(_config: &IngestConfig) -> Result<Box<dyn PageFetcher>, ScrapeError> {
    Err(ScrapeError::Config(
        "rendered fetch requires building with the `browser` feature".to_string(),
    ))
}
