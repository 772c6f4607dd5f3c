use std::path::PathBuf;
use std::time::Duration;

use rollcall_core::{RosterDocument, ScrapeTarget};
use scraper::Html;

use crate::config::IngestConfig;
use crate::error::ScrapeError;
use crate::extractor::FieldExtractor;
use crate::fetcher::{self, FetchedPage, PageFetcher};
use crate::locator::CardLocator;
use crate::serializer::write_roster;

/// Reloads allowed when a page comes back without member cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_reloads: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_reloads: 1,
            delay: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub target: String,
    pub members: usize,
    pub output: PathBuf,
}

/// Compiled card and field selectors for one target.
#[derive(Debug)]
pub struct RosterReader {
    locator: CardLocator,
    extractor: FieldExtractor,
}

impl RosterReader {
    pub fn new(target: &ScrapeTarget) -> Result<Self, ScrapeError> {
        Ok(Self {
            locator: CardLocator::new(&target.selectors.cards)?,
            extractor: FieldExtractor::new(target)?,
        })
    }

    /// Parse the page once and read every card. `None` when no card is found.
    pub fn read(&self, page: &FetchedPage) -> Option<RosterDocument> {
        let document = Html::parse_document(&page.html);
        let cards = self.locator.locate(&document);
        if cards.is_empty() {
            return None;
        }
        tracing::info!(count = cards.len(), "found member cards");

        let mut roster = RosterDocument::new();
        for card in cards {
            let record = self.extractor.extract(card);
            tracing::info!(name = %record.name, party = %record.party, "added member");
            roster.push(record);
        }
        Some(roster)
    }
}

/// Fetch the target page and read every member card on it.
pub async fn scrape_roster(
    fetcher: &dyn PageFetcher,
    reader: &RosterReader,
    target: &ScrapeTarget,
    retry: RetryPolicy,
) -> Result<RosterDocument, ScrapeError> {
    tracing::info!(
        roster = %target.key,
        url = %target.url,
        strategy = %fetcher.strategy(),
        "fetching roster"
    );
    let mut page = fetcher.fetch(&target.url).await?;
    let mut reloads = 0;

    loop {
        if let Some(roster) = reader.read(&page) {
            return Ok(roster);
        }
        if reloads >= retry.max_reloads {
            tracing::error!(reloads, "no member cards found after retry");
            return Err(ScrapeError::load("content not found after retry"));
        }
        reloads += 1;
        tracing::warn!(
            attempt = reloads,
            delay_secs = retry.delay.as_secs(),
            "no member cards found, possible challenge page; waiting before reload"
        );
        tokio::time::sleep(retry.delay).await;
        page = fetcher.reload(&target.url).await?;
    }
}

/// One full run: fetch, extract, release the fetcher, write the file.
///
/// Selectors are compiled before any fetcher starts. Nothing is written
/// when the page cannot be loaded.
pub async fn run(config: &IngestConfig) -> Result<RunSummary, ScrapeError> {
    let reader = RosterReader::new(&config.target)?;
    let fetcher = fetcher::build(config).await?;
    let roster = scrape_roster(fetcher.as_ref(), &reader, &config.target, config.retry).await;
    fetcher.shutdown().await;
    let roster = roster?;

    write_roster(&config.output, &roster)?;

    Ok(RunSummary {
        target: config.target.key.clone(),
        members: roster.len(),
        output: config.output.clone(),
    })
}
