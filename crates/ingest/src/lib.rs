pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod locator;
pub mod pipeline;
pub mod serializer;

pub use config::IngestConfig;
pub use error::ScrapeError;
pub use extractor::{try_read_attr, try_read_text, FieldExtractor};
pub use fetcher::{FetchStrategy, FetchedPage, PageFetcher, StaticFetcher};
pub use locator::CardLocator;
pub use pipeline::{run, scrape_roster, RetryPolicy, RosterReader, RunSummary};
pub use serializer::{read_roster, write_roster};

#[cfg(feature = "browser")]
pub use fetcher::RenderedFetcher;
