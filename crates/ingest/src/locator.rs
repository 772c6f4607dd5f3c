use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

pub(crate) fn compile(selectors: &[String]) -> Result<Vec<Selector>, ScrapeError> {
    selectors
        .iter()
        .map(|raw| {
            Selector::parse(raw)
                .map_err(|e| ScrapeError::Config(format!("invalid selector '{}': {}", raw, e)))
        })
        .collect()
}

/// Finds member cards, trying each selector until one matches.
#[derive(Debug)]
pub struct CardLocator {
    candidates: Vec<Selector>,
}

impl CardLocator {
    pub fn new(selectors: &[String]) -> Result<Self, ScrapeError> {
        Ok(Self {
            candidates: compile(selectors)?,
        })
    }

    /// Cards in document order. Empty when no candidate matches.
    pub fn locate<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for (idx, selector) in self.candidates.iter().enumerate() {
            let cards: Vec<_> = document.select(selector).collect();
            if !cards.is_empty() {
                tracing::debug!(candidate = idx, count = cards.len(), "card selector matched");
                return cards;
            }
        }
        Vec::new()
    }
}
