use crate::extractor::FlipkartExtractor;
use crate::model::{ProductListing, ScrapeError};
use crate::scraper::traits::PageFetcher;
use std::sync::Arc;
use tracing::debug;

/// The live tier: fetch the search page, extract listings. A page that
/// extracts to zero products is a tier failure (`NoProducts`), not a
/// success with an empty list — the orchestrator needs to know to try
/// the next source.
pub struct LiveScraper {
    fetcher: Arc<dyn PageFetcher>,
    extractor: FlipkartExtractor,
}

impl LiveScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            extractor: FlipkartExtractor::new(),
        }
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductListing>, ScrapeError> {
        let html = self.fetcher.fetch_search_page(query).await?;
        debug!(query, bytes = html.len(), "extracting listings from live page");
        let products = self.extractor.extract(&html, query, limit);
        if products.is_empty() {
            return Err(ScrapeError::NoProducts);
        }
        Ok(products)
    }
}
