use crate::model::ScrapeError;

/// Seam between the live scraper and the network. Tests substitute a
/// canned-HTML spy here; production uses `HttpFetcher`.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_search_page(&self, query: &str) -> Result<String, ScrapeError>;
}
