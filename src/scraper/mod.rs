pub mod fetcher;
pub mod live;
pub mod traits;

pub use fetcher::HttpFetcher;
pub use live::LiveScraper;
pub use traits::PageFetcher;
