//! flip-scout: tiered product sourcing for a conversational shopping
//! assistant. Live Flipkart scraping with selector-fallback extraction,
//! an affiliate API fallback, deterministic sample data as the floor,
//! and a short-lived cache in front of all three.

pub mod affiliate;
pub mod cache;
pub mod config;
pub mod extractor;
pub mod model;
pub mod ratelimit;
pub mod sample;
pub mod scraper;
pub mod service;
pub mod taxonomy;
pub mod utils;

pub use config::{load_config, AppConfig};
pub use model::{DealsResult, ProductListing, SearchResult, SourceTier};
pub use service::FlipkartService;
