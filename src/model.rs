// Core structs: ProductListing, result envelopes, tier errors
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which sourcing strategy produced a listing. Tiers are tried in
/// declaration order: live scrape first, affiliate API second, sample
/// data last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    Live,
    Api,
    Sample,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Live => "live",
            SourceTier::Api => "api",
            SourceTier::Sample => "sample",
        }
    }
}

/// One normalized product, regardless of which tier it came from.
/// Immutable once built; prices are whole rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub selling_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: String,
    pub brand: String,
    pub availability_label: String,
    pub source_tier: SourceTier,
}

/// Rounded percentage drop from list price to selling price.
/// Returns None unless the pair is sane (list > selling); a swapped
/// pair means the wrong element got scraped, not a negative deal.
pub fn derive_discount(list_price: u64, selling_price: u64) -> Option<u8> {
    if list_price == 0 || selling_price >= list_price {
        return None;
    }
    let drop = (list_price - selling_price) as f64 / list_price as f64 * 100.0;
    Some(drop.round() as u8)
}

pub fn clamp_rating(raw: f32) -> f32 {
    raw.clamp(0.0, 5.0)
}

/// Envelope returned by `search`. `success == false` implies an empty
/// product list and a populated `error_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub success: bool,
    pub query: String,
    pub products: Vec<ProductListing>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SearchResult {
    pub fn found(query: &str, products: Vec<ProductListing>, source_note: Option<String>) -> Self {
        Self {
            success: true,
            query: query.to_string(),
            total: products.len(),
            products,
            source_note,
            error_message: None,
        }
    }

    pub fn failure(query: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            query: query.to_string(),
            products: Vec::new(),
            total: 0,
            source_note: None,
            error_message: Some(message.into()),
        }
    }
}

/// Envelope returned by `deals`. Same shape as `SearchResult` but keyed
/// by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealsResult {
    pub success: bool,
    pub category: String,
    pub products: Vec<ProductListing>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DealsResult {
    pub fn found(category: &str, products: Vec<ProductListing>, source_note: Option<String>) -> Self {
        Self {
            success: true,
            category: category.to_string(),
            total: products.len(),
            products,
            source_note,
            error_message: None,
        }
    }

    pub fn failure(category: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            category: category.to_string(),
            products: Vec::new(),
            total: 0,
            source_note: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("no products extracted from page")]
    NoProducts,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("affiliate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("affiliate API returned HTTP {0}")]
    Status(u16),
    #[error("unrecognized affiliate payload shape")]
    MalformedPayload,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Json(#[from] serde_json::Error),
}
