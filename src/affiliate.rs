//! Affiliate API tier.
//!
//! The affiliate feed has shipped several payload shapes over time and
//! never versioned any of them, so normalization probes a list of known
//! field aliases per attribute and takes the first non-empty match.

use crate::model::{clamp_rating, derive_discount, ApiError, ProductListing, SourceTier};
use crate::taxonomy::{brand_from_title, category_for_query};
use crate::utils::absolutize_url;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_URL: &str = "https://affiliate-api.flipkart.net/affiliate/1.0/search.json";

/// Seam between the orchestrator and the affiliate API, mirroring the
/// fetcher seam on the live tier.
#[async_trait::async_trait]
pub trait AffiliateGateway: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductListing>, ApiError>;
}

pub struct AffiliateClient {
    client: Client,
    affiliate_id: String,
    affiliate_token: String,
}

impl AffiliateClient {
    pub fn new(
        affiliate_id: String,
        affiliate_token: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            affiliate_id,
            affiliate_token,
        })
    }
}

#[async_trait::async_trait]
impl AffiliateGateway for AffiliateClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductListing>, ApiError> {
        let result_count = limit.to_string();
        let response = self
            .client
            .get(API_URL)
            .header("Fk-Affiliate-Id", &self.affiliate_id)
            .header("Fk-Affiliate-Token", &self.affiliate_token)
            .query(&[("query", query), ("resultCount", result_count.as_str())])
            .send()
            .await?;

        let status = response.status();
        debug!(query, %status, "affiliate search response");
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let products = normalize_payload(&payload, query, limit)?;
        Ok(products)
    }
}

/// Turns whichever payload shape the API returned into listings.
pub fn normalize_payload(
    payload: &Value,
    query: &str,
    limit: usize,
) -> Result<Vec<ProductListing>, ApiError> {
    let items = first_array(payload, &["products", "productInfoList", "items", "results"])
        .ok_or(ApiError::MalformedPayload)?;

    let mut listings = Vec::new();
    for (index, item) in items.iter().take(limit).enumerate() {
        // Newer payloads nest the interesting part one level down.
        let info = item.get("productBaseInfoV1").unwrap_or(item);
        if let Some(listing) = normalize_item(info, query, index) {
            listings.push(listing);
        }
    }
    Ok(listings)
}

fn normalize_item(info: &Value, query: &str, index: usize) -> Option<ProductListing> {
    let title = first_string(info, &["title", "productTitle", "name"])?;
    let selling_price = first_money(info, &["sellingPrice", "specialPrice", "price"])?;
    // Swapped pairs keep their raw prices; derive_discount withholds
    // the discount on its own.
    let list_price = first_money(info, &["mrp", "maximumRetailPrice", "listPrice"])
        .filter(|&mrp| mrp != selling_price);

    let id = first_string(info, &["productId", "id", "itemId"])
        .unwrap_or_else(|| format!("api_{}", index));
    let product_url = first_string(info, &["productUrl", "url", "landingUrl"])
        .map(|url| absolutize_url(&url));
    let image_url = first_image(info).map(|url| absolutize_url(&url));
    let in_stock = first_bool(info, &["inStock", "instock", "available"]).unwrap_or(true);
    let rating = first_number(info, &["rating", "averageRating"])
        .map(|raw| clamp_rating(raw as f32));
    let review_count =
        first_money(info, &["reviewCount", "totalReviews", "ratingCount"]).map(|n| n as u32);
    let description = first_string(info, &["description", "productDescription"])
        .unwrap_or_else(|| format!("{} from the Flipkart affiliate catalog.", title));
    let brand =
        first_string(info, &["productBrand", "brand"]).unwrap_or_else(|| brand_from_title(&title));

    Some(ProductListing {
        id,
        description,
        selling_price,
        list_price,
        discount_percent: list_price.and_then(|mrp| derive_discount(mrp, selling_price)),
        in_stock,
        rating,
        review_count,
        purchase_url: product_url.clone(),
        product_url,
        image_url,
        category: category_for_query(query).to_string(),
        brand,
        availability_label: if in_stock { "In Stock" } else { "Out of Stock" }.to_string(),
        source_tier: SourceTier::Api,
        title,
    })
}

fn first_array<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_array))
        .filter(|items| !items.is_empty())
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn first_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| value.get(key).and_then(money_value))
}

/// Amounts come as bare numbers, numeric strings, or `{"amount": n}`
/// objects depending on payload vintage.
fn first_money(value: &Value, keys: &[&str]) -> Option<u64> {
    first_number(value, keys).filter(|n| *n >= 0.0).map(|n| n.round() as u64)
}

fn money_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('₹').replace(',', "").parse().ok(),
        Value::Object(map) => map.get("amount").and_then(money_value),
        _ => None,
    }
}

fn first_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| value.get(key).and_then(Value::as_bool))
}

fn first_image(info: &Value) -> Option<String> {
    if let Some(url) = first_string(info, &["imageUrl", "image"]) {
        return Some(url);
    }
    // `imageUrls` maps resolution labels to URLs; any entry will do.
    info.get("imageUrls")
        .and_then(Value::as_object)
        .and_then(|map| map.values().find_map(Value::as_str))
        .map(str::to_string)
}
