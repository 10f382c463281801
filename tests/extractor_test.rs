//! Ground-truth extraction against a canned Flipkart search page.

use flip_scout::extractor::FlipkartExtractor;
use flip_scout::model::{ScrapeError, SourceTier};
use flip_scout::scraper::{LiveScraper, PageFetcher};
use std::sync::Arc;

const FIXTURE: &str = include_str!("fixtures/search_laptop.html");

/// (title prefix, selling price, list price, discount, rating, reviews)
const GROUND_TRUTH: &[(&str, u64, u64, u8, f32, u32)] = &[
    ("HP Pavilion 15 Intel Core i5 11th Gen", 58990, 69999, 16, 4.3, 8441),
    ("Lenovo IdeaPad 3 AMD Ryzen 5 5500U", 41490, 59890, 31, 4.2, 12806),
    ("ASUS TUF Gaming F15 Intel Core i5 10th Gen", 52990, 74990, 29, 4.4, 21417),
    ("DELL Inspiron 3511 Intel Core i3 11th Gen", 36990, 49830, 26, 4.1, 4112),
    ("Acer Aspire 5 AMD Ryzen 5 Hexa Core 5500U", 37990, 51999, 27, 4.3, 6920),
];

#[test]
fn fixture_page_extracts_all_five_listings_with_ground_truth_fields() {
    let listings = FlipkartExtractor::new().extract(FIXTURE, "laptop", 25);
    assert_eq!(listings.len(), 5);

    for (listing, (title, selling, list, discount, rating, reviews)) in
        listings.iter().zip(GROUND_TRUTH)
    {
        assert!(
            listing.title.starts_with(title),
            "unexpected title: {}",
            listing.title
        );
        assert_eq!(listing.selling_price, *selling);
        assert_eq!(listing.list_price, Some(*list));
        assert_eq!(listing.discount_percent, Some(*discount));
        assert_eq!(listing.rating, Some(*rating));
        assert_eq!(listing.review_count, Some(*reviews));
        assert_eq!(listing.category, "laptop");
        assert_eq!(listing.source_tier, SourceTier::Live);
        assert!(listing
            .product_url
            .as_deref()
            .is_some_and(|url| url.starts_with("https://www.flipkart.com/")));
        assert!(listing
            .image_url
            .as_deref()
            .is_some_and(|url| url.starts_with("https://rukminim2.flixcart.com/")));
    }
}

#[test]
fn brand_recognition_runs_over_fixture_titles() {
    let listings = FlipkartExtractor::new().extract(FIXTURE, "laptop", 25);
    let brands: Vec<_> = listings.iter().map(|l| l.brand.as_str()).collect();
    assert_eq!(brands, vec!["HP", "Lenovo", "Asus", "Dell", "Acer"]);
}

struct FixtureFetcher;

#[async_trait::async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch_search_page(&self, _query: &str) -> Result<String, ScrapeError> {
        Ok(FIXTURE.to_string())
    }
}

#[tokio::test]
async fn live_scraper_returns_the_five_fixture_listings_end_to_end() {
    let live = LiveScraper::new(Arc::new(FixtureFetcher));
    let listings = live.search("laptop", 5).await.expect("live tier succeeds");

    assert_eq!(listings.len(), 5);
    for (listing, (title, selling, ..)) in listings.iter().zip(GROUND_TRUTH) {
        assert!(listing.title.starts_with(title));
        assert_eq!(listing.selling_price, *selling);
    }
}

#[tokio::test]
async fn live_scraper_treats_an_empty_extraction_as_a_tier_failure() {
    struct EmptyPageFetcher;

    #[async_trait::async_trait]
    impl PageFetcher for EmptyPageFetcher {
        async fn fetch_search_page(&self, _query: &str) -> Result<String, ScrapeError> {
            Ok("<html><body><div id='no-products'></div></body></html>".to_string())
        }
    }

    let live = LiveScraper::new(Arc::new(EmptyPageFetcher));
    let err = live.search("laptop", 5).await.expect_err("zero products is a failure");
    assert!(matches!(err, ScrapeError::NoProducts));
}
