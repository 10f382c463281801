//! Sourcing orchestrator: composes the rate limiter, live scraper,
//! affiliate API, sample generator and result cache behind the two
//! calls the chat layer consumes, `search` and `deals`.
//!
//! Tier order is a hard invariant: cache, then live scrape, then
//! affiliate API, then sample data. Every public operation is total —
//! the worst outcome is a `success=false` envelope with a readable
//! message, never a propagated fault.

use crate::affiliate::{AffiliateClient, AffiliateGateway};
use crate::cache::{CachedPayload, ResultCache};
use crate::config::AppConfig;
use crate::model::{ApiError, DealsResult, ProductListing, SearchResult, SourceTier};
use crate::ratelimit::RateLimiter;
use crate::sample::{sample_deals, sample_search};
use crate::scraper::{HttpFetcher, LiveScraper, PageFetcher};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Hard ceiling on any caller-supplied limit.
pub const MAX_LIMIT: usize = 25;

/// Minimum discount for a listing to count as a deal.
pub const MIN_DEAL_DISCOUNT: u8 = 10;

const DEMO_NOTE: &str = "demo mode";

const MSG_RATE_LIMITED: &str =
    "Rate limited by the product API. Please try again in a few minutes.";
const MSG_BAD_CREDENTIALS: &str =
    "Product API credentials were rejected. Check the affiliate configuration.";
const MSG_UNAVAILABLE: &str =
    "Product search is temporarily unavailable. Please try again later.";
const MSG_EMPTY_QUERY: &str = "Search query is empty. Tell me what to look for.";

/// Canned search query per deals category.
const DEAL_QUERIES: &[(&str, &str)] = &[
    ("electronics", "electronics sale"),
    ("mobile", "smartphone offers"),
    ("laptop", "laptop deals"),
    ("fashion", "fashion sale"),
    ("home", "home appliances offers"),
    ("books", "bestselling books"),
];

/// Rotation used when no category is given. Deliberately short: each
/// entry costs a rate-limited upstream request.
const DEFAULT_DEAL_CATEGORIES: &[&str] = &["electronics", "mobile", "laptop"];

enum Sourced {
    Products {
        products: Vec<ProductListing>,
        tier: SourceTier,
    },
    Failed(&'static str),
}

pub struct FlipkartService {
    live: LiveScraper,
    affiliate: Option<Arc<dyn AffiliateGateway>>,
    cache: ResultCache,
    limiter: RateLimiter,
    config: AppConfig,
}

impl FlipkartService {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(timeout)?);

        let affiliate: Option<Arc<dyn AffiliateGateway>> = if config.has_affiliate_credentials() {
            let client = AffiliateClient::new(
                config.affiliate_id.clone().unwrap_or_default(),
                config.affiliate_token.clone().unwrap_or_default(),
                timeout,
            )?;
            Some(Arc::new(client))
        } else {
            info!("affiliate credentials absent, API tier disabled");
            None
        };

        Ok(Self::with_sources(config, fetcher, affiliate))
    }

    /// Constructor with injected sources. Tests plug spies in here;
    /// nothing in the service reaches for ambient state.
    pub fn with_sources(
        config: AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        affiliate: Option<Arc<dyn AffiliateGateway>>,
    ) -> Self {
        Self {
            live: LiveScraper::new(fetcher),
            cache: ResultCache::new(config.max_cache_entries),
            limiter: RateLimiter::new(Duration::from_millis(config.min_request_interval_ms)),
            affiliate,
            config,
        }
    }

    pub async fn search(&self, query: &str, limit: usize) -> SearchResult {
        let query = query.trim();
        let limit = limit.clamp(1, MAX_LIMIT);
        if query.is_empty() {
            return SearchResult::failure(query, MSG_EMPTY_QUERY);
        }

        for tier in [SourceTier::Live, SourceTier::Api, SourceTier::Sample] {
            let key = ResultCache::key(tier, "search", query, limit);
            if let Some(CachedPayload::Search(result)) = self.cache.get(&key).await {
                debug!(query, tier = tier.as_str(), "search served from cache");
                return result;
            }
        }

        match self.source_products(query, limit).await {
            Sourced::Products { products, tier } => {
                let note = (tier == SourceTier::Sample).then(|| DEMO_NOTE.to_string());
                let result = SearchResult::found(query, products, note);
                let key = ResultCache::key(tier, "search", query, limit);
                self.cache
                    .put(&key, CachedPayload::Search(result.clone()), self.ttl_for(tier))
                    .await;
                result
            }
            Sourced::Failed(message) => SearchResult::failure(query, message),
        }
    }

    pub async fn deals(&self, category: &str, limit: usize) -> DealsResult {
        let category = category.trim().to_lowercase();
        let limit = limit.clamp(1, MAX_LIMIT);
        let cache_term = if category.is_empty() { "all" } else { category.as_str() };

        for tier in [SourceTier::Live, SourceTier::Api, SourceTier::Sample] {
            let key = ResultCache::key(tier, "deals", cache_term, limit);
            if let Some(CachedPayload::Deals(result)) = self.cache.get(&key).await {
                debug!(category = cache_term, tier = tier.as_str(), "deals served from cache");
                return result;
            }
        }

        let outcome = if category.is_empty() {
            self.aggregate_deals(limit).await
        } else {
            self.category_deals(&category, limit).await
        };

        match outcome {
            Sourced::Products { products, tier } => {
                let note = (tier == SourceTier::Sample).then(|| DEMO_NOTE.to_string());
                let result = DealsResult::found(cache_term, products, note);
                let key = ResultCache::key(tier, "deals", cache_term, limit);
                self.cache
                    .put(&key, CachedPayload::Deals(result.clone()), self.ttl_for(tier))
                    .await;
                result
            }
            Sourced::Failed(message) => DealsResult::failure(cache_term, message),
        }
    }

    /// The tier ladder for one query: rate-limited live scrape, then
    /// the affiliate API if configured, then deterministic sample data.
    async fn source_products(&self, query: &str, limit: usize) -> Sourced {
        self.limiter.await_slot().await;
        match self.live.search(query, limit).await {
            Ok(products) => {
                return Sourced::Products {
                    products,
                    tier: SourceTier::Live,
                };
            }
            Err(err) => {
                warn!(query, %err, "live scrape tier failed");
            }
        }

        let Some(affiliate) = &self.affiliate else {
            info!(query, "no affiliate credentials, serving sample data");
            return self.sampled(query, limit);
        };

        self.limiter.await_slot().await;
        match affiliate.search(query, limit).await {
            Ok(products) if !products.is_empty() => Sourced::Products {
                products,
                tier: SourceTier::Api,
            },
            Ok(_) => {
                warn!(query, "affiliate API returned zero products, serving sample data");
                self.sampled(query, limit)
            }
            // Statuses get the user-facing classification; transport
            // and payload failures degrade to sample data instead.
            Err(ApiError::Status(429)) => Sourced::Failed(MSG_RATE_LIMITED),
            Err(ApiError::Status(401)) => Sourced::Failed(MSG_BAD_CREDENTIALS),
            Err(ApiError::Status(status)) => {
                warn!(query, status, "affiliate API rejected the request");
                Sourced::Failed(MSG_UNAVAILABLE)
            }
            Err(err) => {
                warn!(query, %err, "affiliate API unreachable, serving sample data");
                self.sampled(query, limit)
            }
        }
    }

    fn sampled(&self, query: &str, limit: usize) -> Sourced {
        Sourced::Products {
            products: sample_search(query, limit),
            tier: SourceTier::Sample,
        }
    }

    /// Deals for one category: run the canned query through the tier
    /// ladder, then keep only listings clearing the discount line. The
    /// sample tier swaps in dedicated deal data so the demo never shows
    /// an empty shelf.
    async fn category_deals(&self, category: &str, limit: usize) -> Sourced {
        let query = deal_query_for(category);
        let fetch_limit = (limit * 2).min(MAX_LIMIT);

        match self.source_products(&query, fetch_limit).await {
            Sourced::Products { products, tier } if tier != SourceTier::Sample => {
                let mut deals: Vec<ProductListing> = products
                    .into_iter()
                    .filter(|listing| {
                        listing.discount_percent.is_some_and(|d| d >= MIN_DEAL_DISCOUNT)
                    })
                    .collect();
                deals.truncate(limit);
                if deals.is_empty() {
                    debug!(category, "no live listings cleared the discount line");
                    return self.sampled_deals(category, &query, limit);
                }
                Sourced::Products { products: deals, tier }
            }
            Sourced::Products { .. } => self.sampled_deals(category, &query, limit),
            Sourced::Failed(message) => Sourced::Failed(message),
        }
    }

    fn sampled_deals(&self, category: &str, query: &str, limit: usize) -> Sourced {
        Sourced::Products {
            products: sample_deals(category, query, limit),
            tier: SourceTier::Sample,
        }
    }

    /// No category given: spend a small fixed budget of sequential
    /// sub-queries across the default rotation, with a pause between
    /// them. Never concurrent — the whole point is to keep upstream
    /// load flat.
    async fn aggregate_deals(&self, limit: usize) -> Sourced {
        let budget = self
            .config
            .deal_query_budget
            .clamp(1, DEFAULT_DEAL_CATEGORIES.len());
        let delay = Duration::from_millis(self.config.inter_query_delay_ms);
        let per_category = limit.div_ceil(budget);

        let mut merged: Vec<ProductListing> = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut best_tier = SourceTier::Sample;

        for (index, category) in DEFAULT_DEAL_CATEGORIES[..budget].iter().enumerate() {
            if index > 0 {
                sleep(delay).await;
            }
            match self.category_deals(category, per_category).await {
                Sourced::Products { products, tier } => {
                    if tier_rank(tier) < tier_rank(best_tier) {
                        best_tier = tier;
                    }
                    for listing in products {
                        if seen_ids.insert(listing.id.clone()) {
                            merged.push(listing);
                        }
                    }
                }
                Sourced::Failed(message) => {
                    warn!(%category, message, "deal sub-query failed, continuing rotation");
                }
            }
        }

        if merged.is_empty() {
            return Sourced::Failed(MSG_UNAVAILABLE);
        }
        merged.truncate(limit);
        Sourced::Products {
            products: merged,
            tier: best_tier,
        }
    }

    fn ttl_for(&self, tier: SourceTier) -> Duration {
        match tier {
            // Live pages change quickly and scraping is the expensive
            // path, so live results go stale sooner.
            SourceTier::Live => Duration::from_secs(self.config.live_ttl_secs),
            SourceTier::Api | SourceTier::Sample => {
                Duration::from_secs(self.config.fallback_ttl_secs)
            }
        }
    }
}

fn tier_rank(tier: SourceTier) -> u8 {
    match tier {
        SourceTier::Live => 0,
        SourceTier::Api => 1,
        SourceTier::Sample => 2,
    }
}

/// Maps a category token to its canned deals query; unknown categories
/// get a best-effort query built from the token itself.
pub fn deal_query_for(category: &str) -> String {
    DEAL_QUERIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, query)| (*query).to_string())
        .unwrap_or_else(|| format!("{} deals", category))
}
