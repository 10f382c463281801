use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

/// Runtime configuration, injected into the service rather than read
/// from ambient globals. All fields have workable defaults so the
/// binary runs without a config file (demo mode, no affiliate tier).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Flipkart affiliate tracking id; together with the token it
    /// enables the API tier.
    pub affiliate_id: Option<String>,
    pub affiliate_token: Option<String>,
    /// Default result count when the caller does not pass a limit.
    pub max_results: usize,
    /// TTL for cached live-scrape results, in seconds.
    pub live_ttl_secs: u64,
    /// TTL for cached API and sample results, in seconds.
    pub fallback_ttl_secs: u64,
    /// Minimum spacing between outbound requests, in milliseconds.
    pub min_request_interval_ms: u64,
    pub request_timeout_secs: u64,
    /// How many canned category queries an uncategorized deals call may
    /// fan out into (sequentially, never concurrently).
    pub deal_query_budget: usize,
    /// Pause between those sequential deal sub-queries, in milliseconds.
    pub inter_query_delay_ms: u64,
    pub max_cache_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            affiliate_id: None,
            affiliate_token: None,
            max_results: 10,
            live_ttl_secs: 120,
            fallback_ttl_secs: 300,
            min_request_interval_ms: 1000,
            request_timeout_secs: 15,
            deal_query_budget: 3,
            inter_query_delay_ms: 500,
            max_cache_entries: 100,
        }
    }
}

impl AppConfig {
    /// The API tier only exists when both credentials are present and
    /// non-empty.
    pub fn has_affiliate_credentials(&self) -> bool {
        matches!(&self.affiliate_id, Some(id) if !id.is_empty())
            && matches!(&self.affiliate_token, Some(token) if !token.is_empty())
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
