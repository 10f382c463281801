use crate::model::{DealsResult, SearchResult, SourceTier};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Either envelope kind can be cached; the orchestrator knows which one
/// it expects for a given key.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Search(SearchResult),
    Deals(DealsResult),
}

#[derive(Debug)]
struct CacheEntry {
    payload: CachedPayload,
    stored_at: Instant,
    ttl: Duration,
    /// Monotonic insertion counter, used for oldest-first eviction.
    seq: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
}

/// Time-bounded result store. Entries expire lazily on read; the only
/// proactive eviction is the size cap, which drops the oldest-inserted
/// entry (insertion order, not access order — the cache is a load
/// shield, not a correctness-critical store).
pub struct ResultCache {
    state: Mutex<CacheState>,
    max_entries: usize,
}

impl ResultCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_entries: max_entries.max(1),
        }
    }

    /// Key scoped to (tier, operation, query, limit) so each tier keeps
    /// its own TTL policy.
    pub fn key(tier: SourceTier, operation: &str, term: &str, limit: usize) -> String {
        format!(
            "{}:{}:{}:{}",
            tier.as_str(),
            operation,
            term.trim().to_lowercase(),
            limit
        )
    }

    pub async fn get(&self, key: &str) -> Option<CachedPayload> {
        let mut state = self.state.lock().await;
        let expired = match state.entries.get(key) {
            Some(entry) => entry.stored_at.elapsed() >= entry.ttl,
            None => return None,
        };
        if expired {
            state.entries.remove(key);
            debug!(key, "cache entry expired");
            return None;
        }
        state.entries.get(key).map(|entry| entry.payload.clone())
    }

    /// Overwrites any existing entry under `key`, then enforces the
    /// size cap by evicting the oldest-inserted entry.
    pub async fn put(&self, key: &str, payload: CachedPayload, ttl: Duration) {
        let mut state = self.state.lock().await;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
                ttl,
                seq,
            },
        );

        if state.entries.len() > self.max_entries {
            if let Some(oldest) = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| key.clone())
            {
                state.entries.remove(&oldest);
                debug!(key = %oldest, "cache size cap evicted oldest entry");
            }
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}
