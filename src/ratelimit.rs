use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Enforces a minimum spacing between outbound requests. One instance
/// covers every scrape and API call the owning service makes; holding
/// the lock across the sleep gives waiting callers FIFO ordering.
pub struct RateLimiter {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Blocks until the interval since the previous grant has elapsed,
    /// then records the new grant. Never fails; the only effect is delay.
    pub async fn await_slot(&self) {
        let mut last_grant = self.last_grant.lock().await;
        if let Some(previous) = *last_grant {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if now < ready_at {
                debug!(wait_ms = (ready_at - now).as_millis() as u64, "rate limit wait");
                sleep_until(ready_at).await;
            }
        }
        *last_grant = Some(Instant::now());
    }
}
