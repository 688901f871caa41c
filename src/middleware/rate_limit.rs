use lru::LruCache;
use std::{
    collections::VecDeque,
    num::NonZeroUsize,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;
use crate::error::{AppError, AppResult};

/// A sliding window rate limiter keyed by client identity.
///
/// Each key keeps the instants of its accepted requests inside the trailing window.
/// Older instants are pruned on access. The key map is bounded: once `capacity` distinct
/// identities are tracked, the least recently seen one is dropped to make room.
///
/// Pruning, the quota test and recording the new request all happen under one lock, so
/// concurrent requests from the same identity cannot both slip under the quota.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    requests: Arc<Mutex<LruCache<String, VecDeque<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl SlidingWindowLimiter {
    /// Creates a new limiter.
    ///
    /// # Arguments
    ///
    /// * `max_requests` - The maximum number of requests allowed within the window.
    /// * `window` - Length of the trailing window.
    /// * `capacity` - Maximum number of distinct identities tracked at once.
    pub fn new(max_requests: usize, window: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            requests: Arc::new(Mutex::new(LruCache::new(capacity))),
            max_requests,
            window,
        }
    }

    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        let capacity = NonZeroUsize::new(cfg.max_tracked_clients).unwrap_or(NonZeroUsize::MIN);
        Self::new(cfg.max_requests, Duration::from_secs(cfg.window_seconds), capacity)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks whether a request from `key` is allowed right now and records it if so.
    pub async fn check(&self, key: &str) -> AppResult<()> {
        self.check_at(key, Instant::now()).await
    }

    /// Like [`check`](Self::check) but evaluated at an explicit instant.
    ///
    /// A rejected request is not recorded, so hammering the endpoint does not extend the block.
    pub async fn check_at(&self, key: &str, now: Instant) -> AppResult<()> {
        let mut requests = self.requests.lock().await;
        let timestamps = requests.get_or_insert_mut(key.to_string(), VecDeque::new);

        // On time skew keep the timestamp (conservative)
        timestamps.retain(|&t| now.checked_duration_since(t).map(|d| d < self.window).unwrap_or(true));

        if timestamps.len() >= self.max_requests {
            return Err(AppError::RateLimited { retry_after_seconds: self.window.as_secs() });
        }

        timestamps.push_back(now);
        Ok(())
    }

    /// Drops identities whose requests have all left the window. Returns how many were dropped.
    pub async fn cleanup_old_entries(&self) -> usize {
        self.cleanup_at(Instant::now()).await
    }

    pub async fn cleanup_at(&self, now: Instant) -> usize {
        let mut requests = self.requests.lock().await;
        let mut stale = Vec::new();
        for (key, timestamps) in requests.iter_mut() {
            timestamps.retain(|&t| now.checked_duration_since(t).map(|d| d < self.window).unwrap_or(true));
            if timestamps.is_empty() {
                stale.push(key.clone());
            }
        }
        for key in &stale {
            requests.pop(key);
        }
        stale.len()
    }

    /// Number of identities currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.requests.lock().await.len()
    }
}

/// A background task that periodically sweeps idle identities from the limiter.
pub async fn cleanup_task(limiter: SlidingWindowLimiter, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let dropped = limiter.cleanup_old_entries().await;
        if dropped > 0 {
            tracing::debug!(dropped, "Rate limiter sweep removed idle clients");
        }
    }
}
