use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters for the submission gate, one per terminal outcome.
#[derive(Clone)]
pub struct Metrics {
    pub submissions_received: Arc<AtomicU64>,
    pub submissions_created: Arc<AtomicU64>,
    pub honeypot_hits: Arc<AtomicU64>,
    pub rate_limited: Arc<AtomicU64>,
    pub forbidden: Arc<AtomicU64>,
    pub invalid: Arc<AtomicU64>,
    pub persist_failures: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            submissions_received: Arc::new(AtomicU64::new(0)),
            submissions_created: Arc::new(AtomicU64::new(0)),
            honeypot_hits: Arc::new(AtomicU64::new(0)),
            rate_limited: Arc::new(AtomicU64::new(0)),
            forbidden: Arc::new(AtomicU64::new(0)),
            invalid: Arc::new(AtomicU64::new(0)),
            persist_failures: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_received(&self) {
        self.submissions_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_created(&self) {
        self.submissions_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_honeypot(&self) {
        self.honeypot_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_forbidden(&self) {
        self.forbidden.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_persist_failures(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submissions_received: self.submissions_received.load(Ordering::Relaxed),
            submissions_created: self.submissions_created.load(Ordering::Relaxed),
            honeypot_hits: self.honeypot_hits.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            forbidden: self.forbidden.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub submissions_received: u64,
    pub submissions_created: u64,
    pub honeypot_hits: u64,
    pub rate_limited: u64,
    pub forbidden: u64,
    pub invalid: u64,
    pub persist_failures: u64,
    pub uptime_seconds: u64,
}
