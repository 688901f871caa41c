use std::sync::Arc;

use crate::config::AppConfig;
use crate::gate::{ContactStore, SqliteContactStore, SubmissionGate};
use crate::metrics::Metrics;
use crate::middleware::SlidingWindowLimiter;

/// The shared application state.
///
/// Cloned into every handler. The rate limiter lives here, owned explicitly by the
/// application rather than as process-wide global state, so its lifetime and the
/// periodic sweep in `main` are tied to this value.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: sqlx::SqlitePool,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Counters for the submission gate.
    pub metrics: Metrics,
    /// The ordered submission checks for `POST /api/contact`.
    pub gate: SubmissionGate,
}

impl AppState {
    /// Creates a new `AppState` storing submissions in `db`.
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        let store = Arc::new(SqliteContactStore::new(db.clone()));
        Self::with_store(db, config, store)
    }

    /// Like [`new`](Self::new) with a custom submission store.
    pub fn with_store(db: sqlx::SqlitePool, config: AppConfig, store: Arc<dyn ContactStore>) -> Self {
        let metrics = Metrics::new();
        let limiter = SlidingWindowLimiter::from_config(&config.rate_limit);
        let gate = SubmissionGate::new(&config, limiter, store, metrics.clone());
        Self { db, config: Arc::new(config), metrics, gate }
    }

    pub fn rate_limiter(&self) -> &SlidingWindowLimiter {
        self.gate.limiter()
    }
}
