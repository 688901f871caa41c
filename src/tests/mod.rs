//! Integration and unit tests for the Formwacht application.
//!
//! ## Test Modules
//!
//! - **api_tests**: `POST /api/contact` end to end through the router
//! - **error_tests**: Error to HTTP response mapping
//! - **config_tests**: Configuration loading and validation
//! - **db_tests**: Schema initialization
//! - **health_api_tests**: Health, readiness and metrics endpoints
//!
//! Individual test modules can be run with:
//! ```bash
//! cargo test api_tests
//! ```

pub mod error_tests;

use axum::{body::Body, http::Request, Router};
use sqlx::sqlite::SqlitePoolOptions;

use crate::{config::AppConfig, db, routes, state::AppState};

pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
    db::init_db(&pool).await.unwrap();
    pool
}

pub(crate) async fn setup_test_app(config: AppConfig) -> (Router, AppState) {
    let state = AppState::new(test_pool().await, config);
    (routes::router(state.clone()), state)
}

pub(crate) fn contact_request(body: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/contact").header("content-type", "application/json");
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
