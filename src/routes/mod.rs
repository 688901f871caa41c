//! HTTP route handlers for the Formwacht API.
//!
//! - `contact`: the public contact form endpoint guarded by the submission gate
//! - `health`: health check, readiness, metrics and version endpoints

pub mod contact;
pub mod health;

use std::any::Any;

use axum::middleware::from_fn_with_state;
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::security_headers::security_headers_middleware;
use crate::state::AppState;

/// Builds the application router with all layers applied.
pub fn router(state: AppState) -> Router {
    let cfg_arc = state.config.clone();

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/api/contact", post(contact::submit_contact))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg_arc, security_headers_middleware))
}

/// Turns a panicking handler into a generic 500 in the usual `{ "error": .. }` shape.
pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_response as fn(Box<dyn Any + Send + 'static>) -> Response)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    AppError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}
