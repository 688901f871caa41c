use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, not rate limited
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: the store must answer within 5 seconds
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => {
            tracing::warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
        }
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let mut snapshot = serde_json::to_value(state.metrics.get_snapshot()).unwrap_or_default();
    snapshot["tracked_clients"] = state.rate_limiter().tracked_clients().await.into();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let tracked = state.rate_limiter().tracked_clients().await;
    let counters = [
        ("submissions_received", "Contact submissions received", m.submissions_received),
        ("submissions_created", "Contact submissions stored", m.submissions_created),
        ("honeypot_hits", "Submissions silently discarded by the honeypot", m.honeypot_hits),
        ("rate_limited", "Submissions rejected by the rate limiter", m.rate_limited),
        ("forbidden", "Submissions rejected by the origin check", m.forbidden),
        ("invalid", "Submissions rejected as malformed or invalid", m.invalid),
        ("persist_failures", "Submissions that failed to persist", m.persist_failures),
    ];
    let mut body = String::new();
    for (name, help, value) in counters {
        body.push_str(&format!(
            "# HELP formwacht_{name} {help}\n# TYPE formwacht_{name} counter\nformwacht_{name} {value}\n"
        ));
    }
    body.push_str(&format!(
        "# HELP formwacht_tracked_clients Client identities held by the rate limiter\n# TYPE formwacht_tracked_clients gauge\nformwacht_tracked_clients {}\n\
# HELP formwacht_uptime_seconds Uptime seconds\n# TYPE formwacht_uptime_seconds gauge\nformwacht_uptime_seconds {}\n",
        tracked, m.uptime_seconds,
    ));
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
