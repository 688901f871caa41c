use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AppResult;
use crate::gate::{GateOutcome, SUCCESS_MESSAGE};
use crate::state::AppState;
use crate::types::MessageResponse;

/// `POST /api/contact`
///
/// The body is handed to the gate unread. Reading, the size cap and decoding happen in
/// its parse stage, after the rate limit and origin checks.
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Response> {
    let outcome = state.gate.process(&headers, body).await?;
    let body = Json(MessageResponse { message: SUCCESS_MESSAGE.to_string() });
    let status = match outcome {
        GateOutcome::Created(_) => StatusCode::CREATED,
        // Same body as a real success, only the status differs
        GateOutcome::SilentlyAccepted => StatusCode::OK,
    };
    Ok((status, body).into_response())
}
