use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;
use std::fmt;

/// Message returned to callers for every server-side failure. Internal detail stays in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

/// The primary error type for the application.
///
/// Every variant maps to exactly one HTTP status. Response bodies always have the shape
/// `{ "error": <message> }` and never carry internal detail such as storage error codes.
#[derive(Debug)]
pub enum AppError {
    /// Anything unexpected, such as a panicking handler. Logged with an error id.
    Internal(anyhow::Error),
    /// The request body could not be decoded.
    BadRequest(String),
    /// A field violated a schema rule or a submission policy. The message is shown verbatim.
    InvalidInput(String),
    /// Origin/Referer did not match the allow-list.
    Forbidden,
    /// For when a client has sent too many requests in a given amount of time.
    RateLimited {
        /// The number of seconds to wait before retrying the request.
        retry_after_seconds: u64,
    },
    /// For errors related to database operations. The detail is logged, never returned.
    Database(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::RateLimited { retry_after_seconds } => {
                write!(f, "Rate limited. Retry after {} seconds", retry_after_seconds)
            }
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut retry_after = None;
        let message = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            AppError::Database(msg) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Database error: {}", msg);
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            AppError::BadRequest(msg) | AppError::InvalidInput(msg) => msg,
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::RateLimited { retry_after_seconds } => {
                retry_after = Some(retry_after_seconds);
                "Too many requests. Please try again later.".to_string()
            }
        };

        let mut res = (status, Json(json!({ "error": message }))).into_response();
        if let Some(secs) = retry_after {
            res.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        res
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Every sqlx failure is a storage failure, pool timeouts included.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                AppError::Database(format!("{} (code {})", db_err.message(), code))
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
