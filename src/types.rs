use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw contact form payload as posted by the browser.
///
/// Missing string fields decode as empty so that an absent `name` surfaces as a schema
/// violation ("Name is required") and not as a decode failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    pub message: String,
    /// Honeypot. Hidden from humans, so any content means a bot filled it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A submission that passed every gate stage, with sanitized text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub message: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// Body of both the 201 and the silent 200 response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
