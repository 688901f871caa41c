//! The submission gate: an ordered, fail-fast sequence of checks every contact submission
//! passes before it is stored.
//!
//! ```text
//! rate limit -> origin check -> parse -> schema -> policies (business email, honeypot)
//!            -> sanitize -> persist
//! ```
//!
//! Each request ends in exactly one outcome: created, silently accepted (honeypot) or an
//! [`AppError`]. The gate never retries; that is up to the caller.

pub mod persist;
pub mod policy;
pub mod sanitize;
pub mod schema;

use std::{fmt, sync::Arc};

use axum::body::Body;
use axum::http::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::{ip::resolve_client_identity, OriginGuard, SlidingWindowLimiter};
use crate::types::{ContactRequest, ContactSubmission};

pub use persist::{ContactStore, SqliteContactStore, StoreError};
pub use policy::BusinessEmailPolicy;
pub use schema::Schema;

/// Returned for both created and silently accepted submissions.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
/// Contact payloads are small; anything bigger than this is not a form post.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Where a submission was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RateLimit,
    OriginCheck,
    Parse,
    SchemaCheck,
    PolicyChecks,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::RateLimit => "rate_limit",
            Stage::OriginCheck => "origin_check",
            Stage::Parse => "parse",
            Stage::SchemaCheck => "schema_check",
            Stage::PolicyChecks => "policy_checks",
            Stage::Persist => "persist",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub enum GateOutcome {
    /// A new record was written.
    Created(ContactSubmission),
    /// The honeypot fired. The caller sees success, nothing was stored.
    SilentlyAccepted,
}

#[derive(Clone)]
pub struct SubmissionGate {
    limiter: SlidingWindowLimiter,
    origin: OriginGuard,
    schema: Arc<Schema>,
    business_email: Option<BusinessEmailPolicy>,
    honeypot: bool,
    trusted_proxy: bool,
    store: Arc<dyn ContactStore>,
    metrics: Metrics,
}

impl SubmissionGate {
    pub fn new(
        config: &AppConfig,
        limiter: SlidingWindowLimiter,
        store: Arc<dyn ContactStore>,
        metrics: Metrics,
    ) -> Self {
        Self {
            limiter,
            origin: OriginGuard::from_site(&config.site),
            schema: Arc::new(Schema::contact()),
            business_email: config.gate.business_email_only.then_some(BusinessEmailPolicy),
            honeypot: config.gate.honeypot,
            trusted_proxy: config.site.trusted_proxy,
            store,
            metrics,
        }
    }

    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }

    /// Runs one submission through every stage.
    pub async fn process(&self, headers: &HeaderMap, body: Body) -> AppResult<GateOutcome> {
        self.metrics.inc_received();
        let client = resolve_client_identity(headers, self.trusted_proxy);

        match self.run(&client, headers, body).await {
            Ok(outcome) => {
                match &outcome {
                    GateOutcome::Created(record) => {
                        self.metrics.inc_created();
                        tracing::info!(id = %record.id, client = %client, "Contact submission stored");
                    }
                    GateOutcome::SilentlyAccepted => {
                        self.metrics.inc_honeypot();
                        tracing::warn!(client = %client, "Honeypot triggered, submission discarded");
                    }
                }
                Ok(outcome)
            }
            Err((stage, err)) => {
                match stage {
                    Stage::RateLimit => self.metrics.inc_rate_limited(),
                    Stage::OriginCheck => self.metrics.inc_forbidden(),
                    Stage::Parse | Stage::SchemaCheck | Stage::PolicyChecks => self.metrics.inc_invalid(),
                    Stage::Persist => self.metrics.inc_persist_failures(),
                }
                tracing::info!(client = %client, %stage, "Contact submission rejected: {}", err);
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        client: &str,
        headers: &HeaderMap,
        body: Body,
    ) -> Result<GateOutcome, (Stage, AppError)> {
        self.limiter.check(client).await.map_err(|e| (Stage::RateLimit, e))?;

        self.origin.check(headers).map_err(|e| (Stage::OriginCheck, e))?;

        // Read only now, so oversized bodies still pass through the rate limit and origin check
        let req = read_body(body).await.map_err(|e| (Stage::Parse, e))?;

        self.schema.validate(&req).map_err(|v| (Stage::SchemaCheck, v.into()))?;

        if let Some(policy) = &self.business_email {
            policy.check(&req.email).map_err(|e| (Stage::PolicyChecks, e))?;
        }
        if self.honeypot && policy::honeypot_triggered(req.website.as_deref()) {
            return Ok(GateOutcome::SilentlyAccepted);
        }

        let record = sanitize_submission(&req, client);

        self.store.insert(&record).await.map_err(|e| {
            tracing::error!(id = %record.id, "Failed to persist contact submission: {:?}", e);
            (Stage::Persist, AppError::from(e))
        })?;

        Ok(GateOutcome::Created(record))
    }
}

async fn read_body(body: Body) -> AppResult<ContactRequest> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::debug!("Failed to read contact body: {}", e);
        AppError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    })?;
    decode_body(&bytes)
}

/// Decodes a contact body. Anything but a JSON object is rejected; absent fields decode as empty.
fn decode_body(body: &[u8]) -> AppResult<ContactRequest> {
    let invalid = |e: serde_json::Error| {
        tracing::debug!("Failed to decode contact body: {}", e);
        AppError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    };
    match serde_json::from_slice::<serde_json::Value>(body).map_err(invalid)? {
        value @ serde_json::Value::Object(_) => serde_json::from_value(value).map_err(invalid),
        _ => Err(AppError::BadRequest(INVALID_BODY_MESSAGE.to_string())),
    }
}

/// Builds the record to store from a validated request. Only sanitized text gets through.
pub fn sanitize_submission(req: &ContactRequest, client: &str) -> ContactSubmission {
    ContactSubmission {
        id: Uuid::new_v4(),
        name: sanitize::strip_markup(&req.name),
        company: sanitize::strip_markup_opt(req.company.as_deref()),
        email: req.email.trim().to_lowercase(),
        service: sanitize::strip_markup_opt(req.service.as_deref()),
        budget: sanitize::strip_markup_opt(req.budget.as_deref()),
        message: sanitize::strip_markup(&req.message),
        ip_address: client.to_string(),
        created_at: Utc::now(),
    }
}
