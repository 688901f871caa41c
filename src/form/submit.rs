//! Sending the contact form.
//!
//! Every attempt runs inside its own cancellation scope. Starting a new attempt cancels the
//! previous one, and an attempt that gets no answer within [`SUBMIT_TIMEOUT`] is cancelled
//! and reported as [`SubmitOutcome::TimedOut`], separate from other failures.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::form::contact::{contact_form, to_request, ContactField};
use crate::form::i18n::Messages;
use crate::form::ValidationEngine;
use crate::types::{ContactRequest, ErrorResponse};

pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and raw body of a server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
}

/// Posts a contact payload. Dropping the returned future must abort the request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, payload: &ContactRequest) -> Result<HttpReply, TransportError>;
}

/// [`Transport`] over HTTP.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into() }
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, payload: &ContactRequest) -> Result<HttpReply, TransportError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(HttpReply { status, body })
    }
}

/// Terminal result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the submission.
    Sent,
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The server answered with an error status.
    Rejected { status: u16, message: String },
    /// No answer within the timeout.
    TimedOut,
    /// A newer attempt cancelled this one.
    Superseded,
    /// The request never got an answer.
    Network(String),
}

impl SubmitOutcome {
    /// Message for the error banner, if the outcome warrants one.
    pub fn user_message(&self, messages: &Messages) -> Option<String> {
        match self {
            SubmitOutcome::Sent | SubmitOutcome::Invalid | SubmitOutcome::Superseded => None,
            SubmitOutcome::Rejected { message, .. } => Some(message.clone()),
            SubmitOutcome::TimedOut => Some(messages.timed_out.clone()),
            SubmitOutcome::Network(_) => Some(messages.network_failed.clone()),
        }
    }
}

#[derive(Default)]
struct Scope {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Sends submissions, at most one in flight at a time.
pub struct SubmissionClient<T> {
    transport: T,
    timeout: Duration,
    scope: Mutex<Scope>,
    send_failed: String,
}

impl<T: Transport> SubmissionClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: SUBMIT_TIMEOUT,
            scope: Mutex::new(Scope::default()),
            send_failed: Messages::default().send_failed,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fallback shown when an error reply carries no message of its own.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.send_failed = message.into();
        self
    }

    /// Cancels the attempt in flight, if any. Call when the form goes away.
    pub fn cancel(&self) {
        let mut scope = self.scope.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = scope.token.take() {
            token.cancel();
        }
    }

    pub fn in_flight(&self) -> bool {
        self.scope.lock().unwrap_or_else(|e| e.into_inner()).token.is_some()
    }

    pub async fn send(&self, payload: &ContactRequest) -> SubmitOutcome {
        let (generation, token) = self.begin();

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => SubmitOutcome::Superseded,
            _ = tokio::time::sleep(self.timeout) => {
                token.cancel();
                SubmitOutcome::TimedOut
            }
            res = self.transport.post_json(payload) => self.interpret(res),
        };

        self.finish(generation);
        outcome
    }

    /// Opens a fresh scope and cancels the previous one.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut scope = self.scope.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = scope.token.take() {
            previous.cancel();
        }
        scope.generation += 1;
        let token = CancellationToken::new();
        scope.token = Some(token.clone());
        (scope.generation, token)
    }

    fn finish(&self, generation: u64) {
        let mut scope = self.scope.lock().unwrap_or_else(|e| e.into_inner());
        if scope.generation == generation {
            scope.token = None;
        }
    }

    fn interpret(&self, res: Result<HttpReply, TransportError>) -> SubmitOutcome {
        match res {
            Ok(reply) if (200..300).contains(&reply.status) => SubmitOutcome::Sent,
            Ok(reply) => {
                let message = serde_json::from_str::<ErrorResponse>(&reply.body)
                    .map(|e| e.error)
                    .ok()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| self.send_failed.clone());
                SubmitOutcome::Rejected { status: reply.status, message }
            }
            Err(TransportError::Network(msg)) => {
                tracing::warn!("Contact form request failed: {}", msg);
                SubmitOutcome::Network(msg)
            }
        }
    }
}

/// Shared view of a controller's busy state, readable while `submit` holds the controller.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, busy: bool) {
        self.0.store(busy, Ordering::SeqCst);
    }
}

/// Clears the flag when the attempt ends, including when the submit future is dropped.
struct BusyGuard<'a>(&'a BusyFlag);

impl<'a> BusyGuard<'a> {
    fn new(flag: &'a BusyFlag) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// The contact form as a whole: field state, busy flag and the error banner.
pub struct ContactFormController<T> {
    form: ValidationEngine<ContactField>,
    client: Arc<SubmissionClient<T>>,
    messages: Messages,
    busy: BusyFlag,
    submitted: bool,
    api_error: Option<String>,
}

impl<T: Transport> ContactFormController<T> {
    pub fn new(client: Arc<SubmissionClient<T>>, messages: Messages) -> Self {
        Self {
            form: contact_form(&messages),
            client,
            messages,
            busy: BusyFlag::default(),
            submitted: false,
            api_error: None,
        }
    }

    pub fn form(&self) -> &ValidationEngine<ContactField> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ValidationEngine<ContactField> {
        &mut self.form
    }

    /// `true` while a request is in flight; the submit control is disabled meanwhile.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// A handle on the busy state for observers such as the submit button.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.api_error = None;
    }

    /// Back from the thank-you view to an empty form.
    pub fn send_another(&mut self) {
        self.submitted = false;
    }

    /// Validates and sends. The form is only reset after the server confirmed.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.api_error = None;
        if !self.form.validate() {
            return SubmitOutcome::Invalid;
        }

        let payload = to_request(&self.form);
        let outcome = {
            let _busy = BusyGuard::new(&self.busy);
            self.client.send(&payload).await
        };

        match &outcome {
            SubmitOutcome::Sent => {
                self.submitted = true;
                self.form.reset_form();
            }
            other => self.api_error = other.user_message(&self.messages),
        }
        outcome
    }
}
