//! # Formwacht Backend Library
//!
//! Formwacht receives submissions of a public contact form and defends them against spam,
//! bots and cross-site forgery before anything is stored.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server and routing
//! - **SQLx**: Asynchronous persistence with SQLite
//! - **Tokio**: Async runtime
//! - **Serde**: JSON (de)serialization
//!
//! ## Core Components
//!
//! - [`config`]: Application configuration management
//! - [`db`]: Database schema initialization
//! - [`error`]: Centralized error handling and HTTP error responses
//! - [`form`]: Client-side field validation and submission with timeout/cancellation
//! - [`gate`]: The ordered submission checks (schema, policies, sanitizing, persistence)
//! - [`metrics`]: Counters per submission outcome
//! - [`middleware`]: Client identification, rate limiting, origin allow-list, security headers
//! - [`routes`]: HTTP API endpoint handlers
//! - [`state`]: Shared application state
//! - [`types`]: Request, record and response types
//!
//! ## Submission flow
//!
//! `POST /api/contact` passes rate limit, origin check, body parse, schema validation,
//! the optional business-email and honeypot policies, sanitizing and persistence, in that
//! order, stopping at the first failure.

pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod gate;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
