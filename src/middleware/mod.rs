//! Request guards and HTTP middleware.
//!
//! Client identification, the sliding window rate limiter and the origin allow-list are
//! the first stages of the submission gate. Security headers are applied to every
//! response as an Axum middleware layer.

pub mod ip;
pub mod origin;
pub mod rate_limit;
pub mod security_headers;

pub use origin::OriginGuard;
pub use rate_limit::SlidingWindowLimiter;
