//! Cross-Site Request Forgery (CSRF) protection based on request provenance.
//!
//! A state-changing request is accepted only if its `Origin` or `Referer` header points at
//! one of our own origins. Browsers always send at least one of them on cross-site form posts,
//! so a request carrying neither is treated as untrusted.

use axum::http::{header, HeaderMap};

use crate::config::SiteConfig;
use crate::error::{AppError, AppResult};

/// Allow-list of origins a submission may come from.
#[derive(Debug, Clone)]
pub struct OriginGuard {
    allowed: Vec<String>,
}

impl OriginGuard {
    /// Builds the allow-list from the canonical site URL, plus local origins in development.
    pub fn from_site(site: &SiteConfig) -> Self {
        let mut allowed = vec![normalize(&site.url)];
        if site.dev_mode {
            allowed.extend(site.dev_origins.iter().map(|o| normalize(o)));
        }
        allowed.retain(|o| !o.is_empty());
        Self { allowed }
    }

    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: origins.into_iter().map(|o| normalize(o.as_ref())).filter(|o| !o.is_empty()).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Accepts if `Origin` or `Referer` starts with an allowed origin; rejects when both are absent.
    pub fn check(&self, headers: &HeaderMap) -> AppResult<()> {
        let origin = header_str(headers, header::ORIGIN.as_str());
        let referer = header_str(headers, header::REFERER.as_str());

        if origin.is_none() && referer.is_none() {
            tracing::warn!("Rejected submission without Origin and Referer");
            return Err(AppError::Forbidden);
        }

        let ok = [origin, referer].into_iter().flatten().any(|value| self.is_allowed(value));
        if ok {
            Ok(())
        } else {
            tracing::warn!(origin = ?origin, referer = ?referer, "Rejected submission from foreign origin");
            Err(AppError::Forbidden)
        }
    }

    fn is_allowed(&self, value: &str) -> bool {
        self.allowed.iter().any(|allowed| match value.strip_prefix(allowed.as_str()) {
            // The match must end at an origin boundary, so `https://site.com.evil.net` fails
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
            None => false,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty())
}

fn normalize(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}
