//! Optional submission policies: business-only email addresses and the honeypot field.

use crate::error::{AppError, AppResult};

/// Consumer mail providers rejected when only business addresses are accepted.
pub const PERSONAL_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "icloud.com",
    "protonmail.com",
    "aol.com",
    "gmx.com",
    "mail.com",
    "zoho.com",
    "yandex.com",
    "qq.com",
    "naver.com",
    "163.com",
    "126.com",
    "rediffmail.com",
];

pub const BUSINESS_EMAIL_MESSAGE: &str = "Please use your business email address";

/// Domain part of an address with exactly one `@`, trimmed and lower-cased.
pub fn email_domain(email: &str) -> Option<String> {
    let mut parts = email.split('@');
    let (_local, domain) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let domain = domain.trim().to_lowercase();
    (!domain.is_empty()).then_some(domain)
}

/// `true` if the address belongs to a consumer mail provider.
pub fn is_personal_email(email: &str) -> bool {
    email_domain(email).map(|d| PERSONAL_EMAIL_DOMAINS.contains(&d.as_str())).unwrap_or(false)
}

/// Rejects addresses from [`PERSONAL_EMAIL_DOMAINS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessEmailPolicy;

impl BusinessEmailPolicy {
    pub fn check(&self, email: &str) -> AppResult<()> {
        if is_personal_email(email) {
            return Err(AppError::InvalidInput(BUSINESS_EMAIL_MESSAGE.to_string()));
        }
        Ok(())
    }
}

/// `true` if the hidden field was filled in. Whitespace alone does not count.
pub fn honeypot_triggered(website: Option<&str>) -> bool {
    website.map(|w| !w.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_domains_case_and_whitespace_insensitive() {
        assert!(is_personal_email("John@GMAIL.com"));
        assert!(is_personal_email("john@ gmail.com "));
        assert!(is_personal_email("x@Hotmail.Com"));
        assert!(!is_personal_email("john@acme.io"));
    }

    #[test]
    fn test_malformed_addresses_are_not_personal() {
        assert!(!is_personal_email("gmail.com"));
        assert!(!is_personal_email("a@b@gmail.com"));
        assert!(!is_personal_email("john@"));
    }

    #[test]
    fn test_policy_check() {
        let policy = BusinessEmailPolicy;
        match policy.check("John@GMAIL.com") {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, BUSINESS_EMAIL_MESSAGE),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert!(policy.check("john@acme.io").is_ok());
    }

    #[test]
    fn test_honeypot() {
        assert!(!honeypot_triggered(None));
        assert!(!honeypot_triggered(Some("")));
        assert!(!honeypot_triggered(Some("   ")));
        assert!(honeypot_triggered(Some("https://spam.example")));
    }
}
