//! Declarative field rules for contact submissions.
//!
//! Fields are checked in table order and each field's rules in declaration order. The first
//! violated rule wins, so a rejected submission carries exactly one message.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::types::ContactRequest;

pub const NAME_MAX: usize = 100;
pub const COMPANY_MAX: usize = 100;
pub const CLASSIFIER_MAX: usize = 100;
pub const EMAIL_MAX: usize = 255;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 5000;

lazy_static! {
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex");
}

/// `true` if `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming.
    Required(&'static str),
    MinChars(usize, &'static str),
    MaxChars(usize, &'static str),
    Email(&'static str),
}

impl Rule {
    /// Returns the rule's message if `value` violates it.
    fn violation(&self, value: &str) -> Option<&'static str> {
        let trimmed = value.trim();
        match self {
            Rule::Required(msg) => trimmed.is_empty().then_some(*msg),
            Rule::MinChars(min, msg) => (trimmed.chars().count() < *min).then_some(*msg),
            Rule::MaxChars(max, msg) => (trimmed.chars().count() > *max).then_some(*msg),
            Rule::Email(msg) => (!is_valid_email(trimmed)).then_some(*msg),
        }
    }
}

type Accessor = fn(&ContactRequest) -> Option<&str>;

/// Rules for one field of the payload.
pub struct FieldRules {
    pub field: &'static str,
    get: Accessor,
    /// Optional fields skip all rules when absent or blank.
    optional: bool,
    rules: Vec<Rule>,
}

/// A rejected field and the message of the rule it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub field: &'static str,
    pub message: &'static str,
}

impl From<SchemaViolation> for AppError {
    fn from(v: SchemaViolation) -> Self {
        AppError::InvalidInput(v.message.to_string())
    }
}

pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    /// The contact form schema.
    pub fn contact() -> Self {
        let fields = vec![
            FieldRules {
                field: "name",
                get: |r| Some(r.name.as_str()),
                optional: false,
                rules: vec![
                    Rule::Required("Name is required"),
                    Rule::MaxChars(NAME_MAX, "Name must be 100 characters or less"),
                ],
            },
            FieldRules {
                field: "email",
                get: |r| Some(r.email.as_str()),
                optional: false,
                rules: vec![
                    Rule::Required("Email is required"),
                    Rule::MaxChars(EMAIL_MAX, "Email must be 255 characters or less"),
                    Rule::Email("Invalid email format"),
                ],
            },
            FieldRules {
                field: "company",
                get: |r| r.company.as_deref(),
                optional: true,
                rules: vec![Rule::MaxChars(COMPANY_MAX, "Company must be 100 characters or less")],
            },
            FieldRules {
                field: "service",
                get: |r| r.service.as_deref(),
                optional: true,
                rules: vec![Rule::MaxChars(CLASSIFIER_MAX, "Service must be 100 characters or less")],
            },
            FieldRules {
                field: "budget",
                get: |r| r.budget.as_deref(),
                optional: true,
                rules: vec![Rule::MaxChars(CLASSIFIER_MAX, "Budget must be 100 characters or less")],
            },
            FieldRules {
                field: "message",
                get: |r| Some(r.message.as_str()),
                optional: false,
                rules: vec![
                    Rule::Required("Message is required"),
                    Rule::MinChars(MESSAGE_MIN, "Message must be at least 10 characters"),
                    Rule::MaxChars(MESSAGE_MAX, "Message must be 5000 characters or less"),
                ],
            },
        ];
        Self { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.field)
    }

    /// Stops at the first violated rule.
    pub fn validate(&self, req: &ContactRequest) -> Result<(), SchemaViolation> {
        for field in &self.fields {
            let value = (field.get)(req).unwrap_or("");
            if field.optional && value.trim().is_empty() {
                continue;
            }
            if let Some(message) = field.rules.iter().find_map(|rule| rule.violation(value)) {
                return Err(SchemaViolation { field: field.field, message });
            }
        }
        Ok(())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::contact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactRequest {
        ContactRequest {
            name: "Ada Lovelace".into(),
            email: "ada@analytical.io".into(),
            message: "I would like a quote.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(Schema::contact().validate(&valid()).is_ok());
    }

    #[test]
    fn test_message_length_boundary() {
        let schema = Schema::contact();
        let mut req = valid();
        req.message = "123456789".into();
        let err = schema.validate(&req).unwrap_err();
        assert_eq!(err.field, "message");
        assert_eq!(err.message, "Message must be at least 10 characters");

        req.message = "1234567890".into();
        assert!(schema.validate(&req).is_ok());

        req.message = "x".repeat(MESSAGE_MAX + 1);
        assert_eq!(schema.validate(&req).unwrap_err().message, "Message must be 5000 characters or less");
    }

    #[test]
    fn test_first_violation_only() {
        let req = ContactRequest { name: "   ".into(), email: "nope".into(), ..Default::default() };
        let err = Schema::contact().validate(&req).unwrap_err();
        assert_eq!(err, SchemaViolation { field: "name", message: "Name is required" });
    }

    #[test]
    fn test_email_rules_in_order() {
        let schema = Schema::contact();
        let mut req = valid();

        req.email = String::new();
        assert_eq!(schema.validate(&req).unwrap_err().message, "Email is required");

        req.email = "john@localhost".into();
        assert_eq!(schema.validate(&req).unwrap_err().message, "Invalid email format");

        req.email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(schema.validate(&req).unwrap_err().message, "Email must be 255 characters or less");
    }

    #[test]
    fn test_optional_fields() {
        let schema = Schema::contact();
        let mut req = valid();
        req.company = Some(String::new());
        assert!(schema.validate(&req).is_ok());

        req.company = Some("c".repeat(COMPANY_MAX + 1));
        assert_eq!(schema.validate(&req).unwrap_err().field, "company");
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let mut req = valid();
        req.name = "é".repeat(NAME_MAX);
        assert!(Schema::contact().validate(&req).is_ok());
    }

    #[test]
    fn test_field_order() {
        let order: Vec<_> = Schema::contact().fields().collect();
        assert_eq!(order, vec!["name", "email", "company", "service", "budget", "message"]);
    }
}
