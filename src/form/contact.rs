use crate::form::i18n::Messages;
use crate::form::ValidationEngine;
use crate::gate::schema::{is_valid_email, MESSAGE_MIN};
use crate::types::ContactRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Company,
    Service,
    Budget,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Company,
        ContactField::Service,
        ContactField::Budget,
        ContactField::Message,
    ];

    /// JSON key of the field in the request payload.
    pub fn key(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Company => "company",
            ContactField::Service => "service",
            ContactField::Budget => "budget",
            ContactField::Message => "message",
        }
    }
}

/// A contact form with empty initial values and the validators shown inline.
///
/// Company, service and budget are free to leave blank. Length caps are only enforced
/// server side.
pub fn contact_form(messages: &Messages) -> ValidationEngine<ContactField> {
    let name_required = messages.name_required.clone();
    let email_required = messages.email_required.clone();
    let email_invalid = messages.email_invalid.clone();
    let message_required = messages.message_required.clone();
    let message_min_length = messages.message_min_length.clone();

    ValidationEngine::new(ContactField::ALL.map(|f| (f, "")))
        .with_validator(ContactField::Name, move |v| v.trim().is_empty().then(|| name_required.clone()))
        .with_validator(ContactField::Email, move |v| {
            if v.trim().is_empty() {
                Some(email_required.clone())
            } else if !is_valid_email(v) {
                Some(email_invalid.clone())
            } else {
                None
            }
        })
        .with_validator(ContactField::Company, |_| None)
        .with_validator(ContactField::Service, |_| None)
        .with_validator(ContactField::Budget, |_| None)
        .with_validator(ContactField::Message, move |v| {
            let v = v.trim();
            if v.is_empty() {
                Some(message_required.clone())
            } else if v.chars().count() < MESSAGE_MIN {
                Some(message_min_length.clone())
            } else {
                None
            }
        })
}

/// The request body for the current form values. Blank optional fields are omitted.
pub fn to_request(form: &ValidationEngine<ContactField>) -> ContactRequest {
    let optional = |f: ContactField| {
        let v = form.value(f);
        (!v.trim().is_empty()).then(|| v.to_string())
    };
    ContactRequest {
        name: form.value(ContactField::Name).to_string(),
        email: form.value(ContactField::Email).to_string(),
        company: optional(ContactField::Company),
        service: optional(ContactField::Service),
        budget: optional(ContactField::Budget),
        message: form.value(ContactField::Message).to_string(),
        website: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::i18n::Locale;

    #[test]
    fn test_empty_form_reports_required_fields() {
        let mut form = contact_form(&Messages::default());
        assert!(!form.validate());
        assert_eq!(form.error(ContactField::Name), Some("Name is required"));
        assert_eq!(form.error(ContactField::Email), Some("Email is required"));
        assert_eq!(form.error(ContactField::Message), Some("Message is required"));
        assert_eq!(form.error(ContactField::Company), None);
        assert_eq!(form.first_error().map(|(f, _)| f), Some(ContactField::Name));
    }

    #[test]
    fn test_message_min_length() {
        let mut form = contact_form(&Messages::default());
        form.set_field_value(ContactField::Message, "123456789");
        form.handle_blur(ContactField::Message);
        assert_eq!(form.error(ContactField::Message), Some("Message must be at least 10 characters"));

        form.handle_change(ContactField::Message)("1234567890".to_string());
        assert_eq!(form.error(ContactField::Message), None);
    }

    #[test]
    fn test_localized_messages() {
        let mut form = contact_form(&Messages::for_locale(Locale::Es));
        form.set_field_value(ContactField::Email, "not-an-email");
        form.handle_blur(ContactField::Email);
        assert_eq!(form.error(ContactField::Email), Some("Introduce un correo electrónico válido"));
    }

    #[test]
    fn test_to_request() {
        let mut form = contact_form(&Messages::default());
        form.set_field_value(ContactField::Name, "Ada");
        form.set_field_value(ContactField::Email, "ada@acme.io");
        form.set_field_value(ContactField::Company, "  ");
        form.set_field_value(ContactField::Service, "audit");
        form.set_field_value(ContactField::Message, "Hello there, world");

        let req = to_request(&form);
        assert_eq!(req.name, "Ada");
        assert_eq!(req.company, None);
        assert_eq!(req.service.as_deref(), Some("audit"));
        assert_eq!(req.website, None);
    }
}
