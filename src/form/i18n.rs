//! User-facing strings for the contact form.
//!
//! The site's translation service owns the full catalog; this is the subset the form logic
//! needs, with English and Spanish built in.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Parses a language tag such as `es`, `es-ES` or `en_US`. Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let lang = tag.trim().split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        match lang.as_str() {
            "es" => Locale::Es,
            _ => Locale::En,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub name_required: String,
    pub email_required: String,
    pub email_invalid: String,
    pub message_required: String,
    pub message_min_length: String,
    pub timed_out: String,
    pub send_failed: String,
    pub network_failed: String,
}

impl Messages {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                name_required: "Name is required".into(),
                email_required: "Email is required".into(),
                email_invalid: "Please enter a valid email address".into(),
                message_required: "Message is required".into(),
                message_min_length: "Message must be at least 10 characters".into(),
                timed_out: "Request timed out. Please check your connection and try again.".into(),
                send_failed: "Failed to send message".into(),
                network_failed: "Could not reach the server. Please try again.".into(),
            },
            Locale::Es => Self {
                name_required: "El nombre es obligatorio".into(),
                email_required: "El correo electrónico es obligatorio".into(),
                email_invalid: "Introduce un correo electrónico válido".into(),
                message_required: "El mensaje es obligatorio".into(),
                message_min_length: "El mensaje debe tener al menos 10 caracteres".into(),
                timed_out: "La solicitud ha tardado demasiado. Comprueba tu conexión e inténtalo de nuevo.".into(),
                send_failed: "No se pudo enviar el mensaje".into(),
                network_failed: "No se pudo contactar con el servidor. Inténtalo de nuevo.".into(),
            },
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::for_locale(Locale::En)
    }
}
