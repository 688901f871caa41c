//! Markup removal for free-text fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Elements whose content is never meant to be read as text
    static ref DROPPED_ELEMENTS: Regex =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").expect("valid regex");
    static ref COMMENTS: Regex = Regex::new(r"(?s)<!--.*?-->").expect("valid regex");
    // A tag must start with a letter, `/`, `!` or `?`, so "a < b" stays text
    static ref TAGS: Regex = Regex::new(r"(?s)</?[A-Za-z][^>]*>|<[!?][^>]*>").expect("valid regex");
}

/// Strips all tags (with their attributes) and trims surrounding whitespace.
///
/// `<script>` and `<style>` blocks are removed together with their content.
pub fn strip_markup(input: &str) -> String {
    let s = DROPPED_ELEMENTS.replace_all(input, "");
    let s = COMMENTS.replace_all(&s, "");
    let s = TAGS.replace_all(&s, "");
    s.trim().to_string()
}

/// Sanitizes an optional field. Blank results collapse to `None`.
pub fn strip_markup_opt(input: Option<&str>) -> Option<String> {
    input.map(strip_markup).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_block_removed() {
        assert_eq!(strip_markup("<script>x</script> Hello"), "Hello");
        assert_eq!(strip_markup("<SCRIPT type=\"text/javascript\">\nalert(1)\n</script >Hi"), "Hi");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(strip_markup("  Hello World  "), "Hello World");
    }

    #[test]
    fn test_tags_and_attributes_removed() {
        assert_eq!(strip_markup("<b onclick=\"steal()\">Bold</b> and <a href='x'>link</a>"), "Bold and link");
        assert_eq!(strip_markup("<img src=x onerror=alert(1)>"), "");
        assert_eq!(strip_markup("before<!-- hidden -->after"), "beforeafter");
    }

    #[test]
    fn test_plain_text_preserved() {
        assert_eq!(strip_markup("2 < 3 and 5 > 4"), "2 < 3 and 5 > 4");
        assert_eq!(strip_markup("Grüße & Dank"), "Grüße & Dank");
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(strip_markup_opt(None), None);
        assert_eq!(strip_markup_opt(Some("<i></i>  ")), None);
        assert_eq!(strip_markup_opt(Some(" <i>Acme</i> ")), Some("Acme".to_string()));
    }
}
