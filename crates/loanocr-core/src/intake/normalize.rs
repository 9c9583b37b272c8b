//! Repair of common OCR artifacts before field extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::NormalizationConfig;

lazy_static! {
    /// Any whitespace run followed by "com".
    static ref SPACED_COM: Regex = Regex::new(r"\s+com").unwrap();

    /// Whitespace + "com" directly after an `@domain` token.
    static ref SPACED_EMAIL_COM: Regex =
        Regex::new(r"(@[\w\-]+(?:\.[\w\-]+)*)\s+com\b").unwrap();
}

/// Rewrites OCR spacing artifacts in email-like text.
///
/// Rules, applied in order:
/// 1. `" @"` and `"@ "` collapse to `"@"`.
/// 2. whitespace followed by `com` becomes `.com`.
/// 3. `" dot "` and `" DOT "` become `"."`.
///
/// Rule 2 rewrites every occurrence, so `"Acme company"` turns into
/// `"Acme.company"`. [`TextNormalizer::with_scoped_com_repair`] limits it to
/// text following an `@domain` token.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    scoped_com_repair: bool,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NormalizationConfig) -> Self {
        Self::new().with_scoped_com_repair(config.scoped_com_repair)
    }

    /// Only repair `"example com"` right after an `@domain` token.
    pub fn with_scoped_com_repair(mut self, scoped: bool) -> Self {
        self.scoped_com_repair = scoped;
        self
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = text.replace(" @", "@").replace("@ ", "@");

        let text = if self.scoped_com_repair {
            SPACED_EMAIL_COM.replace_all(&text, "${1}.com").into_owned()
        } else {
            SPACED_COM.replace_all(&text, ".com").into_owned()
        };

        text.replace(" dot ", ".").replace(" DOT ", ".")
    }
}

/// Normalize text with the default (unscoped) rules.
pub fn normalize_text(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spaced_email() {
        assert_eq!(normalize_text("john @ example com"), "john@example.com");
        assert_eq!(normalize_text("jane@ mail dot org"), "jane@mail.org");
        assert_eq!(normalize_text("x DOT y"), "x.y");
    }

    #[test]
    fn test_no_change() {
        let text = "Name: John Doe\nMobile: 9876543210";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_com_rule_is_over_broad() {
        assert_eq!(normalize_text("Employer: Acme company"), "Employer: Acme.company");
        assert_eq!(normalize_text("Email:\ncom"), "Email:.com");
    }

    #[test]
    fn test_scoped_com_repair() {
        let normalizer = TextNormalizer::new().with_scoped_com_repair(true);
        assert_eq!(normalizer.normalize("john @ example com"), "john@example.com");
        assert_eq!(
            normalizer.normalize("Employer: Acme company"),
            "Employer: Acme company"
        );
        assert_eq!(
            normalizer.normalize("a@mail.example com"),
            "a@mail.example.com"
        );
    }

    #[test]
    fn test_idempotent_on_at_and_dot_rules() {
        for text in ["a @ b", "mail dot example", "x @ y DOT z", "plain text"] {
            let once = normalize_text(text);
            assert_eq!(normalize_text(&once), once, "input: {text:?}");
        }
    }

    #[test]
    fn test_repeated_com_edge_case() {
        // ".com" followed by more whitespace+"com": every run is rewritten in one pass
        let once = normalize_text("john@example.com com");
        assert_eq!(once, "john@example.com.com");
        assert_eq!(normalize_text(&once), once);

        let once = normalize_text("site com  com");
        assert_eq!(once, "site.com.com");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_double_space_before_at_needs_two_passes() {
        let once = normalize_text("john  @example.com");
        assert_eq!(once, "john @example.com");
        assert_eq!(normalize_text(&once), "john@example.com");
    }
}
