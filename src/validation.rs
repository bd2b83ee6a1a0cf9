//! Shared form validation helpers.
//!
//! Field rules themselves live on the form structs as `validator` derive
//! attributes; this module holds the custom rule functions and the glue that
//! turns `ValidationErrors` into the flat error list echoed into re-rendered
//! form contexts.

use chrono::NaiveDate;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// A single field-level validation failure, as surfaced to the form template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

/// Flatten `ValidationErrors` into the list shape form templates consume.
/// `ValidationErrors` hashes by field, so callers pass the form's field order
/// to keep the rendered list stable.
pub fn collect_errors(errors: &ValidationErrors, field_order: &[&str]) -> Vec<FieldError> {
    let mut out = Vec::new();
    for field in field_order {
        if let Some(validator::ValidationErrorsKind::Field(field_errors)) = errors
            .errors()
            .iter()
            .find(|(key, _)| **key == *field)
            .map(|(_, kind)| kind)
        {
            for err in field_errors {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                out.push(FieldError {
                    field: field.to_string(),
                    msg,
                });
            }
        }
    }
    out
}

/// Charset rule: letters and digits only (no spaces or punctuation).
pub fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("non_alphanumeric"))
    }
}

/// Optional ISO-8601 calendar date. Empty input counts as absent.
pub fn iso_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_date"))
    }
}

/// Parse an already-validated optional ISO date field.
pub fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

/// HTML-escape a field value before it is stored on an entity.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphanumeric_accepts_letters_and_digits() {
        assert!(alphanumeric("Brandon42").is_ok());
        assert!(alphanumeric("Öberg").is_ok());
    }

    #[test]
    fn alphanumeric_rejects_punctuation_and_spaces() {
        assert!(alphanumeric("Le Guin").is_err());
        assert!(alphanumeric("O'Brian").is_err());
    }

    #[test]
    fn iso_date_allows_empty_and_valid_dates() {
        assert!(iso_date("").is_ok());
        assert!(iso_date("1920-01-02").is_ok());
        assert!(iso_date("1920-13-02").is_err());
        assert!(iso_date("02/01/1920").is_err());
    }

    #[test]
    fn parse_date_treats_empty_as_absent() {
        assert_eq!(parse_date(&None), None);
        assert_eq!(parse_date(&Some(String::new())), None);
        assert_eq!(
            parse_date(&Some("1920-01-02".to_string())),
            NaiveDate::from_ymd_opt(1920, 1, 2)
        );
    }

    #[test]
    fn escape_html_replaces_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Dune" & more</b>"#),
            "&lt;b&gt;&quot;Dune&quot; &amp; more&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
