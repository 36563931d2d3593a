//! Request validation.
//!
//! Request bodies deserialize into loosely typed structs and are then turned
//! into validated values through [`Validate`]. Every failure is a
//! [`ValidationError`] variant, which carries its own machine-readable code.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::json_utils::Numeric;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{3}|[A-Fa-f0-9]{6}|[A-Fa-f0-9]{8})$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Valid ID is required")]
    InvalidId,

    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("{message}")]
    OutOfRange {
        field: &'static str,
        message: String,
    },

    #[error("No valid fields provided for update")]
    NoUpdates,

    #[error("{message}")]
    Duplicate {
        field: &'static str,
        message: String,
    },

    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),

    #[error("Invalid query parameters: {0}")]
    MalformedQuery(String),

    #[error("transactions array cannot be empty")]
    EmptyBatch,

    #[error("Transaction at index {index}: {inner}")]
    BatchItem {
        index: usize,
        inner: Box<ValidationError>,
    },

    #[error("Transaction description must be a non-empty string")]
    DescriptionRequired,

    #[error("Transaction description too short (minimum 3 characters)")]
    DescriptionTooShort,

    #[error("Transaction description too long (maximum 500 characters)")]
    DescriptionTooLong,

    #[error("Transaction description contains too many special characters")]
    DescriptionTooNoisy,

    #[error("Amount must be a valid number")]
    AmountNotNumber,

    #[error("Amount cannot be negative")]
    AmountNegative,

    #[error("Amount exceeds maximum limit ($1,000,000)")]
    AmountTooLarge,
}

impl ValidationError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            message: message.into(),
        }
    }

    /// Machine-readable code returned alongside the message.
    pub fn code(&self) -> String {
        match self {
            Self::InvalidId => "INVALID_ID".into(),
            Self::Missing { field } => format!("MISSING_{}", field.to_ascii_uppercase()),
            Self::Invalid { field, .. } => format!("INVALID_{}", field.to_ascii_uppercase()),
            Self::OutOfRange { field, .. } => {
                format!("{}_OUT_OF_RANGE", field.to_ascii_uppercase())
            }
            Self::NoUpdates => "NO_UPDATES".into(),
            Self::Duplicate { field, .. } => format!("DUPLICATE_{}", field.to_ascii_uppercase()),
            Self::MalformedBody(_) => "INVALID_BODY".into(),
            Self::MalformedQuery(_) => "INVALID_QUERY".into(),
            Self::EmptyBatch => "EMPTY_TRANSACTIONS_ARRAY".into(),
            Self::BatchItem { inner, .. } => inner.code(),
            Self::DescriptionRequired => "DESCRIPTION_REQUIRED".into(),
            Self::DescriptionTooShort => "DESCRIPTION_TOO_SHORT".into(),
            Self::DescriptionTooLong => "DESCRIPTION_TOO_LONG".into(),
            Self::DescriptionTooNoisy => "DESCRIPTION_TOO_NOISY".into(),
            Self::AmountNotNumber => "INVALID_AMOUNT".into(),
            Self::AmountNegative => "NEGATIVE_AMOUNT".into(),
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE".into(),
        }
    }
}

/// Turn a raw request body into a value the repository can store.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ValidationError>;
}

/// Path ids must be positive.
pub fn check_id(id: i64) -> Result<i64, ValidationError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ValidationError::InvalidId)
    }
}

/// A trimmed, non-empty string for a required field.
pub fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Missing { field }),
    }
}

/// Blank optional strings are stored as NULL.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A required reference to another row.
pub fn required_ref(value: Option<Numeric>, field: &'static str) -> Result<i64, ValidationError> {
    match value {
        None => Err(ValidationError::Missing { field }),
        Some(n) => parse_ref(&n, field),
    }
}

pub fn optional_ref(
    value: Option<Numeric>,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    value.map(|n| parse_ref(&n, field)).transpose()
}

pub fn parse_ref(value: &Numeric, field: &'static str) -> Result<i64, ValidationError> {
    match value.as_i64() {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::invalid(
            field,
            format!("{field} must be a valid positive integer"),
        )),
    }
}

/// An id passed as a query-string filter. Blank means "no filter".
pub fn query_ref(value: Option<&str>, field: &'static str) -> Result<Option<i64>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_ref(&Numeric::Text(v.to_string()), field).map(Some),
    }
}

/// Confidence scores live in `[0, 1]`.
pub fn parse_confidence(value: &Numeric) -> Result<f64, ValidationError> {
    let confidence = value.as_f64().ok_or_else(|| {
        ValidationError::invalid("confidence_format", "confidence must be a valid number")
    })?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(ValidationError::out_of_range(
            "confidence",
            "confidence must be between 0 and 1",
        ));
    }
    Ok(confidence)
}

pub fn check_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "color_hex",
            "Invalid color hex format. Expected format: #RGB, #RRGGBB, or #RRGGBBAA",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_derive_from_field_names() {
        assert_eq!(
            ValidationError::Missing { field: "user_id" }.code(),
            "MISSING_USER_ID"
        );
        assert_eq!(
            ValidationError::invalid("color_hex", "bad").code(),
            "INVALID_COLOR_HEX"
        );
        assert_eq!(
            ValidationError::out_of_range("confidence", "bad").code(),
            "CONFIDENCE_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_batch_item_reports_inner_code_and_index() {
        let err = ValidationError::BatchItem {
            index: 2,
            inner: Box::new(ValidationError::Missing {
                field: "description",
            }),
        };
        assert_eq!(err.code(), "MISSING_DESCRIPTION");
        assert_eq!(
            err.to_string(),
            "Transaction at index 2: description is required"
        );
    }

    #[test]
    fn test_check_id_rejects_zero_and_negative() {
        assert_eq!(check_id(0), Err(ValidationError::InvalidId));
        assert_eq!(check_id(-4), Err(ValidationError::InvalidId));
        assert_eq!(check_id(7), Ok(7));
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(
            required_text(Some("  Dining ".into()), "name"),
            Ok("Dining".to_string())
        );
        assert_eq!(
            required_text(Some("   ".into()), "name"),
            Err(ValidationError::Missing { field: "name" })
        );
        assert_eq!(
            required_text(None, "name"),
            Err(ValidationError::Missing { field: "name" })
        );
    }

    #[test]
    fn test_refs_accept_numeric_strings() {
        assert_eq!(
            required_ref(Some(Numeric::Text("12".into())), "transaction_id"),
            Ok(12)
        );
        assert!(matches!(
            required_ref(Some(Numeric::Text("abc".into())), "transaction_id"),
            Err(ValidationError::Invalid { field: "transaction_id", .. })
        ));
        assert_eq!(optional_ref(None, "prediction_id"), Ok(None));
    }

    #[test]
    fn test_query_ref() {
        assert_eq!(query_ref(Some(" 4 "), "user_id"), Ok(Some(4)));
        assert_eq!(query_ref(Some(""), "user_id"), Ok(None));
        assert_eq!(query_ref(None, "user_id"), Ok(None));
        assert_eq!(
            query_ref(Some("me"), "user_id").unwrap_err().code(),
            "INVALID_USER_ID"
        );
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(parse_confidence(&Numeric::from(0.5)), Ok(0.5));
        assert_eq!(
            parse_confidence(&Numeric::from(1.5)).map_err(|e| e.code()),
            Err("CONFIDENCE_OUT_OF_RANGE".to_string())
        );
        assert_eq!(
            parse_confidence(&Numeric::Text("high".into())).map_err(|e| e.code()),
            Err("INVALID_CONFIDENCE_FORMAT".to_string())
        );
    }

    #[test]
    fn test_hex_colors() {
        assert!(check_hex_color("#fff").is_ok());
        assert!(check_hex_color("#4CAF50").is_ok());
        assert!(check_hex_color("#4CAF50FF").is_ok());
        assert!(check_hex_color("4CAF50").is_err());
        assert!(check_hex_color("#4CAF5").is_err());
    }
}
