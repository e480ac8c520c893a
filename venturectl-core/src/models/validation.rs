//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty (or whitespace only) when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// List field carries more entries than allowed
    TooMany { field: &'static str, max: usize },

    /// String doesn't match the required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value could not be interpreted (e.g. a non-numeric id)
    InvalidValue { field: &'static str, value: String },

    /// Body or parameter could not be decoded at all
    Malformed { what: &'static str, detail: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooMany { field, max } => {
                write!(f, "{} accepts at most {} entries", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidValue { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::Malformed { what, detail } => write!(f, "malformed {}: {}", what, detail),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `value` and enforce a non-empty, length-bounded string.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    bounded_text(field, trimmed, max)
}

/// Enforce a length bound (in characters) without requiring content.
pub(crate) fn bounded_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "comment",
            max: 500,
        };
        assert_eq!(
            err.to_string(),
            "comment exceeds maximum length of 500 characters"
        );

        let err = ValidationError::InvalidValue {
            field: "startupId",
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "invalid startupId value: 'abc'");
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Ada  ", 10).unwrap(), "Ada");
        assert_eq!(
            required_text("name", " \t ", 10).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn bounded_text_counts_characters_not_bytes() {
        // 3 Hangul syllables are 9 bytes
        assert!(bounded_text("comment", "투자자", 3).is_ok());
        assert!(bounded_text("comment", "투자자님", 3).is_err());
    }
}
