//! # Validation Errors
//!
//! Structured validation errors for domain types, built with `thiserror`.
//! Each variant carries the rejected input so that operators can diagnose
//! bad requests without guesswork.

use thiserror::Error;

/// Validation errors for domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A status string is not one of the four valid enum values.
    #[error("Invalid status. Must be one of: pending, in-progress, solved, escalated (got \"{0}\")")]
    InvalidStatus(String),

    /// A required field was missing or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A pagination parameter was out of range.
    #[error("{field} must be at least 1 (got {value})")]
    PageOutOfRange {
        /// The offending parameter name (`page` or `limit`).
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_status_names_the_input() {
        let err = ValidationError::InvalidStatus("closed".into());
        let msg = err.to_string();
        assert!(msg.contains("closed"));
        assert!(msg.contains("pending, in-progress, solved, escalated"));
    }

    #[test]
    fn page_out_of_range_names_field_and_value() {
        let err = ValidationError::PageOutOfRange {
            field: "limit",
            value: 0,
        };
        assert_eq!(err.to_string(), "limit must be at least 1 (got 0)");
    }
}
