use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a reference parses but is not absolute.
    #[error("{field} ('{value}') is not an absolute reference")]
    RelativeReference {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a timestamp cannot be parsed.
    #[error("'{0}' is not a recognizable timestamp")]
    Timestamp(String),
}
