use streams_canonical::RenderError;
use streams_schemas::Violation;
use thiserror::Error;

/// Errors raised while building, finishing or rendering documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A value failed the property's check (or the schema's missing check).
    #[error("validation failed for '{property}' on {object_type}: {reason}")]
    ValidationFailed {
        /// Object type of the document being built.
        object_type: String,
        /// Property name as assigned.
        property: String,
        /// What the check rejected.
        reason: String,
    },
    /// The document was already finished.
    #[error("cannot modify '{property}': document is finished")]
    ImmutableDocument {
        /// Property or mode toggle that was attempted.
        property: String,
    },
    /// A dynamic operation name or argument list is not supported.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    /// A value of the wrong kind was offered to a property.
    #[error("invalid type for '{property}' on {object_type}: {reason}")]
    InvalidType {
        /// Object type of the document being built.
        object_type: String,
        /// Property name as assigned.
        property: String,
        /// Expected and offered kinds.
        reason: String,
    },
    /// Rendering or parsing document text failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl DocumentError {
    /// Attaches document context to a rule violation.
    pub fn from_violation(object_type: Option<&str>, property: &str, violation: Violation) -> Self {
        let object_type = object_type.unwrap_or("object").to_string();
        let property = property.to_string();
        let reason = violation.to_string();
        match violation {
            Violation::WrongType { .. }
            | Violation::ObjectType { .. }
            | Violation::Untyped { .. } => DocumentError::InvalidType {
                object_type,
                property,
                reason,
            },
            Violation::Rejected(_) => DocumentError::ValidationFailed {
                object_type,
                property,
                reason,
            },
        }
    }
}
