use serde_json::Value;

use crate::value::Members;

/// Error returned when rendering or parsing document text fails.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Parsed JSON is not shaped like a document.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Text could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders document members as JSON text.
///
/// Keys come out in insertion order; `pretty` selects two-space indentation.
pub fn to_text(members: &Members, pretty: bool) -> Result<String, RenderError> {
    let text = if pretty {
        serde_json::to_string_pretty(members)?
    } else {
        serde_json::to_string(members)?
    };
    Ok(text)
}

/// Parses JSON text into document members, keeping key order.
pub fn from_text(text: &str) -> Result<Members, RenderError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(members) => Ok(members),
        other => Err(RenderError::InvalidStructure(format!(
            "root: expected an object, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_keep_insertion_order() {
        let members = from_text(r#"{"b":1,"a":{"z":2,"y":3}}"#).unwrap();
        assert_eq!(to_text(&members, false).unwrap(), r#"{"b":1,"a":{"z":2,"y":3}}"#);
    }

    #[test]
    fn pretty_output_is_indented() {
        let members = from_text(r#"{"verb":"post"}"#).unwrap();
        assert_eq!(to_text(&members, true).unwrap(), "{\n  \"verb\": \"post\"\n}");
    }

    #[test]
    fn non_object_roots_are_rejected() {
        let err = from_text("[1,2]").unwrap_err();
        assert!(matches!(err, RenderError::InvalidStructure(_)));
        assert!(matches!(from_text("{"), Err(RenderError::Json(_))));
    }
}
