//! Validate command implementation.

use serde_json::json;
use streams_canonical::from_text;

use super::{factory, read_input};
use crate::output;

pub fn run(
    input: Option<String>,
    object_type: Option<String>,
    lenient: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let members = from_text(&text).map_err(|e| format!("Invalid JSON: {}", e))?;
    let properties = members.len();

    let factory = factory(lenient, false);
    match factory.from_members(members, object_type.as_deref()) {
        Ok(document) => {
            let object_type = document.object_type().unwrap_or("object");
            tracing::info!(object_type, properties, "document valid");
            if json_output {
                let report = json!({
                    "valid": true,
                    "objectType": object_type,
                    "properties": properties,
                });
                println!("{}", output::format_json(&report));
            } else {
                println!("OK: {} ({} properties)", object_type, properties);
            }
            Ok(())
        }
        Err(e) => {
            if json_output {
                let report = json!({
                    "valid": false,
                    "error": e.to_string(),
                });
                println!("{}", output::format_json(&report));
            }
            Err(format!("Validation failed: {}", e).into())
        }
    }
}
