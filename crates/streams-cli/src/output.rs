//! Output formatting utilities.

use serde_json::Value;
use streams_schemas::{MissingCheck, Schema};

/// Formats a report as JSON.
pub fn format_json(report: &Value) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a registered type as a table row.
pub fn format_type_row(object_type: &str, schema: &Schema) -> String {
    format!(
        "{:<16} {:>5}  {}",
        truncate(object_type, 16),
        schema.len(),
        describe_missing_check(schema.missing_check())
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<16} {:>5}  {}", "TYPE", "RULES", "OTHER PROPERTIES");
    println!("{}", "-".repeat(48));
}

/// Short description of how a schema treats properties without a rule.
pub fn describe_missing_check(check: &MissingCheck) -> String {
    match check {
        MissingCheck::AcceptAll => "any value".to_string(),
        MissingCheck::Objects(Some(object_type)) => format!("{} objects", object_type),
        MissingCheck::Objects(None) => "objects".to_string(),
        MissingCheck::Custom(_) => "custom check".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
