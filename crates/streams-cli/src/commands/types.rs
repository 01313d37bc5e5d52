//! Types command implementation.

use serde_json::json;
use streams_schemas::SchemaRegistry;

use crate::output;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = SchemaRegistry::standard();
    let tags = registry.type_tags();

    if json {
        let types: Vec<_> = tags
            .iter()
            .filter_map(|tag| registry.get(tag).map(|schema| (tag, schema)))
            .map(|(tag, schema)| {
                json!({
                    "objectType": tag,
                    "rules": schema.rules().map(|r| r.wire_name()).collect::<Vec<_>>(),
                    "otherProperties": output::describe_missing_check(schema.missing_check()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string(&types)?);
        return Ok(());
    }

    output::print_table_header();
    println!("{}", output::format_type_row("(base)", &registry.base()));
    for tag in &tags {
        if let Some(schema) = registry.get(tag) {
            println!("{}", output::format_type_row(tag, &schema));
        }
    }
    Ok(())
}
