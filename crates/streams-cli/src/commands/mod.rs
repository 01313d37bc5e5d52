//! Subcommand implementations.

pub mod render;
pub mod types;
pub mod validate;

use std::io::{self, Read};

use streams_core::{Factory, Mode};

/// Reads JSON text from a file, or from stdin when no path is given.
pub fn read_input(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    let text = if let Some(path) = input {
        std::fs::read_to_string(&path).map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };
    Ok(text)
}

/// Factory over the standard catalog with the requested mode.
pub fn factory(lenient: bool, pretty: bool) -> Factory {
    let mode = Mode {
        strict: !lenient,
        pretty,
    };
    Factory::standard().with_mode(mode)
}
