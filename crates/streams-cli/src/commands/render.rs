//! Render command implementation.

use super::{factory, read_input};

pub fn run(
    input: Option<String>,
    object_type: Option<String>,
    pretty: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let factory = factory(lenient, pretty);
    let document = factory.from_text(&text, object_type.as_deref())?;
    println!("{}", document.render()?);
    Ok(())
}
