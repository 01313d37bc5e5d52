//! Canonical value model for Activity Streams documents.
//!
//! Everything a property assignment can carry is expressed as a [`Value`];
//! documents store their finished properties as ordered JSON [`Members`].
//! The crate also hosts the pure predicates the schema layer consumes
//! (tokens, verbs, IRIs, MIME types, language tags), timestamp handling,
//! and the JSON text renderer.
//!
#![deny(missing_docs)]

/// Reference and token predicates.
pub mod matchers;
/// JSON text rendering and parsing.
pub mod render;
/// Timestamp parsing/rendering and duration helpers.
pub mod temporal;
/// Validation errors for canonical primitives.
pub mod validation;
/// The closed value model for property assignments.
pub mod value;

pub use matchers::{
    is_absolute_iri, is_iri, is_language_tag, is_mime_type, is_token, is_verb, Iri,
};
pub use render::{from_text, to_text, RenderError};
pub use temporal::{hours, minutes, now, parse_timestamp, seconds, to_iso8601};
pub use validation::ValidationError;
pub use value::{Members, Object, Value, OBJECT_TYPE_KEY};
