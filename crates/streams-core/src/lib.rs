//! Schema-driven builder for Activity Streams documents.
//!
//! A [`Factory`] holds the shared [`SchemaRegistry`](streams_schemas::SchemaRegistry)
//! and opens [`DocumentBuilder`]s bound to an object type. Each assignment
//! is normalized, checked against the type's schema and stored under its
//! wire name; finishing a builder yields an immutable [`Document`] that
//! renders to JSON text in assignment order.
//!
//! Core invariants:
//! - A builder keeps the schema that was registered when it was opened
//! - Finished documents never change; mutation reports `ImmutableDocument`
//! - A failed assignment leaves the builder as it was
//!
#![deny(missing_docs)]

/// The open document and its assignment pipeline.
pub mod builder;
/// The finished document.
pub mod document;
/// Error types for document operations.
pub mod errors;
/// Registry context and per-type shorthands.
pub mod factory;
/// Validation and rendering flags.
pub mod mode;

pub use builder::DocumentBuilder;
pub use document::Document;
pub use errors::DocumentError;
pub use factory::Factory;
pub use mode::Mode;
pub use streams_canonical::{hours, minutes, now, seconds, Value};
