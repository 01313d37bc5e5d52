//! Schemas for Activity Streams documents.
//!
//! A [`PropertyRule`] describes one field: the name it is assigned under, the
//! wire name it is serialized under, how offered values are normalized and
//! how they are checked. A [`Schema`] is an ordered set of rules for one
//! object type, and the [`SchemaRegistry`] maps object types to schemas with
//! a base-schema fallback. The [`catalog`] module defines the standard
//! object types.

#![deny(missing_docs)]

/// The standard object-type catalog.
pub mod catalog;
/// Object type -> schema registry.
pub mod registry;
/// Property rule combinators.
pub mod rule;
/// Schemas and composition.
pub mod schema;

pub use catalog::{LINK_RELATIONS, OBJECT_TYPES};
pub use registry::SchemaRegistry;
pub use rule::{
    adopt_object_type, check_object, Bounds, Predicate, PropertyRule, RangePolicy, RuleKind,
    Violation,
};
pub use schema::{MissingCheck, Schema};
