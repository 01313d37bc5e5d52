//! The schema registry: object type -> schema, with a base fallback.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::catalog;
use crate::schema::Schema;

/// Shared mapping from object type to schema.
///
/// Lookups take a read lock and registrations a write lock. Schemas are
/// handed out as `Arc`s, so a builder keeps the schema that was current when
/// it was created even if the entry is overridden afterwards.
///
/// Registering a tag that already exists silently changes how every later
/// document of that type is validated. That is the extension point for the
/// object-type catalog, so it is allowed, but it is logged at `warn`.
#[derive(Debug)]
pub struct SchemaRegistry {
    base: RwLock<Arc<Schema>>,
    entries: RwLock<HashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    /// Creates a registry holding only `base`.
    pub fn new(base: Schema) -> Self {
        Self {
            base: RwLock::new(Arc::new(base)),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry pre-loaded with the standard object-type catalog.
    pub fn standard() -> Self {
        let registry = Self::new(catalog::object());
        for (tag, schema) in catalog::standard_schemas() {
            registry.insert(tag, schema);
        }
        registry
    }

    /// Schema for `type_tag`, falling back to the base schema when the tag is
    /// absent or unregistered.
    pub fn lookup(&self, type_tag: Option<&str>) -> Arc<Schema> {
        type_tag
            .and_then(|tag| self.get(tag))
            .unwrap_or_else(|| self.base())
    }

    /// Schema registered for exactly `type_tag`.
    pub fn get(&self, type_tag: &str) -> Option<Arc<Schema>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_tag)
            .cloned()
    }

    /// The fallback schema.
    pub fn base(&self) -> Arc<Schema> {
        self.base.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether a schema is registered for `type_tag`.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_tag)
    }

    /// Registers `schema` for `type_tag`, returning the schema it replaced.
    pub fn register(&self, type_tag: impl Into<String>, schema: Schema) -> Option<Arc<Schema>> {
        let type_tag = type_tag.into();
        let previous = self.insert(type_tag.clone(), schema);
        if previous.is_some() {
            tracing::warn!(object_type = %type_tag, "schema override replaces registered schema");
        } else {
            tracing::debug!(object_type = %type_tag, "schema registered");
        }
        previous
    }

    /// Replaces the fallback schema, returning the previous one.
    pub fn register_base(&self, schema: Schema) -> Arc<Schema> {
        let mut base = self.base.write().unwrap_or_else(PoisonError::into_inner);
        tracing::warn!("base schema replaced");
        std::mem::replace(&mut *base, Arc::new(schema))
    }

    /// Composes the schemas currently registered for `type_tags`, in order.
    ///
    /// Unregistered tags contribute the base schema.
    pub fn compose(&self, type_tags: &[&str]) -> Schema {
        let schemas: Vec<Arc<Schema>> = type_tags.iter().map(|t| self.lookup(Some(*t))).collect();
        Schema::compose(schemas.iter().map(Arc::as_ref))
    }

    /// Registered object types, sorted.
    pub fn type_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }

    fn insert(&self, type_tag: impl Into<String>, schema: Schema) -> Option<Arc<Schema>> {
        let type_tag = type_tag.into();
        let schema = Arc::new(schema.with_type_tag(type_tag.clone()));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_tag, schema)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
