use std::sync::Arc;

use streams_canonical::{to_iso8601, Members, Value, OBJECT_TYPE_KEY};
use streams_schemas::{MissingCheck, PropertyRule, Schema, SchemaRegistry};
use tracing::{debug, trace};

use crate::document::Document;
use crate::errors::DocumentError;
use crate::mode::Mode;

/// An open document.
///
/// The builder is bound to the schema registered for its object type when it
/// was created; later registrations do not affect it. Every assignment goes
/// through the same pipeline: normalize the offered value, resolve the rule
/// by assignment or wire name, transform, check (unless skipped or lenient),
/// then store under the wire name. Array rules append to an existing
/// sequence. A failed assignment leaves the builder untouched.
///
/// [`finish`](Self::finish) freezes the builder in place; afterwards every
/// mutation fails with [`DocumentError::ImmutableDocument`].
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    registry: Arc<SchemaRegistry>,
    schema: Arc<Schema>,
    object_type: Option<String>,
    values: Members,
    mode: Mode,
    finished: bool,
}

impl DocumentBuilder {
    /// Opens a builder for `object_type`, recording it as the `objectType`
    /// member when `tagged` is set.
    pub fn new(
        registry: Arc<SchemaRegistry>,
        object_type: Option<&str>,
        tagged: bool,
        mode: Mode,
    ) -> Self {
        let schema = registry.lookup(object_type);
        let mut values = Members::new();
        if let (true, Some(tag)) = (tagged, object_type) {
            values.insert(OBJECT_TYPE_KEY.to_string(), tag.into());
        }
        Self {
            registry,
            schema,
            object_type: object_type.map(str::to_string),
            values,
            mode,
            finished: false,
        }
    }

    /// Assigns `value` to `name`, checking it unless the builder is lenient.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, DocumentError> {
        self.assign(name, value.into(), false)
    }

    /// Assigns `value` to `name` without running the check.
    pub fn set_unchecked(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, DocumentError> {
        self.assign(name, value.into(), true)
    }

    /// Assigns a value read back from JSON text or another document.
    ///
    /// Text does not record object types, so untyped mappings first take the
    /// type the rule (or the schema's missing check) requires. The value is
    /// then checked like [`set`](Self::set). The `objectType` member is stored
    /// as given, in place.
    pub fn replay(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, DocumentError> {
        if name == OBJECT_TYPE_KEY && self.schema.rule(name).is_none() {
            return self.assign(name, value.into(), true);
        }
        let value = match self.schema.rule(name) {
            Some(rule) => rule.adopt(value.into()),
            None => self.schema.missing_check().adopt(value.into()),
        };
        self.assign(name, value, false)
    }

    /// Removes `name`.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self, DocumentError> {
        self.assign(name, Value::Null, true)
    }

    /// Stored value for `name`, resolved through the rule's wire name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(wire_name(&self.schema, name))
    }

    /// Whether `name` currently holds a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(wire_name(&self.schema, name))
    }

    /// Turns checking on.
    pub fn strict(&mut self) -> Result<&mut Self, DocumentError> {
        self.ensure_open("strict")?;
        self.mode.strict = true;
        Ok(self)
    }

    /// Turns checking off; values are still transformed.
    pub fn lenient(&mut self) -> Result<&mut Self, DocumentError> {
        self.ensure_open("lenient")?;
        self.mode.strict = false;
        Ok(self)
    }

    /// Selects indented rendering.
    pub fn pretty(&mut self) -> Result<&mut Self, DocumentError> {
        self.ensure_open("pretty")?;
        self.mode.pretty = true;
        Ok(self)
    }

    /// Current mode flags.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Object type the builder was opened for.
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    /// Schema the builder validates against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Values assigned so far, in assignment order.
    pub fn values(&self) -> &Members {
        &self.values
    }

    /// Whether [`finish`](Self::finish) has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Freezes the builder and returns the finished document.
    ///
    /// Calling it again returns the same document.
    pub fn finish(&mut self) -> Document {
        self.freeze();
        Document::new(
            self.object_type.clone(),
            Arc::clone(&self.schema),
            self.values.clone(),
            self.mode,
        )
    }

    /// Consumes the builder, returning the finished document.
    pub fn build(mut self) -> Document {
        self.freeze();
        Document::new(self.object_type, self.schema, self.values, self.mode)
    }

    /// Builds a nested document and assigns it to `name`.
    ///
    /// The nested document is opened for the object type the rule requires,
    /// or the type the schema's missing check requires when `name` has no
    /// rule. With neither it has no object type and uses the base schema. It
    /// carries no `objectType` member and inherits this builder's mode.
    pub fn embed(
        &mut self,
        name: &str,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<&mut Self, DocumentError> {
        let object_type = embedded_type(&self.schema, name).map(str::to_string);
        self.embed_as(name, object_type.as_deref(), block)
    }

    /// Builds a `link` document and assigns it to the relation `rel`.
    pub fn link(
        &mut self,
        rel: &str,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<&mut Self, DocumentError> {
        self.embed_as(rel, Some("link"), block)
    }

    /// Dynamic entry point mirroring property-style calls.
    ///
    /// `name?` with no arguments asks whether the property is set and
    /// returns `Some(bool)`. Any other name assigns `args[0]`, with an
    /// optional boolean `args[1]` that skips the check when true, and
    /// returns `None`. Conversion (`to_*`) and alias (`alias_for_*`) names
    /// are not properties.
    pub fn dispatch(&mut self, name: &str, args: Vec<Value>) -> Result<Option<bool>, DocumentError> {
        if name.starts_with("to_") || name.starts_with("alias_for_") {
            return Err(DocumentError::UnknownOperation(name.to_string()));
        }
        if let Some(property) = name.strip_suffix('?') {
            if !args.is_empty() {
                return Err(DocumentError::UnknownOperation(format!(
                    "{name} takes no arguments, got {}",
                    args.len()
                )));
            }
            return Ok(Some(self.contains(property)));
        }
        if !(1..=2).contains(&args.len()) {
            return Err(DocumentError::UnknownOperation(format!(
                "{name} takes 1 or 2 arguments, got {}",
                args.len()
            )));
        }
        let mut args = args.into_iter();
        let value = args.next().unwrap_or(Value::Null);
        let skip_validation = match args.next() {
            None => false,
            Some(Value::Bool(skip)) => skip,
            Some(other) => {
                return Err(DocumentError::UnknownOperation(format!(
                    "{name}: second argument must be a boolean, got {}",
                    other.kind()
                )))
            }
        };
        self.assign(name, value, skip_validation)?;
        Ok(None)
    }

    fn embed_as(
        &mut self,
        name: &str,
        object_type: Option<&str>,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<&mut Self, DocumentError> {
        self.ensure_open(name)?;
        let mut nested =
            DocumentBuilder::new(Arc::clone(&self.registry), object_type, false, self.mode);
        block(&mut nested)?;
        let nested = nested.build();
        self.set(name, nested)
    }

    fn freeze(&mut self) {
        if !self.finished {
            self.finished = true;
            debug!(
                object_type = self.object_type.as_deref().unwrap_or("object"),
                properties = self.values.len(),
                "document finished"
            );
        }
    }

    fn ensure_open(&self, property: &str) -> Result<(), DocumentError> {
        if self.finished {
            return Err(DocumentError::ImmutableDocument {
                property: property.to_string(),
            });
        }
        Ok(())
    }

    fn assign(
        &mut self,
        name: &str,
        value: Value,
        skip_validation: bool,
    ) -> Result<&mut Self, DocumentError> {
        self.ensure_open(name)?;
        let schema = Arc::clone(&self.schema);
        let rule = schema.rule(name);
        let key = rule.map_or(name, PropertyRule::wire_name);

        if value.is_null() {
            self.values.shift_remove(key);
            trace!(property = name, "property cleared");
            return Ok(self);
        }

        let value = normalize(value);
        let value = match rule {
            Some(rule) => rule.transform(value),
            None => value,
        };

        if !skip_validation && self.mode.strict {
            let outcome = match rule {
                Some(rule) => rule.check(&value),
                None => schema.missing_check().check(&value),
            };
            if let Err(violation) = outcome {
                debug!(
                    object_type = self.object_type.as_deref().unwrap_or("object"),
                    property = name,
                    %violation,
                    "assignment rejected"
                );
                return Err(DocumentError::from_violation(
                    self.object_type.as_deref(),
                    name,
                    violation,
                ));
            }
        }

        if value.is_null() {
            self.values.shift_remove(key);
            return Ok(self);
        }

        let value = value.into_json();
        let appended = rule.is_some_and(PropertyRule::is_array);
        let unmerged = match (self.values.get_mut(key), value) {
            (Some(serde_json::Value::Array(existing)), serde_json::Value::Array(items))
                if appended =>
            {
                existing.extend(items);
                None
            }
            (_, value) => Some(value),
        };
        if let Some(value) = unmerged {
            self.values.insert(key.to_string(), value);
        }
        trace!(property = name, key, appended, "property assigned");
        Ok(self)
    }
}

fn embedded_type<'a>(schema: &'a Schema, name: &str) -> Option<&'a str> {
    match (schema.rule(name), schema.missing_check()) {
        (Some(rule), _) => rule.object_type(),
        (None, MissingCheck::Objects(required)) => required.as_deref(),
        (None, _) => None,
    }
}

fn wire_name<'a>(schema: &'a Schema, name: &'a str) -> &'a str {
    schema.rule(name).map_or(name, PropertyRule::wire_name)
}

/// Renders timestamps as ISO-8601 text, one level into sequences.
fn normalize(value: Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::String(to_iso8601(&ts)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Timestamp(ts) => Value::String(to_iso8601(&ts)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}
