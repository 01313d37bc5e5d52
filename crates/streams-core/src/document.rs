use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use streams_canonical::{to_text, Members, Object, RenderError, Value};
use streams_schemas::{PropertyRule, Schema};

use crate::mode::Mode;

/// A finished, immutable document.
///
/// Documents compare by their value mapping only; the object type, schema
/// and mode flags do not take part.
#[derive(Debug, Clone)]
pub struct Document {
    object_type: Option<String>,
    schema: Arc<Schema>,
    values: Members,
    mode: Mode,
}

impl Document {
    pub(crate) fn new(
        object_type: Option<String>,
        schema: Arc<Schema>,
        values: Members,
        mode: Mode,
    ) -> Self {
        Self {
            object_type,
            schema,
            values,
            mode,
        }
    }

    /// Object type the document was built for, whether or not it carries an
    /// `objectType` member.
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    /// Value for `name`, resolved through the rule's wire name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        let key = self.schema.rule(name).map_or(name, PropertyRule::wire_name);
        self.values.get(key)
    }

    /// Whether `name` holds a value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The value mapping, keyed by wire name in assignment order.
    pub fn values(&self) -> &Members {
        &self.values
    }

    /// Consumes the document, returning its value mapping.
    pub fn into_values(self) -> Members {
        self.values
    }

    /// Mode flags the document was finished with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Schema the document was validated against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Renders the document as JSON text.
    pub fn to_text(&self, pretty: bool) -> Result<String, RenderError> {
        to_text(&self.values, pretty)
    }

    /// Renders the document using its own `pretty` flag.
    pub fn render(&self) -> Result<String, RenderError> {
        self.to_text(self.mode.pretty)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(Object::new(document.object_type, document.values))
    }
}

impl From<&Document> for Value {
    fn from(document: &Document) -> Self {
        Value::Object(Object::new(
            document.object_type.clone(),
            document.values.clone(),
        ))
    }
}

impl From<Document> for serde_json::Value {
    fn from(document: Document) -> Self {
        serde_json::Value::Object(document.values)
    }
}
