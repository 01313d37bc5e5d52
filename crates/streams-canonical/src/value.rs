use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Number;

use crate::temporal::to_iso8601;

/// Ordered JSON object holding a document's properties in insertion order.
pub type Members = serde_json::Map<String, serde_json::Value>;

/// Member name carrying the object type of a mapping.
pub const OBJECT_TYPE_KEY: &str = "objectType";

/// A value offered to a property assignment.
///
/// Finished documents convert into [`Value::Object`], keeping the object type
/// they were built for so nested-object checks can compare it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; assigning it clears the property.
    Null,
    /// Boolean.
    Bool(bool),
    /// Finite number.
    Number(Number),
    /// String.
    String(String),
    /// Instant, rendered as ISO-8601 when stored.
    Timestamp(DateTime<Utc>),
    /// Sequence of values.
    Array(Vec<Value>),
    /// Mapping, raw or produced by a finished document.
    Object(Object),
}

/// A mapping together with the object type it represents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    object_type: Option<String>,
    members: Members,
}

impl Object {
    /// Creates a mapping with an explicit object type.
    pub fn new(object_type: Option<String>, members: Members) -> Self {
        Self {
            object_type,
            members,
        }
    }

    /// Wraps a raw mapping; its object type is read from the `objectType` member.
    pub fn from_members(members: Members) -> Self {
        let object_type = members
            .get(OBJECT_TYPE_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Self {
            object_type,
            members,
        }
    }

    /// Records `object_type` unless the mapping already records one.
    pub fn or_object_type(mut self, object_type: &str) -> Self {
        if self.object_type.is_none() {
            self.object_type = Some(object_type.to_string());
        }
        self
    }

    /// Object type recorded for this mapping, if any.
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    /// The mapping's members.
    pub fn members(&self) -> &Members {
        &self.members
    }

    /// Consumes the mapping, returning its members.
    pub fn into_members(self) -> Members {
        self.members
    }
}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Numeric view of the value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// String view of the value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of the value: strings as-is, timestamps as ISO-8601,
    /// everything else as compact JSON.
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Timestamp(ts) => to_iso8601(ts),
            Value::Array(_) | Value::Object(_) => self.to_json().to_string(),
        }
    }

    /// Converts into plain JSON, dropping recorded object types.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Timestamp(ts) => serde_json::Value::String(to_iso8601(&ts)),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Value::into_json).collect())
            }
            Value::Object(object) => serde_json::Value::Object(object.members),
        }
    }

    /// Borrowing variant of [`Value::into_json`].
    pub fn to_json(&self) -> serde_json::Value {
        self.clone().into_json()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => serializer.serialize_str(&to_iso8601(ts)),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(object) => object.members.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(members) => Value::Object(Object::from_members(members)),
        }
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Members> for Value {
    fn from(members: Members) -> Self {
        Value::Object(Object::from_members(members))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// JSON has no spelling for NaN or infinities; such floats become
/// [`Value::Null`], which clears the property they are assigned to.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(f64::from(n))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
