//! Property rules: one declarative descriptor per schema field.

use std::fmt;
use std::sync::Arc;

use serde_json::Number;
use streams_canonical::{is_absolute_iri, is_iri, parse_timestamp, to_iso8601, Iri, Value};
use thiserror::Error;

/// Shareable test over a borrowed value.
pub struct Predicate<T: ?Sized>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T: ?Sized> Predicate<T> {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Runs the test.
    pub fn test(&self, value: &T) -> bool {
        (self.0)(value)
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Why a value failed a rule's check.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Violation {
    /// The value is of the wrong kind for the rule.
    #[error("expected {expected}, found {found}")]
    WrongType {
        /// Kind the rule accepts.
        expected: &'static str,
        /// Kind that was offered.
        found: &'static str,
    },
    /// A nested mapping records a different object type than required.
    #[error("expected an object of type '{expected}', found '{found}'")]
    ObjectType {
        /// Required object type.
        expected: String,
        /// Recorded object type.
        found: String,
    },
    /// A nested mapping records no object type where one is required.
    #[error("expected an object of type '{expected}', found an untyped mapping")]
    Untyped {
        /// Required object type.
        expected: String,
    },
    /// The value has the right kind but is not acceptable.
    #[error("{0}")]
    Rejected(String),
}

/// What happens to a number outside a bounded rule's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Out-of-range values fail the check.
    Reject,
    /// Out-of-range values are pulled to the nearest bound by the transform.
    Clamp,
}

/// Closed interval for numeric rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Out-of-range handling.
    pub policy: RangePolicy,
}

impl Bounds {
    fn contains(&self, n: f64) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

/// The shape of value a rule governs.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Free text, optionally constrained by a predicate on the stringified value.
    String(Option<Predicate<str>>),
    /// ISO-8601 timestamp.
    DateTime,
    /// Absolute IRI.
    AbsoluteIri,
    /// IRI reference, relative allowed.
    Iri,
    /// Nested mapping, optionally of one object type.
    Object(Option<String>),
    /// Sequence of nested mappings, optionally of one object type.
    ObjectArray(Option<String>),
    /// Sequence of strings, each optionally constrained by a predicate.
    StringArray(Option<Predicate<str>>),
    /// Number with an optional predicate and optional bounds.
    Numeric {
        /// Extra acceptance test.
        predicate: Option<Predicate<Number>>,
        /// Inclusive range and its policy.
        bounds: Option<Bounds>,
    },
    /// Boolean.
    Boolean,
}

/// Descriptor for one schema field.
#[derive(Debug, Clone)]
pub struct PropertyRule {
    name: String,
    alias: Option<String>,
    kind: RuleKind,
}

impl PropertyRule {
    /// Creates a rule of the given kind.
    pub fn new(name: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind,
        }
    }

    /// Free-text property.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::String(None))
    }

    /// Free-text property whose stringified value must satisfy `predicate`.
    pub fn string_matching(
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, RuleKind::String(Some(Predicate::new(predicate))))
    }

    /// Timestamp property.
    pub fn date_time(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::DateTime)
    }

    /// Absolute IRI property.
    pub fn absolute_iri(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::AbsoluteIri)
    }

    /// IRI reference property.
    pub fn iri(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::Iri)
    }

    /// Nested object of any type.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::Object(None))
    }

    /// Nested object of `object_type`.
    pub fn object_of(name: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self::new(name, RuleKind::Object(Some(object_type.into())))
    }

    /// Sequence of nested objects of any type.
    pub fn object_array(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::ObjectArray(None))
    }

    /// Sequence of nested objects of `object_type`.
    pub fn object_array_of(name: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self::new(name, RuleKind::ObjectArray(Some(object_type.into())))
    }

    /// Sequence of strings.
    pub fn string_array(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::StringArray(None))
    }

    /// Sequence of strings, each satisfying `predicate`.
    pub fn string_array_matching(
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, RuleKind::StringArray(Some(Predicate::new(predicate))))
    }

    /// Any number.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(
            name,
            RuleKind::Numeric {
                predicate: None,
                bounds: None,
            },
        )
    }

    /// Number satisfying `predicate`.
    pub fn numeric_matching(
        name: impl Into<String>,
        predicate: impl Fn(&Number) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            name,
            RuleKind::Numeric {
                predicate: Some(Predicate::new(predicate)),
                bounds: None,
            },
        )
    }

    /// Integer greater than or equal to zero.
    pub fn non_negative_int(name: impl Into<String>) -> Self {
        Self::numeric_matching(name, |n| n.is_u64())
    }

    /// Number that must lie within `[min, max]`.
    pub fn bounded_float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::bounded(name, min, max, RangePolicy::Reject)
    }

    /// Number pulled into `[min, max]` on write.
    pub fn clamped_float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::bounded(name, min, max, RangePolicy::Clamp)
    }

    fn bounded(name: impl Into<String>, min: f64, max: f64, policy: RangePolicy) -> Self {
        Self::new(
            name,
            RuleKind::Numeric {
                predicate: None,
                bounds: Some(Bounds { min, max, policy }),
            },
        )
    }

    /// Boolean property.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, RuleKind::Boolean)
    }

    /// Serializes the property under `alias` instead of its name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Assignment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire alias, when it differs from the name.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Key the property is stored and serialized under.
    pub fn wire_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// The rule's kind.
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Whether assignments append to an existing sequence.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, RuleKind::ObjectArray(_) | RuleKind::StringArray(_))
    }

    /// Object type required of nested values, if any.
    pub fn object_type(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Object(t) | RuleKind::ObjectArray(t) => t.as_deref(),
            _ => None,
        }
    }

    /// Gives untyped mappings the object type this rule requires.
    pub fn adopt(&self, value: Value) -> Value {
        adopt_object_type(self.object_type(), value)
    }

    /// Normalizes a value. Values the rule cannot interpret are returned unchanged.
    pub fn transform(&self, value: Value) -> Value {
        if value.is_null() {
            return value;
        }
        match &self.kind {
            RuleKind::String(_) => Value::String(value.stringify()),
            RuleKind::DateTime => match value {
                Value::Timestamp(ts) => Value::String(to_iso8601(&ts)),
                Value::String(s) => match parse_timestamp(&s) {
                    Ok(ts) => Value::String(to_iso8601(&ts)),
                    Err(_) => Value::String(s),
                },
                other => other,
            },
            RuleKind::AbsoluteIri => match value {
                Value::String(s) => match Iri::parse_absolute(s.as_str()) {
                    Ok(iri) => Value::String(iri.into_string()),
                    Err(_) => Value::String(s),
                },
                other => other,
            },
            RuleKind::Iri => match value {
                Value::String(s) => match Iri::parse(s.as_str()) {
                    Ok(iri) => Value::String(iri.into_string()),
                    Err(_) => Value::String(s),
                },
                other => other,
            },
            RuleKind::Object(_) => value,
            RuleKind::ObjectArray(_) => match value {
                Value::Array(items) => Value::Array(items),
                single => Value::Array(vec![single]),
            },
            RuleKind::StringArray(_) => match value {
                Value::Array(items) => Value::Array(
                    items
                        .into_iter()
                        .map(|item| Value::String(item.stringify()))
                        .collect(),
                ),
                single => Value::Array(vec![Value::String(single.stringify())]),
            },
            RuleKind::Numeric { bounds, .. } => match (value, bounds) {
                (Value::Number(n), Some(b)) if b.policy == RangePolicy::Clamp => {
                    clamp(n, b)
                }
                (other, _) => other,
            },
            RuleKind::Boolean => match value {
                Value::String(s) if s.eq_ignore_ascii_case("true") => Value::Bool(true),
                Value::String(s) if s.eq_ignore_ascii_case("false") => Value::Bool(false),
                Value::Number(n) => Value::Bool(n.as_f64().is_some_and(|f| f != 0.0)),
                other => other,
            },
        }
    }

    /// Checks a transformed value.
    pub fn check(&self, value: &Value) -> Result<(), Violation> {
        if value.is_null() {
            return Ok(());
        }
        match &self.kind {
            RuleKind::String(predicate) => {
                let text = value.stringify();
                match predicate {
                    Some(p) if !p.test(&text) => {
                        Err(Violation::Rejected(format!("'{text}' is not accepted")))
                    }
                    _ => Ok(()),
                }
            }
            RuleKind::DateTime => match value {
                Value::Timestamp(_) => Ok(()),
                Value::String(s) => parse_timestamp(s)
                    .map(|_| ())
                    .map_err(|e| Violation::Rejected(e.to_string())),
                other => Err(wrong_type("timestamp", other)),
            },
            RuleKind::AbsoluteIri => match value {
                Value::String(s) if is_absolute_iri(s) => Ok(()),
                Value::String(s) => Err(Violation::Rejected(format!(
                    "'{s}' is not an absolute IRI"
                ))),
                other => Err(wrong_type("string", other)),
            },
            RuleKind::Iri => match value {
                Value::String(s) if is_iri(s) => Ok(()),
                Value::String(s) => Err(Violation::Rejected(format!("'{s}' is not an IRI"))),
                other => Err(wrong_type("string", other)),
            },
            RuleKind::Object(object_type) => check_object(object_type.as_deref(), value),
            RuleKind::ObjectArray(object_type) => match value {
                Value::Array(items) => items
                    .iter()
                    .try_for_each(|item| check_object(object_type.as_deref(), item)),
                other => Err(wrong_type("array", other)),
            },
            RuleKind::StringArray(predicate) => match value {
                Value::Array(items) => items.iter().try_for_each(|item| {
                    let text = item.stringify();
                    match predicate {
                        Some(p) if !p.test(&text) => {
                            Err(Violation::Rejected(format!("'{text}' is not accepted")))
                        }
                        _ => Ok(()),
                    }
                }),
                other => Err(wrong_type("array", other)),
            },
            RuleKind::Numeric { predicate, bounds } => {
                let Value::Number(n) = value else {
                    return Err(wrong_type("number", value));
                };
                if let Some(p) = predicate {
                    if !p.test(n) {
                        return Err(Violation::Rejected(format!("{n} is not accepted")));
                    }
                }
                match (bounds, n.as_f64()) {
                    (Some(b), Some(f)) if !b.contains(f) => Err(Violation::Rejected(format!(
                        "{n} is outside [{}, {}]",
                        b.min, b.max
                    ))),
                    _ => Ok(()),
                }
            }
            RuleKind::Boolean => match value {
                Value::Bool(_) => Ok(()),
                other => Err(wrong_type("boolean", other)),
            },
        }
    }
}

/// Shallow check that `value` is a mapping compatible with `object_type`.
///
/// When a type is required the mapping must record that same type.
pub fn check_object(object_type: Option<&str>, value: &Value) -> Result<(), Violation> {
    match value {
        Value::Object(object) => match (object_type, object.object_type()) {
            (Some(expected), Some(found)) if expected != found => Err(Violation::ObjectType {
                expected: expected.to_string(),
                found: found.to_string(),
            }),
            (Some(expected), None) => Err(Violation::Untyped {
                expected: expected.to_string(),
            }),
            _ => Ok(()),
        },
        other => Err(wrong_type("object", other)),
    }
}

/// Gives untyped mappings in `value` the type `object_type`, one level into
/// sequences. Mappings that record a type keep it.
///
/// JSON text does not carry recorded types, so values read back from text
/// go through this before they are checked.
pub fn adopt_object_type(object_type: Option<&str>, value: Value) -> Value {
    let Some(object_type) = object_type else {
        return value;
    };
    match value {
        Value::Object(object) => Value::Object(object.or_object_type(object_type)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(object) => Value::Object(object.or_object_type(object_type)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

fn wrong_type(expected: &'static str, value: &Value) -> Violation {
    Violation::WrongType {
        expected,
        found: value.kind(),
    }
}

fn clamp(n: Number, bounds: &Bounds) -> Value {
    match n.as_f64() {
        Some(f) if f < bounds.min => Value::from(bounds.min),
        Some(f) if f > bounds.max => Value::from(bounds.max),
        _ => Value::Number(n),
    }
}
