//! Schemas: the rule set governing one object type.

use streams_canonical::Value;

use crate::rule::{adopt_object_type, check_object, Predicate, PropertyRule, Violation};

/// Fallback check for property names that have no rule.
#[derive(Debug, Clone, Default)]
pub enum MissingCheck {
    /// Any value is accepted.
    #[default]
    AcceptAll,
    /// Values must be nested objects (or sequences of them), optionally of one type.
    Objects(Option<String>),
    /// Values must satisfy a custom predicate.
    Custom(Predicate<Value>),
}

impl MissingCheck {
    /// Checks a value assigned to a name with no rule.
    pub fn check(&self, value: &Value) -> Result<(), Violation> {
        match self {
            MissingCheck::AcceptAll => Ok(()),
            MissingCheck::Objects(object_type) => match value {
                Value::Null => Ok(()),
                Value::Array(items) => items
                    .iter()
                    .try_for_each(|item| check_object(object_type.as_deref(), item)),
                other => check_object(object_type.as_deref(), other),
            },
            MissingCheck::Custom(predicate) if predicate.test(value) => Ok(()),
            MissingCheck::Custom(_) => Err(Violation::Rejected(format!(
                "{} value is not accepted",
                value.kind()
            ))),
        }
    }

    /// Gives untyped mappings the object type this check requires.
    pub fn adopt(&self, value: Value) -> Value {
        match self {
            MissingCheck::Objects(object_type) => adopt_object_type(object_type.as_deref(), value),
            _ => value,
        }
    }

    fn is_default(&self) -> bool {
        matches!(self, MissingCheck::AcceptAll)
    }
}

/// Ordered set of property rules for one object type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    type_tag: Option<String>,
    rules: Vec<PropertyRule>,
    missing_check: MissingCheck,
}

impl Schema {
    /// Creates an empty schema that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any rule with the same name in place.
    pub fn with_rule(mut self, rule: PropertyRule) -> Self {
        match self.rules.iter_mut().find(|r| r.name() == rule.name()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Replaces the fallback check for names without a rule.
    pub fn with_missing_check(mut self, missing_check: MissingCheck) -> Self {
        self.missing_check = missing_check;
        self
    }

    /// Records the object type this schema is registered for.
    pub fn with_type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Merges schemas left to right; later rules override earlier ones by name.
    ///
    /// The composed schema takes the last non-default missing check and the
    /// last recorded type tag.
    pub fn compose<'a>(schemas: impl IntoIterator<Item = &'a Schema>) -> Schema {
        schemas.into_iter().fold(Schema::new(), |mut acc, schema| {
            for rule in &schema.rules {
                acc = acc.with_rule(rule.clone());
            }
            if !schema.missing_check.is_default() {
                acc.missing_check = schema.missing_check.clone();
            }
            if schema.type_tag.is_some() {
                acc.type_tag = schema.type_tag.clone();
            }
            acc
        })
    }

    /// Object type this schema is registered for; `None` for the base schema.
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// Finds the rule for `name`, matching either the assignment name or the wire name.
    pub fn rule(&self, name: &str) -> Option<&PropertyRule> {
        self.rules
            .iter()
            .find(|r| r.name() == name)
            .or_else(|| self.rules.iter().find(|r| r.wire_name() == name))
    }

    /// Rules in definition order.
    pub fn rules(&self) -> impl Iterator<Item = &PropertyRule> {
        self.rules.iter()
    }

    /// Fallback check for names without a rule.
    pub fn missing_check(&self) -> &MissingCheck {
        &self.missing_check
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the schema defines no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
