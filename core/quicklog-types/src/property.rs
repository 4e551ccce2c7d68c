//! Schema-less provider property bags.
//!
//! Each provider type expects its own subset of keys. Nested structures
//! (an SMTP block, field mappings) travel as pre-serialized JSON strings
//! because the wire format has no tagged union for them.

use crate::level::LevelSet;
use crate::schema::{FieldKind, ProviderKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Number(Number),
    Text(String),
    /// Nested JSON carried as a string inside the outer document.
    Json(String),
    Levels(LevelSet),
    /// Any other JSON value (null, array, inline object).
    Raw(Value),
}

impl PropertyValue {
    /// Wraps a nested structure, serializing it to a string.
    pub fn json<T: Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Self::Json(serde_json::to_string(value)?))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// String content of `Text` and `Json` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Json(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_levels(&self) -> Option<&LevelSet> {
        match self {
            Self::Levels(set) => Some(set),
            _ => None,
        }
    }

    /// Parses a `Json` value back into a structured value.
    pub fn parse_json(&self) -> Option<crate::Result<Value>> {
        match self {
            Self::Json(s) => Some(serde_json::from_str(s).map_err(Into::into)),
            _ => None,
        }
    }

    /// The wire representation of this value.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) | Self::Json(s) => Value::String(s.clone()),
            Self::Levels(set) => Value::String(set.encode()),
            Self::Raw(v) => v.clone(),
        }
    }

    /// Reads a wire value with no schema knowledge.
    #[must_use]
    pub fn from_wire(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            other => Self::Raw(other),
        }
    }

    /// Types a value the way a load reads it back under a key of `field`
    /// kind. Undocumented keys (`None`) hold only plain wire values.
    pub(crate) fn conform(self, field: Option<FieldKind>) -> Self {
        match (field, self) {
            (Some(FieldKind::Levels), Self::Text(s)) if LevelSet::looks_encoded(&s) => {
                Self::Levels(LevelSet::decode(&s))
            }
            (Some(FieldKind::Levels), Self::Levels(set)) => Self::Levels(set),
            (Some(FieldKind::Json), Self::Text(s) | Self::Json(s)) => Self::Json(s),
            (_, Self::Json(s)) => Self::Text(s),
            (_, Self::Levels(set)) => Self::Text(set.encode()),
            (_, other) => other,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<LevelSet> for PropertyValue {
    fn from(value: LevelSet) -> Self {
        Self::Levels(value)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_wire)
    }
}

/// String-keyed map of heterogeneous provider settings.
///
/// Keys are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(HashMap<String, PropertyValue>);

impl PropertyBag {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The level set stored under `LogLevel`, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<&LevelSet> {
        self.get("LogLevel").and_then(PropertyValue::as_levels)
    }

    /// Retypes every value against `kind`: documented level-set and nested
    /// JSON keys are upgraded from plain strings, everything else is held as
    /// the plain wire value a load would produce.
    pub fn apply_schema(&mut self, kind: &ProviderKind) {
        for (key, value) in self.0.iter_mut() {
            let current = std::mem::replace(value, PropertyValue::Bool(false));
            *value = current.conform(kind.field_kind(key));
        }
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
