use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier assigned to an entity by the store (`nid`, `tid`, `uid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Reads an identifier from a JSON value, accepting numbers and numeric strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::from(id.0)
    }
}

/// Field-name to raw-value map for an entity that is about to be created.
///
/// Decoded from the test payload, rewritten in place by field expansion and
/// then handed to the entity store. Key order follows the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(Map<String, Value>);

impl Draft {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Converts a decoded payload into a draft. Returns `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.0.get(field).and_then(Value::as_u64)
    }

    /// Reads an entity identifier stored under `field`.
    pub fn get_id(&self, field: &str) -> Option<EntityId> {
        self.0.get(field).and_then(EntityId::from_value)
    }

    /// True when the field holds a non-null value.
    pub fn is_set(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Takes the value out of `field` leaving nothing behind, so it can be
    /// transformed by value and reinserted.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        self.0.get_mut(field).map(Value::take)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Draft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// An entity loaded from (or just written to) the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHandle {
    pub entity_type: String,
    pub id: EntityId,
    pub fields: Draft,
}

impl EntityHandle {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Extract a string value from the stored fields using a JSON pointer (e.g., "/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        let (field, rest) = split_pointer(pointer);
        let value = self.fields.get(field)?;
        if rest.is_empty() {
            value.as_str()
        } else {
            value.pointer(rest).and_then(Value::as_str)
        }
    }

    /// Extract any value from the stored fields using a JSON pointer.
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        let (field, rest) = split_pointer(pointer);
        let value = self.fields.get(field)?;
        if rest.is_empty() {
            Some(value)
        } else {
            value.pointer(rest)
        }
    }
}

fn split_pointer(pointer: &str) -> (&str, &str) {
    let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
    match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    }
}
