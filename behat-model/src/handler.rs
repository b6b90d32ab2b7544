use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Storage format for `datetime` field values.
const DATETIME_STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Identifies the field a handler is expanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldContext<'a> {
    pub entity_type: &'a str,
    pub field_name: &'a str,
}

impl<'a> FieldContext<'a> {
    pub fn new(entity_type: &'a str, field_name: &'a str) -> Self {
        Self {
            entity_type,
            field_name,
        }
    }
}

/// Normalizes a loosely-typed test value into the shape the entity API
/// expects for one field type.
///
/// Implementations must not fail: a value they do not understand is
/// wrapped or passed through rather than rejected.
pub trait FieldHandler: Send + Sync {
    fn expand(&self, ctx: &FieldContext<'_>, value: Value) -> Value;
}

/// Applies `f` to every item of a field value. Arrays are lists of items;
/// any other value is a single-item list.
fn expand_items(value: Value, f: impl Fn(Value) -> Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(f).collect()),
        other => Value::Array(vec![f(other)]),
    }
}

fn value_record(item: Value) -> Value {
    json!({ "value": item })
}

// ── Built-in handlers ────────────────────────────────────────────

/// Fallback for field types without a dedicated handler: the value is
/// handed to the entity API exactly as given.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHandler;

impl FieldHandler for DefaultHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        value
    }
}

/// Single-property fields (`text`, `string`, numbers, list options, ...):
/// each scalar becomes `{"value": item}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueHandler;

impl FieldHandler for ValueHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        expand_items(value, |item| match item {
            obj @ Value::Object(_) => obj,
            other => value_record(other),
        })
    }
}

/// `text_with_summary`: an item may be `[value, summary]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextWithSummaryHandler;

impl FieldHandler for TextWithSummaryHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        expand_items(value, |item| match item {
            obj @ Value::Object(_) => obj,
            Value::Array(parts) => {
                let mut parts = parts.into_iter();
                let mut record = Map::new();
                record.insert("value".into(), parts.next().unwrap_or(Value::Null));
                if let Some(summary) = parts.next() {
                    record.insert("summary".into(), summary);
                }
                Value::Object(record)
            }
            other => value_record(other),
        })
    }
}

/// `boolean`: common truthy/falsy spellings become real booleans.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanHandler;

impl BooleanHandler {
    fn parse(item: &Value) -> Option<bool> {
        match item {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FieldHandler for BooleanHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        expand_items(value, |item| match item {
            obj @ Value::Object(_) => obj,
            other => match Self::parse(&other) {
                Some(b) => value_record(Value::Bool(b)),
                None => value_record(other),
            },
        })
    }
}

/// `entity_reference` and `taxonomy_term_reference`: each item becomes
/// `{"target_id": id}`. Numeric strings are converted to integers.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityReferenceHandler;

impl FieldHandler for EntityReferenceHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        expand_items(value, |item| match item {
            obj @ Value::Object(_) => obj,
            Value::String(s) => match s.trim().parse::<u64>() {
                Ok(id) => json!({ "target_id": id }),
                Err(_) => json!({ "target_id": s }),
            },
            other => json!({ "target_id": other }),
        })
    }
}

/// `datetime`: recognised date strings are rewritten to the storage format.
#[derive(Debug, Default, Clone, Copy)]
pub struct DatetimeHandler;

impl DatetimeHandler {
    fn normalize(raw: &str) -> Option<String> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc().format(DATETIME_STORAGE_FORMAT).to_string());
        }
        for format in ["%Y-%m-%d %H:%M:%S", DATETIME_STORAGE_FORMAT] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt.format(DATETIME_STORAGE_FORMAT).to_string());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.format(DATETIME_STORAGE_FORMAT).to_string())
    }
}

impl FieldHandler for DatetimeHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        expand_items(value, |item| match item {
            obj @ Value::Object(_) => obj,
            Value::String(s) => match Self::normalize(&s) {
                Some(formatted) => value_record(Value::String(formatted)),
                None => value_record(Value::String(s)),
            },
            other => value_record(other),
        })
    }
}

/// `link`: an item is `[title, uri]` or a bare uri used as both.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkHandler;

impl FieldHandler for LinkHandler {
    fn expand(&self, _ctx: &FieldContext<'_>, value: Value) -> Value {
        expand_items(value, |item| match item {
            obj @ Value::Object(_) => obj,
            Value::Array(parts) => {
                let mut parts = parts.into_iter();
                let title = parts.next().unwrap_or(Value::Null);
                let uri = parts.next().unwrap_or_else(|| title.clone());
                json!({ "title": title, "uri": uri, "options": {} })
            }
            other => json!({ "title": other.clone(), "uri": other, "options": {} }),
        })
    }
}

// ── Registry ─────────────────────────────────────────────────────

/// Maps field type names to handlers.
///
/// Resolution never fails: types without an entry get the default handler.
/// Handlers beyond the built-in set are added with [`register`](Self::register).
#[derive(Clone)]
pub struct FieldHandlerRegistry {
    handlers: HashMap<String, Arc<dyn FieldHandler>>,
    default: Arc<dyn FieldHandler>,
}

impl FieldHandlerRegistry {
    /// An empty table that resolves every type to `default`.
    pub fn new(default: Arc<dyn FieldHandler>) -> Self {
        Self {
            handlers: HashMap::new(),
            default,
        }
    }

    /// The built-in handler set with [`DefaultHandler`] as fallback.
    pub fn builtin() -> Self {
        let mut registry = Self::new(Arc::new(DefaultHandler));

        let value: Arc<dyn FieldHandler> = Arc::new(ValueHandler);
        for type_name in [
            "text",
            "text_long",
            "string",
            "string_long",
            "list_string",
            "list_integer",
            "list_float",
            "integer",
            "decimal",
            "float",
            "email",
            "telephone",
        ] {
            registry.register_shared(type_name, Arc::clone(&value));
        }

        let reference: Arc<dyn FieldHandler> = Arc::new(EntityReferenceHandler);
        registry.register_shared("entity_reference", Arc::clone(&reference));
        registry.register_shared("taxonomy_term_reference", reference);

        registry.register("text_with_summary", TextWithSummaryHandler);
        registry.register("boolean", BooleanHandler);
        registry.register("datetime", DatetimeHandler);
        registry.register("link", LinkHandler);
        registry
    }

    /// Registers `handler` for `type_name`, replacing any existing entry.
    pub fn register(&mut self, type_name: &str, handler: impl FieldHandler + 'static) {
        self.register_shared(type_name, Arc::new(handler));
    }

    pub fn register_shared(&mut self, type_name: &str, handler: Arc<dyn FieldHandler>) {
        self.handlers.insert(type_name.to_string(), handler);
    }

    /// Returns the handler for `type_name`, or the default handler.
    pub fn resolve(&self, type_name: &str) -> Arc<dyn FieldHandler> {
        self.handlers
            .get(type_name)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.default))
    }

    /// True when `type_name` has a dedicated (non-default) handler.
    pub fn has_handler(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Type names with a dedicated handler, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FieldHandlerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for FieldHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandlerRegistry")
            .field("types", &self.type_names())
            .finish_non_exhaustive()
    }
}
