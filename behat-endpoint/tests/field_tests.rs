use behat_endpoint::fields::{expand_fields, field_types, is_field};
use behat_endpoint::Endpoint;
use behat_model::{Draft, FieldContext, FieldDefinition, FieldHandler, FieldHandlerRegistry};
use behat_storage::{MemorySite, SchemaProvider, StorageResult};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Schema provider that counts how often it is asked.
struct CountingSchema {
    fields: BTreeMap<String, FieldDefinition>,
    calls: AtomicUsize,
}

impl CountingSchema {
    fn new(fields: &[(&str, FieldDefinition)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, def)| (name.to_string(), def.clone()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl SchemaProvider for CountingSchema {
    fn field_storage_definitions(
        &self,
        entity_type: &str,
    ) -> StorageResult<BTreeMap<String, FieldDefinition>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if entity_type == "node" {
            Ok(self.fields.clone())
        } else {
            Ok(BTreeMap::new())
        }
    }
}

fn draft(value: Value) -> Draft {
    Draft::from_value(value).unwrap()
}

// ── Registry lookup ──────────────────────────────────────────────

#[test]
fn field_types_keeps_only_configurable_fields() {
    let schema = CountingSchema::new(&[
        ("title", FieldDefinition::base("string")),
        ("field_tags", FieldDefinition::configurable("entity_reference")),
        ("body", FieldDefinition::configurable("text_with_summary")),
    ]);
    let types = field_types(&schema, "node").unwrap();
    let expected: BTreeMap<String, String> = [
        ("body".to_string(), "text_with_summary".to_string()),
        ("field_tags".to_string(), "entity_reference".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(types, expected);
}

#[test]
fn is_field_checks_presence_and_configurability() {
    let schema = CountingSchema::new(&[
        ("title", FieldDefinition::base("string")),
        ("field_tags", FieldDefinition::configurable("entity_reference")),
    ]);
    assert!(is_field(&schema, "node", "field_tags").unwrap());
    assert!(!is_field(&schema, "node", "title").unwrap());
    assert!(!is_field(&schema, "node", "field_nope").unwrap());
    assert!(!is_field(&schema, "taxonomy_term", "field_tags").unwrap());
}

#[test]
fn lookups_are_not_cached() {
    let schema = CountingSchema::new(&[("field_tags", FieldDefinition::configurable("text"))]);
    field_types(&schema, "node").unwrap();
    field_types(&schema, "node").unwrap();
    is_field(&schema, "node", "field_tags").unwrap();
    assert_eq!(schema.calls.load(Ordering::SeqCst), 3);
}

// ── Expansion ────────────────────────────────────────────────────

#[test]
fn reference_field_expanded_and_absent_field_untouched() {
    let schema = CountingSchema::new(&[
        ("tags", FieldDefinition::configurable("entity_reference")),
        ("field_summary", FieldDefinition::configurable("text")),
    ]);
    let handlers = FieldHandlerRegistry::builtin();
    let mut entity = draft(json!({"tags": "3"}));

    expand_fields(&schema, &handlers, "node", &mut entity).unwrap();

    let expected = handlers
        .resolve("entity_reference")
        .expand(&FieldContext::new("node", "tags"), json!("3"));
    assert_eq!(entity.get("tags"), Some(&expected));
    assert_eq!(entity.get("field_summary"), None);
    assert_eq!(entity.len(), 1);
}

#[test]
fn base_and_unknown_properties_pass_through() {
    let schema = CountingSchema::new(&[
        ("title", FieldDefinition::base("string")),
        ("field_text", FieldDefinition::configurable("text")),
    ]);
    let mut entity = draft(json!({"title": "Plain", "extra": "x", "field_text": "y"}));
    expand_fields(&schema, &FieldHandlerRegistry::builtin(), "node", &mut entity).unwrap();
    assert_eq!(
        entity.into_value(),
        json!({"title": "Plain", "extra": "x", "field_text": [{"value": "y"}]})
    );
}

#[test]
fn null_values_are_skipped() {
    let schema = CountingSchema::new(&[("field_text", FieldDefinition::configurable("text"))]);
    let mut entity = draft(json!({"field_text": null}));
    expand_fields(&schema, &FieldHandlerRegistry::builtin(), "node", &mut entity).unwrap();
    assert_eq!(entity.get("field_text"), Some(&json!(null)));
}

#[test]
fn unhandled_type_uses_default() {
    let schema = CountingSchema::new(&[("field_geo", FieldDefinition::configurable("geofield"))]);
    let mut entity = draft(json!({"field_geo": "POINT(1 2)"}));
    expand_fields(&schema, &FieldHandlerRegistry::builtin(), "node", &mut entity).unwrap();
    assert_eq!(entity.get_str("field_geo"), Some("POINT(1 2)"));
}

struct TaggingHandler;
impl FieldHandler for TaggingHandler {
    fn expand(&self, ctx: &FieldContext<'_>, value: Value) -> Value {
        json!({ "entity_type": ctx.entity_type, "field": ctx.field_name, "raw": value })
    }
}

#[test]
fn endpoint_uses_registered_handlers() {
    let site = Arc::new(MemorySite::with_defaults().with_field("node", "field_rating", "fivestar"));
    let mut endpoint = Endpoint::for_site(site);
    endpoint.handlers_mut().register("fivestar", TaggingHandler);

    let node = endpoint
        .execute("create-node", r#"{"title":"t","type":"page","field_rating":4}"#)
        .unwrap()
        .unwrap();
    assert_eq!(
        node["field_rating"],
        json!({"entity_type": "node", "field": "field_rating", "raw": 4})
    );
}

#[test]
fn endpoint_with_custom_default() {
    let site = Arc::new(MemorySite::with_defaults().with_field("node", "field_x", "text"));
    let endpoint = Endpoint::for_site(site)
        .with_handlers(FieldHandlerRegistry::new(Arc::new(TaggingHandler)));
    assert!(endpoint.handlers().type_names().is_empty());

    let mut entity = draft(json!({"field_x": "a"}));
    endpoint.expand_fields("node", &mut entity).unwrap();
    assert_eq!(entity.get("field_x").unwrap()["raw"], json!("a"));
    assert_eq!(endpoint.field_types("node").unwrap().len(), 1);
    assert!(endpoint.is_field("node", "field_x").unwrap());
}
