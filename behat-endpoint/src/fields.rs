//! Field type lookup and field value expansion.
//!
//! Only configurable fields take part: base fields such as `title` or
//! `status` are written to the store as given. Lookups go to the schema
//! provider on every call.

use behat_model::{Draft, FieldContext, FieldHandlerRegistry};
use behat_storage::{SchemaProvider, StorageResult};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Configurable fields of `entity_type`, mapped to their field type names.
pub fn field_types(
    schema: &dyn SchemaProvider,
    entity_type: &str,
) -> StorageResult<BTreeMap<String, String>> {
    Ok(schema
        .field_storage_definitions(entity_type)?
        .into_iter()
        .filter(|(_, definition)| definition.is_configurable())
        .map(|(name, definition)| (name, definition.field_type))
        .collect())
}

/// True when `field_name` is a configurable field of `entity_type`.
pub fn is_field(
    schema: &dyn SchemaProvider,
    entity_type: &str,
    field_name: &str,
) -> StorageResult<bool> {
    Ok(schema
        .field_storage_definitions(entity_type)?
        .get(field_name)
        .is_some_and(|definition| definition.is_configurable()))
}

/// Rewrites every configurable field present in `draft` through the handler
/// for its field type. Fields missing from the draft, or null, are skipped.
pub fn expand_fields(
    schema: &dyn SchemaProvider,
    handlers: &FieldHandlerRegistry,
    entity_type: &str,
    draft: &mut Draft,
) -> StorageResult<()> {
    for (field_name, field_type) in field_types(schema, entity_type)? {
        if !draft.is_set(&field_name) {
            continue;
        }
        let raw = draft.take(&field_name).unwrap_or(Value::Null);
        let handler = handlers.resolve(&field_type);
        let expanded = handler.expand(&FieldContext::new(entity_type, &field_name), raw);
        debug!(entity_type, field = %field_name, field_type = %field_type, "Expanded field");
        draft.insert(field_name, expanded);
    }
    Ok(())
}
