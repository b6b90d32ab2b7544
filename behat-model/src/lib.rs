//! Core model for the Behat endpoint.
//!
//! Defines the types shared by the dispatcher, the site services and the
//! field handlers:
//! - [`Draft`]: the loosely-typed field map decoded from a test payload
//! - [`EntityId`] / [`EntityHandle`]: identifiers and loaded entities
//! - [`FieldDefinition`]: a field storage definition as reported by the schema
//! - [`FieldHandler`]: the raw-to-structured value expansion for a field type
//! - [`FieldHandlerRegistry`]: type name to handler table with a default fallback

mod entity;
mod handler;
mod schema;

pub use entity::{Draft, EntityHandle, EntityId};
pub use handler::{
    BooleanHandler, DatetimeHandler, DefaultHandler, EntityReferenceHandler, FieldContext,
    FieldHandler, FieldHandlerRegistry, LinkHandler, TextWithSummaryHandler, ValueHandler,
};
pub use schema::FieldDefinition;

/// Entity type machine name for content items.
pub const NODE: &str = "node";

/// Entity type machine name for taxonomy terms.
pub const TAXONOMY_TERM: &str = "taxonomy_term";

/// Field that carries the store-assigned identifier for `entity_type`.
pub fn id_key(entity_type: &str) -> &'static str {
    match entity_type {
        NODE => "nid",
        TAXONOMY_TERM => "tid",
        "user" => "uid",
        _ => "id",
    }
}

/// Field that names the bundle (content type, vocabulary) of `entity_type`,
/// if the entity type has bundles.
pub fn bundle_key(entity_type: &str) -> Option<&'static str> {
    match entity_type {
        NODE => Some("type"),
        TAXONOMY_TERM => Some("vid"),
        _ => None,
    }
}
