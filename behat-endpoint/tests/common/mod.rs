//! Shared test helpers for endpoint tests.

#![allow(dead_code)]

use behat_endpoint::Endpoint;
use behat_storage::MemorySite;
use std::sync::Arc;

/// A site with a tagged article setup and two users.
pub fn test_site() -> Arc<MemorySite> {
    Arc::new(
        MemorySite::with_defaults()
            .with_field("node", "body", "text_with_summary")
            .with_field("node", "field_tags", "entity_reference")
            .with_field("node", "field_subtitle", "text")
            .with_field("node", "field_rating", "fivestar")
            .with_field("taxonomy_term", "field_color", "string")
            .with_user("admin")
            .with_user("editor"),
    )
}

pub fn endpoint(site: &Arc<MemorySite>) -> Endpoint {
    Endpoint::for_site(Arc::clone(site))
}

pub fn total_entities(site: &MemorySite) -> usize {
    site.entity_count("node").unwrap() + site.entity_count("taxonomy_term").unwrap()
}
