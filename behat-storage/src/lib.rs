//! Site services consumed by the Behat endpoint.
//!
//! The endpoint never talks to a content site directly. It goes through
//! three narrow traits:
//!
//! - [`EntityStore`]: create, load and delete entities
//! - [`UserDirectory`]: resolve a user account by name
//! - [`SchemaProvider`]: list the field storage definitions of an entity type
//!
//! [`MemorySite`] implements all three in memory. [`FileSite`] wraps it and
//! keeps entities in a JSON state file so separate processes share them.

mod error;
mod file;
mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileSite;
pub use memory::{MemorySite, SiteSnapshot};

use behat_model::{Draft, EntityHandle, EntityId, FieldDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity persistence.
pub trait EntityStore: Send + Sync {
    /// Persists a new entity and returns it with its assigned identifier.
    fn create(&self, entity_type: &str, fields: Draft) -> StorageResult<EntityHandle>;

    /// Loads an entity, or `None` if no entity has that identifier.
    fn load(&self, entity_type: &str, id: EntityId) -> StorageResult<Option<EntityHandle>>;

    /// Deletes an entity. Deleting an entity that is already gone succeeds.
    fn delete(&self, entity: &EntityHandle) -> StorageResult<()>;
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHandle {
    pub id: EntityId,
    pub name: String,
}

/// User account lookup.
pub trait UserDirectory: Send + Sync {
    fn find_user_by_name(&self, name: &str) -> StorageResult<Option<UserHandle>>;
}

/// Field schema lookup.
pub trait SchemaProvider: Send + Sync {
    /// All field storage definitions of `entity_type`, base and configurable.
    /// Unknown entity types have no fields.
    fn field_storage_definitions(
        &self,
        entity_type: &str,
    ) -> StorageResult<BTreeMap<String, FieldDefinition>>;
}
