//! In-memory site.

use crate::error::{StorageError, StorageResult};
use crate::{EntityStore, SchemaProvider, UserDirectory, UserHandle};
use behat_model::{
    Draft, EntityHandle, EntityId, FieldDefinition, NODE, TAXONOMY_TERM, bundle_key, id_key,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Persisted portion of a site: stored entities and the id counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    #[serde(default)]
    pub next_ids: BTreeMap<String, u64>,
    #[serde(default)]
    pub entities: Vec<EntityHandle>,
}

#[derive(Debug, Default)]
struct SiteState {
    next_ids: BTreeMap<String, u64>,
    entities: BTreeMap<String, BTreeMap<EntityId, Draft>>,
}

/// A content site held entirely in memory.
///
/// The schema and user accounts are fixed when the site is built; entities
/// are created and deleted through [`EntityStore`]. Identifiers are assigned
/// per entity type starting at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemorySite {
    schema: BTreeMap<String, BTreeMap<String, FieldDefinition>>,
    users: BTreeMap<String, UserHandle>,
    state: RwLock<SiteState>,
}

impl MemorySite {
    /// A site with no entity types, fields or users.
    pub fn new() -> Self {
        Self::default()
    }

    /// A site with the base fields of nodes and taxonomy terms.
    pub fn with_defaults() -> Self {
        let mut site = Self::new();
        for (name, field_type) in [
            ("nid", "integer"),
            ("type", "entity_reference"),
            ("title", "string"),
            ("status", "boolean"),
            ("uid", "entity_reference"),
            ("created", "created"),
            ("changed", "changed"),
            ("promote", "boolean"),
            ("sticky", "boolean"),
        ] {
            site = site.with_base_field(NODE, name, field_type);
        }
        for (name, field_type) in [
            ("tid", "integer"),
            ("vid", "entity_reference"),
            ("name", "string"),
            ("description", "text_long"),
            ("weight", "integer"),
            ("parent", "entity_reference"),
        ] {
            site = site.with_base_field(TAXONOMY_TERM, name, field_type);
        }
        site
    }

    /// Adds a base (non-configurable) field.
    pub fn with_base_field(mut self, entity_type: &str, name: &str, field_type: &str) -> Self {
        self.schema
            .entry(entity_type.to_string())
            .or_default()
            .insert(name.to_string(), FieldDefinition::base(field_type));
        self
    }

    /// Adds a configured field.
    pub fn with_field(mut self, entity_type: &str, name: &str, field_type: &str) -> Self {
        self.schema
            .entry(entity_type.to_string())
            .or_default()
            .insert(name.to_string(), FieldDefinition::configurable(field_type));
        self
    }

    /// Adds a user account. Accounts are numbered in the order they are added.
    pub fn with_user(mut self, name: &str) -> Self {
        if !self.users.contains_key(name) {
            let id = EntityId::new(self.users.len() as u64 + 1);
            self.users.insert(
                name.to_string(),
                UserHandle {
                    id,
                    name: name.to_string(),
                },
            );
        }
        self
    }

    /// Number of stored entities of `entity_type`.
    pub fn entity_count(&self, entity_type: &str) -> StorageResult<usize> {
        Ok(self
            .read()?
            .entities
            .get(entity_type)
            .map_or(0, BTreeMap::len))
    }

    /// Copies the stored entities and counters out of the site.
    pub fn snapshot(&self) -> StorageResult<SiteSnapshot> {
        let state = self.read()?;
        let entities = state
            .entities
            .iter()
            .flat_map(|(entity_type, table)| {
                table.iter().map(move |(id, fields)| EntityHandle {
                    entity_type: entity_type.clone(),
                    id: *id,
                    fields: fields.clone(),
                })
            })
            .collect();
        Ok(SiteSnapshot {
            next_ids: state.next_ids.clone(),
            entities,
        })
    }

    /// Replaces the stored entities and counters with `snapshot`.
    ///
    /// Counters are raised to at least 1 and above every restored
    /// identifier. The site is left unchanged if the snapshot is rejected.
    pub fn restore(&self, snapshot: SiteSnapshot) -> StorageResult<()> {
        let mut next_ids: BTreeMap<String, u64> = snapshot
            .next_ids
            .into_iter()
            .map(|(entity_type, next)| (entity_type, next.max(1)))
            .collect();
        let mut entities: BTreeMap<String, BTreeMap<EntityId, Draft>> = BTreeMap::new();
        for entity in snapshot.entities {
            if entity.id.get() == 0 {
                return Err(StorageError::InvalidData(format!(
                    "{} has invalid id 0",
                    entity.entity_type
                )));
            }
            let after = entity.id.get().checked_add(1).ok_or_else(|| {
                StorageError::InvalidData(format!(
                    "{} id {} leaves no identifiers to assign",
                    entity.entity_type, entity.id
                ))
            })?;
            let next = next_ids.entry(entity.entity_type.clone()).or_insert(1);
            *next = (*next).max(after);
            entities
                .entry(entity.entity_type)
                .or_default()
                .insert(entity.id, entity.fields);
        }

        let mut state = self.write()?;
        state.next_ids = next_ids;
        state.entities = entities;
        Ok(())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, SiteState>> {
        self.state.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, SiteState>> {
        self.state.write().map_err(|_| StorageError::Poisoned)
    }

    fn check_entity_type(&self, entity_type: &str) -> StorageResult<()> {
        if self.schema.contains_key(entity_type) {
            Ok(())
        } else {
            Err(StorageError::UnknownEntityType(entity_type.to_string()))
        }
    }
}

impl EntityStore for MemorySite {
    fn create(&self, entity_type: &str, mut fields: Draft) -> StorageResult<EntityHandle> {
        self.check_entity_type(entity_type)?;
        if let Some(bundle) = bundle_key(entity_type) {
            if !fields.is_set(bundle) {
                return Err(StorageError::InvalidData(format!(
                    "{entity_type} requires a '{bundle}' value"
                )));
            }
        }

        let mut state = self.write()?;
        let next = state.next_ids.entry(entity_type.to_string()).or_insert(1);
        let id = EntityId::new((*next).max(1));
        *next = id.get().checked_add(1).ok_or_else(|| {
            StorageError::InvalidData(format!("{entity_type} identifiers exhausted"))
        })?;

        fields.insert(id_key(entity_type), id);
        state
            .entities
            .entry(entity_type.to_string())
            .or_default()
            .insert(id, fields.clone());

        debug!(entity_type, id = %id, "Stored entity");
        Ok(EntityHandle {
            entity_type: entity_type.to_string(),
            id,
            fields,
        })
    }

    fn load(&self, entity_type: &str, id: EntityId) -> StorageResult<Option<EntityHandle>> {
        let state = self.read()?;
        Ok(state
            .entities
            .get(entity_type)
            .and_then(|table| table.get(&id))
            .map(|fields| EntityHandle {
                entity_type: entity_type.to_string(),
                id,
                fields: fields.clone(),
            }))
    }

    fn delete(&self, entity: &EntityHandle) -> StorageResult<()> {
        let mut state = self.write()?;
        let removed = state
            .entities
            .get_mut(&entity.entity_type)
            .and_then(|table| table.remove(&entity.id))
            .is_some();
        debug!(entity_type = %entity.entity_type, id = %entity.id, removed, "Deleted entity");
        Ok(())
    }
}

impl UserDirectory for MemorySite {
    fn find_user_by_name(&self, name: &str) -> StorageResult<Option<UserHandle>> {
        Ok(self.users.get(name).cloned())
    }
}

impl SchemaProvider for MemorySite {
    fn field_storage_definitions(
        &self,
        entity_type: &str,
    ) -> StorageResult<BTreeMap<String, FieldDefinition>> {
        Ok(self.schema.get(entity_type).cloned().unwrap_or_default())
    }
}
