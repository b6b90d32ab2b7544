//! JSON-file-backed site.

use crate::error::StorageResult;
use crate::memory::{MemorySite, SiteSnapshot};
use crate::{EntityStore, SchemaProvider, UserDirectory, UserHandle};
use behat_model::{Draft, EntityHandle, EntityId, FieldDefinition};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A [`MemorySite`] whose entities are saved to a JSON state file after
/// every write, so separate endpoint invocations see the same content.
///
/// A write that cannot be saved is rolled back in memory as well, so the
/// site never holds content the state file does not.
#[derive(Debug)]
pub struct FileSite {
    site: MemorySite,
    path: PathBuf,
}

impl FileSite {
    /// Opens `path` on top of `site`, loading any previously saved entities.
    /// A missing file means an empty site.
    pub fn open(site: MemorySite, path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if path.exists() {
            let bytes = std::fs::read(&path)?;
            let snapshot: SiteSnapshot = serde_json::from_slice(&bytes)?;
            info!(
                path = %path.display(),
                entities = snapshot.entities.len(),
                "Loaded site state"
            );
            site.restore(snapshot)?;
        } else {
            debug!(path = %path.display(), "No site state file, starting empty");
        }
        Ok(Self { site, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn site(&self) -> &MemorySite {
        &self.site
    }

    /// Applies `change` to the in-memory site and saves it, restoring the
    /// previous contents if saving fails.
    fn commit<T>(&self, change: impl FnOnce(&MemorySite) -> StorageResult<T>) -> StorageResult<T> {
        let before = self.site.snapshot()?;
        let result = change(&self.site)?;
        if let Err(e) = self.persist() {
            warn!(path = %self.path.display(), error = %e, "Failed to save site state, rolling back");
            self.site.restore(before)?;
            return Err(e);
        }
        Ok(result)
    }

    fn persist(&self) -> StorageResult<()> {
        let snapshot = self.site.snapshot()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Saved site state");
        Ok(())
    }
}

impl EntityStore for FileSite {
    fn create(&self, entity_type: &str, fields: Draft) -> StorageResult<EntityHandle> {
        self.commit(|site| site.create(entity_type, fields))
    }

    fn load(&self, entity_type: &str, id: EntityId) -> StorageResult<Option<EntityHandle>> {
        self.site.load(entity_type, id)
    }

    fn delete(&self, entity: &EntityHandle) -> StorageResult<()> {
        self.commit(|site| site.delete(entity))
    }
}

impl UserDirectory for FileSite {
    fn find_user_by_name(&self, name: &str) -> StorageResult<Option<UserHandle>> {
        self.site.find_user_by_name(name)
    }
}

impl SchemaProvider for FileSite {
    fn field_storage_definitions(
        &self,
        entity_type: &str,
    ) -> StorageResult<BTreeMap<String, FieldDefinition>> {
        self.site.field_storage_definitions(entity_type)
    }
}
