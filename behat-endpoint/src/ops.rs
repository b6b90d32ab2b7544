//! Operation handlers.

use crate::dispatch::Endpoint;
use crate::error::{EndpointError, EndpointResult};
use behat_model::{Draft, EntityHandle, NODE, TAXONOMY_TERM, id_key};
use serde_json::Value;
use tracing::{debug, info};

/// The entity a delete operation targets.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRef {
    /// An entity that is already loaded.
    Loaded(EntityHandle),
    /// A payload object carrying the identifier field (`nid`, `tid`).
    Fields(Draft),
}

impl From<EntityHandle> for EntityRef {
    fn from(entity: EntityHandle) -> Self {
        EntityRef::Loaded(entity)
    }
}

impl From<Draft> for EntityRef {
    fn from(fields: Draft) -> Self {
        EntityRef::Fields(fields)
    }
}

impl TryFrom<Value> for EntityRef {
    type Error = EndpointError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Draft::from_value(value)
            .map(EntityRef::Fields)
            .ok_or_else(|| EndpointError::InvalidPayload("expected a JSON object".to_string()))
    }
}

fn object_payload(operation: &str, payload: Value) -> EndpointResult<Draft> {
    Draft::from_value(payload).ok_or_else(|| {
        EndpointError::InvalidPayload(format!("{operation} expects a JSON object"))
    })
}

impl Endpoint {
    /// Creates a content item.
    ///
    /// `status` defaults to published. An `author` name is replaced by the
    /// matching user's `uid`; an unknown author leaves `uid` unset. Returns
    /// the expanded fields with the new `nid`.
    pub fn create_node(&self, payload: Value) -> EndpointResult<Value> {
        let mut node = object_payload("create-node", payload)?;

        if !node.is_set("status") {
            node.insert("status", true);
        }

        if let Some(author) = node.remove("author") {
            match author.as_str() {
                Some(name) => match self.users.find_user_by_name(name)? {
                    Some(user) => {
                        node.insert("uid", user.id);
                    }
                    None => debug!(author = name, "Author not found, leaving uid unset"),
                },
                None if author.is_null() => {}
                None => debug!(author = %author, "Author is not a user name, leaving uid unset"),
            }
        }

        self.expand_fields(NODE, &mut node)?;

        let entity = self.entities.create(NODE, node.clone())?;
        node.insert(id_key(NODE), entity.id());
        info!(nid = %entity.id(), title = node.get_str("title").unwrap_or_default(), "Node created");
        Ok(node.into_value())
    }

    /// Deletes a content item. A node that does not exist is not an error.
    pub fn delete_node(&self, target: EntityRef) -> EndpointResult<()> {
        self.delete_entity(NODE, target)
    }

    /// Creates a taxonomy term in the vocabulary named by
    /// `vocabulary_machine_name`. Returns the expanded fields with the new `tid`.
    pub fn create_taxonomy_term(&self, payload: Value) -> EndpointResult<Value> {
        let mut term = object_payload("create-taxonomy-term", payload)?;

        if let Some(vocabulary) = term.get("vocabulary_machine_name").cloned() {
            term.insert("vid", vocabulary);
        }

        self.expand_fields(TAXONOMY_TERM, &mut term)?;

        let entity = self.entities.create(TAXONOMY_TERM, term.clone())?;
        term.insert(id_key(TAXONOMY_TERM), entity.id());
        info!(
            tid = %entity.id(),
            vid = term.get_str("vid").unwrap_or_default(),
            "Taxonomy term created"
        );
        Ok(term.into_value())
    }

    /// Deletes a taxonomy term. A term that does not exist is not an error.
    pub fn delete_taxonomy_term(&self, target: EntityRef) -> EndpointResult<()> {
        self.delete_entity(TAXONOMY_TERM, target)
    }

    /// `is-field` payload: `[entity_type, field_name]`.
    pub(crate) fn is_field_op(&self, payload: Value) -> EndpointResult<bool> {
        let invalid =
            || EndpointError::InvalidPayload("is-field expects [entity_type, field_name]".into());
        let Value::Array(items) = payload else {
            return Err(invalid());
        };
        match items.as_slice() {
            [Value::String(entity_type), Value::String(field_name)] => {
                Ok(self.is_field(entity_type, field_name)?)
            }
            _ => Err(invalid()),
        }
    }

    fn delete_entity(&self, entity_type: &str, target: EntityRef) -> EndpointResult<()> {
        let entity = match target {
            EntityRef::Loaded(entity) if entity.entity_type == entity_type => Some(entity),
            EntityRef::Loaded(entity) => {
                return Err(EndpointError::InvalidPayload(format!(
                    "expected a {entity_type} entity, got {}",
                    entity.entity_type
                )));
            }
            EntityRef::Fields(fields) => match fields.get_id(id_key(entity_type)) {
                Some(id) => self.entities.load(entity_type, id)?,
                None => None,
            },
        };

        match entity {
            Some(entity) => {
                self.entities.delete(&entity)?;
                info!(entity_type, id = %entity.id(), "Entity deleted");
            }
            None => debug!(entity_type, "Nothing to delete"),
        }
        Ok(())
    }
}
