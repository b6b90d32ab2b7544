//! Operation table and the `execute` entry point.

use crate::error::{EndpointError, EndpointResult};
use crate::fields;
use behat_model::{Draft, FieldHandlerRegistry};
use behat_storage::{EntityStore, SchemaProvider, StorageResult, UserDirectory};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An operation the endpoint can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateNode,
    DeleteNode,
    CreateTaxonomyTerm,
    DeleteTaxonomyTerm,
    IsField,
}

impl Operation {
    /// Every supported operation.
    pub const ALL: [Operation; 5] = [
        Operation::CreateNode,
        Operation::DeleteNode,
        Operation::CreateTaxonomyTerm,
        Operation::DeleteTaxonomyTerm,
        Operation::IsField,
    ];

    /// Name as sent by the test runner, e.g. `create-node`.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::CreateNode => "create-node",
            Operation::DeleteNode => "delete-node",
            Operation::CreateTaxonomyTerm => "create-taxonomy-term",
            Operation::DeleteTaxonomyTerm => "delete-taxonomy-term",
            Operation::IsField => "is-field",
        }
    }

    /// Name of the handler the operation is registered under, e.g. `op_create_node`.
    pub const fn handler_name(self) -> &'static str {
        match self {
            Operation::CreateNode => "op_create_node",
            Operation::DeleteNode => "op_delete_node",
            Operation::CreateTaxonomyTerm => "op_create_taxonomy_term",
            Operation::DeleteTaxonomyTerm => "op_delete_taxonomy_term",
            Operation::IsField => "op_is_field",
        }
    }

    /// Resolves an operation name. Dashes and underscores are interchangeable;
    /// the match is otherwise exact.
    pub fn from_name(operation: &str) -> Option<Self> {
        let handler = format!("op_{}", operation.replace('-', "_"));
        Self::ALL
            .into_iter()
            .find(|op| op.handler_name() == handler)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry point for remote calls from the test runner.
///
/// Holds the site services and the field handler table. Calls are
/// independent of each other; the endpoint keeps no per-call state.
pub struct Endpoint {
    pub(crate) entities: Arc<dyn EntityStore>,
    pub(crate) users: Arc<dyn UserDirectory>,
    pub(crate) schema: Arc<dyn SchemaProvider>,
    pub(crate) handlers: FieldHandlerRegistry,
}

impl Endpoint {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        users: Arc<dyn UserDirectory>,
        schema: Arc<dyn SchemaProvider>,
    ) -> Self {
        Self {
            entities,
            users,
            schema,
            handlers: FieldHandlerRegistry::builtin(),
        }
    }

    /// Builds an endpoint over one value that provides all three site services.
    pub fn for_site<S>(site: Arc<S>) -> Self
    where
        S: EntityStore + UserDirectory + SchemaProvider + 'static,
    {
        Self::new(site.clone(), site.clone(), site)
    }

    /// Replaces the field handler table.
    pub fn with_handlers(mut self, handlers: FieldHandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn handlers(&self) -> &FieldHandlerRegistry {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut FieldHandlerRegistry {
        &mut self.handlers
    }

    /// Runs `operation` with a JSON `payload`.
    ///
    /// The payload is decoded before the operation is resolved, so a
    /// payload that is not JSON fails with `MalformedPayload` whatever the
    /// operation. Create operations return the created object, `is-field`
    /// returns a boolean and deletes return `None`.
    pub fn execute(&self, operation: &str, payload: &str) -> EndpointResult<Option<Value>> {
        let payload: Value =
            serde_json::from_str(payload).map_err(EndpointError::MalformedPayload)?;
        let op = Operation::from_name(operation)
            .ok_or_else(|| EndpointError::UnknownOperation(operation.to_string()))?;
        debug!(operation = op.name(), handler = op.handler_name(), "Dispatching operation");
        self.invoke(op, payload)
    }

    /// Runs an already-resolved operation with a decoded payload.
    pub fn invoke(&self, op: Operation, payload: Value) -> EndpointResult<Option<Value>> {
        match op {
            Operation::CreateNode => self.create_node(payload).map(Some),
            Operation::DeleteNode => self.delete_node(payload.try_into()?).map(|()| None),
            Operation::CreateTaxonomyTerm => self.create_taxonomy_term(payload).map(Some),
            Operation::DeleteTaxonomyTerm => {
                self.delete_taxonomy_term(payload.try_into()?).map(|()| None)
            }
            Operation::IsField => self.is_field_op(payload).map(|b| Some(Value::Bool(b))),
        }
    }

    /// Configurable fields of `entity_type` and their type names.
    pub fn field_types(&self, entity_type: &str) -> StorageResult<BTreeMap<String, String>> {
        fields::field_types(self.schema.as_ref(), entity_type)
    }

    pub fn is_field(&self, entity_type: &str, field_name: &str) -> StorageResult<bool> {
        fields::is_field(self.schema.as_ref(), entity_type, field_name)
    }

    /// Expands the configurable fields present in `draft` in place.
    pub fn expand_fields(&self, entity_type: &str, draft: &mut Draft) -> StorageResult<()> {
        fields::expand_fields(self.schema.as_ref(), &self.handlers, entity_type, draft)
    }
}
