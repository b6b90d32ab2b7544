use serde::{Deserialize, Serialize};

/// Storage definition of one field on an entity type.
///
/// Base fields are defined by the entity type itself (`title`, `status`,
/// `vid`, ...). Configurable fields are attached by site configuration and
/// are the only ones whose values go through field expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub configurable: bool,
}

impl FieldDefinition {
    /// A base (non-configurable) field of the given type.
    pub fn base(field_type: &str) -> Self {
        Self {
            field_type: field_type.into(),
            configurable: false,
        }
    }

    /// A configured field of the given type.
    pub fn configurable(field_type: &str) -> Self {
        Self {
            field_type: field_type.into(),
            configurable: true,
        }
    }

    pub fn is_configurable(&self) -> bool {
        self.configurable
    }

    pub fn field_type(&self) -> &str {
        &self.field_type
    }
}
