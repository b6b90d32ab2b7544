//! Site configuration, read from `behat-site.toml`.

use anyhow::{Context, Result};
use behat_storage::MemorySite;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "behat-site.toml";
pub const DEFAULT_STATE_FILE: &str = "behat-state.json";

/// Schema and accounts of the site the endpoint runs against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Where entities are kept between runs. Relative paths are resolved
    /// against the directory of the config file.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// A field attached to an entity type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub entity_type: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default = "default_configurable")]
    pub configurable: bool,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

fn default_configurable() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            users: Vec::new(),
            fields: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Loads the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No site config found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse site config {}", path.display()))?;
        info!("Loaded site config from {:?}", path);
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// State file location for a config read from `config_path`.
    pub fn state_path(&self, config_path: &Path) -> PathBuf {
        if self.state_file.is_absolute() {
            return self.state_file.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.state_file),
            None => self.state_file.clone(),
        }
    }

    /// Builds the in-memory site: base fields, configured fields, then users.
    pub fn build_site(&self) -> MemorySite {
        let site = self.fields.iter().fold(MemorySite::with_defaults(), |site, field| {
            if field.configurable {
                site.with_field(&field.entity_type, &field.name, &field.field_type)
            } else {
                site.with_base_field(&field.entity_type, &field.name, &field.field_type)
            }
        });
        self.users.iter().fold(site, |site, name| site.with_user(name))
    }
}
