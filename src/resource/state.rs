//! Resource state
//!
//! [`ResourceData`] is the per-instance handle the lifecycle operations read
//! from and write to: the identifier, the attribute map, and whether the
//! instance is being created in the current operation.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: Map<String, Value>,
    /// Only true during the read that follows a successful create
    #[serde(skip)]
    new_resource: bool,
}

impl ResourceData {
    /// State for a resource about to be created from `config`
    pub fn from_config(config: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            attributes: config,
            new_resource: false,
        }
    }

    /// State holding only an identifier, as produced by import
    pub fn from_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the identifier; an empty id marks the resource as gone
    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    /// True once the identifier has been cleared
    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    pub fn is_new_resource(&self) -> bool {
        self.new_resource
    }

    pub fn mark_new_resource(&mut self, new_resource: bool) {
        self.new_resource = new_resource;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Write one attribute, replacing any previous value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode attribute {}", key))?;
        self.attributes.insert(key.to_string(), value);
        Ok(())
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Decode the attribute map into a typed configuration
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.attributes.clone()))
            .context("Invalid resource configuration")
    }
}
