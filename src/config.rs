//! Configuration Management
//!
//! Handles persistent provider settings for tf-codedeploy.

use crate::aws::client::ClientSettings;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProviderConfig {
    /// AWS region
    #[serde(default)]
    pub region: Option<String>,
    /// Shared credentials/config profile
    #[serde(default)]
    pub profile: Option<String>,
    /// Endpoint override (e.g. a local emulator)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tf-codedeploy").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Overlay values given on the command line (CLI > config file)
    pub fn merge(&self, overrides: &ProviderConfig) -> Self {
        Self {
            region: overrides.region.clone().or_else(|| self.region.clone()),
            profile: overrides.profile.clone().or_else(|| self.profile.clone()),
            endpoint: overrides.endpoint.clone().or_else(|| self.endpoint.clone()),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Client settings; anything still unset is resolved from the environment
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint: self.endpoint.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
