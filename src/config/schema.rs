//! Configuration schema for offcache
//!
//! Configuration is stored at `~/.config/offcache/config.toml`

use crate::agent::{
    AgentConfig, NotificationDefaults, DEFAULT_GENERATION, DEFAULT_SHELL_DOCUMENT,
    DEFAULT_SYNC_TAG,
};
use crate::cache::{Manifest, DEFAULT_MANIFEST};
use crate::error::OffcacheResult;
use crate::fetch::Scope;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache generation settings
    pub cache: CacheConfig,

    /// Pre-cache manifest
    pub manifest: ManifestConfig,

    /// Background sync settings
    pub sync: SyncConfig,

    /// Push notification presentation
    pub notification: NotificationDefaults,

    /// Network client settings
    pub network: NetworkConfig,
}

impl Config {
    /// Build the agent configuration, validating the scope
    pub fn agent_config(&self) -> OffcacheResult<AgentConfig> {
        let scope = Scope::parse(&self.cache.scope)?;
        let manifest = Manifest::classify(&self.manifest.entries, &scope);

        Ok(AgentConfig {
            generation: self.cache.generation.clone(),
            scope,
            manifest,
            shell_document: self.cache.shell_document.clone(),
            excluded_schemes: self.cache.excluded_schemes.clone(),
            sync_tag: self.sync.tag.clone(),
            notifications: self.notification.clone(),
        })
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Where cache generations are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Persisted under the state directory
    #[default]
    Disk,
    /// Discarded when the process exits
    Memory,
}

/// Cache generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Current generation id
    pub generation: String,

    /// Application scope; relative URLs resolve against it
    pub scope: String,

    /// Document served for navigations while offline
    pub shell_document: String,

    /// URL schemes never intercepted
    pub excluded_schemes: Vec<String>,

    /// Storage backend
    pub storage: StorageKind,

    /// Override for the disk storage directory
    pub storage_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            generation: DEFAULT_GENERATION.to_string(),
            scope: "http://localhost:8080/".to_string(),
            shell_document: DEFAULT_SHELL_DOCUMENT.to_string(),
            excluded_schemes: vec!["chrome-extension".to_string()],
            storage: StorageKind::Disk,
            storage_dir: None,
        }
    }
}

/// Pre-cache manifest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Ordered entries: relative paths are local, foreign URLs remote
    pub entries: Vec<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            entries: DEFAULT_MANIFEST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Background sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tag that triggers data reconciliation
    pub tag: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_SYNC_TAG.to_string(),
        }
    }
}

/// Network client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("offcache/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
