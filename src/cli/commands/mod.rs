//! CLI command implementations
//!
//! Each command plays the host: it builds the agent over the configured
//! storage, delivers one event and renders the outcome.

pub mod activate;
pub mod clear;
pub mod click;
pub mod completions;
pub mod config;
pub mod fetch;
pub mod install;
pub mod list;
pub mod message;
pub mod push;
pub mod sync;

pub use activate::execute as activate;
pub use clear::execute as clear;
pub use click::execute as click;
pub use completions::execute as completions;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use install::execute as install;
pub use list::execute as list;
pub use message::execute as message;
pub use push::execute as push;
pub use sync::execute as sync;

use crate::agent::{EventOutcome, OfflineAgent};
use crate::audit::AuditLog;
use crate::config::{Config, ConfigManager, StorageKind};
use crate::error::{OffcacheError, OffcacheResult};
use crate::host::{CacheStorage, DiskCacheStorage, Host, HttpNetwork, MemoryCacheStorage, Network};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// The agent wired to configured storage, the HTTP network and console clients
pub(crate) struct Simulator {
    pub agent: OfflineAgent,
    pub audit: AuditLog,
}

impl Simulator {
    pub fn new(config: &Config, state_dir: &Path) -> OffcacheResult<Self> {
        Self::with_network(config, state_dir, |network| network)
    }

    /// Build with the network wrapped by `wrap` (e.g. for progress reporting)
    pub fn with_network<F>(config: &Config, state_dir: &Path, wrap: F) -> OffcacheResult<Self>
    where
        F: FnOnce(Arc<dyn Network>) -> Arc<dyn Network>,
    {
        let agent_config = config.agent_config()?;
        let caches = cache_storage(config, state_dir);
        let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(
            agent_config.scope.clone(),
            config.network.user_agent.clone(),
        ));
        let app_url = agent_config.scope.base().to_string();
        let host = Host::console(caches, wrap(network), &app_url);

        Ok(Self {
            agent: OfflineAgent::new(agent_config, host),
            audit: AuditLog::new(config, state_dir),
        })
    }
}

/// Storage backend selected by `cache.storage`
pub(crate) fn cache_storage(config: &Config, state_dir: &Path) -> Arc<dyn CacheStorage> {
    match config.cache.storage {
        StorageKind::Disk => {
            let root = config
                .cache
                .storage_dir
                .clone()
                .unwrap_or_else(|| ConfigManager::caches_dir(state_dir));
            debug!("Using disk cache storage at {}", root.display());
            Arc::new(DiskCacheStorage::new(root))
        }
        StorageKind::Memory => {
            debug!("Using in-memory cache storage");
            Arc::new(MemoryCacheStorage::new())
        }
    }
}

/// Error for an event answered with the wrong outcome kind
pub(crate) fn unexpected(outcome: EventOutcome) -> OffcacheError {
    OffcacheError::Internal(format!("unexpected event outcome: {:?}", outcome))
}
