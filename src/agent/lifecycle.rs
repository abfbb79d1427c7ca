//! Install and activate handlers

use super::OfflineAgent;
use crate::cache::CachedEntry;
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::{Request, RequestKey};
use futures_util::future::{join_all, try_join_all};
use serde::Serialize;
use tracing::{info, warn};

/// A remote manifest entry that could not be cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of a successful install
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub generation: String,
    /// Local manifest entries stored (all of them, or install fails)
    pub local_cached: Vec<String>,
    /// Remote manifest entries stored
    pub remote_cached: Vec<String>,
    /// Remote manifest entries skipped, with the reason
    pub remote_failed: Vec<RemoteFailure>,
}

/// Outcome of activation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivateReport {
    pub generation: String,
    /// Stale generations that were deleted
    pub deleted: Vec<String>,
}

impl OfflineAgent {
    /// Populate the current generation from the manifest.
    ///
    /// Local entries are all-or-nothing: one failed fetch or non-ok status
    /// aborts install and nothing from the local batch is stored. Remote
    /// entries are fetched independently and failures are only recorded.
    pub async fn handle_install(&self) -> OffcacheResult<InstallReport> {
        let generation = &self.config.generation;
        info!("Installing cache generation {}", generation);

        self.host.caches.open(generation).await?;

        info!("Caching app shell");
        let local: Vec<&str> = self.config.manifest.local().collect();
        let entries = try_join_all(local.iter().map(|url| self.fetch_local(url))).await?;
        self.host.caches.put_all(generation, entries).await?;

        let remote: Vec<&str> = self.config.manifest.remote().collect();
        let results = join_all(remote.iter().map(|url| self.cache_remote(url))).await;

        let mut report = InstallReport {
            generation: generation.clone(),
            local_cached: local.iter().map(|url| url.to_string()).collect(),
            ..Default::default()
        };
        for (url, result) in remote.into_iter().zip(results) {
            match result {
                Ok(()) => report.remote_cached.push(url.to_string()),
                Err(e) => {
                    warn!("Failed to cache {}: {}", url, e);
                    report.remote_failed.push(RemoteFailure {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.host.registration.skip_waiting().await?;

        info!(
            "Installed {}: {} local, {} remote, {} remote failed",
            generation,
            report.local_cached.len(),
            report.remote_cached.len(),
            report.remote_failed.len()
        );
        Ok(report)
    }

    /// Fetch one local manifest entry, requiring an ok response
    async fn fetch_local(&self, url: &str) -> OffcacheResult<CachedEntry> {
        let precache_failed = |reason: String| OffcacheError::PrecacheFailed {
            url: url.to_string(),
            reason,
        };

        let resolved = self.config.scope.resolve(url)?;
        let key = RequestKey::from_url(&resolved);
        let response = self
            .host
            .network
            .fetch(&Request::get(resolved.as_str()))
            .await
            .map_err(|e| precache_failed(e.to_string()))?;

        if !response.ok() {
            return Err(precache_failed(format!("HTTP {}", response.status())));
        }

        Ok(CachedEntry::new(key, response))
    }

    /// Fetch and store one remote manifest entry
    async fn cache_remote(&self, url: &str) -> OffcacheResult<()> {
        let resolved = self.config.scope.resolve(url)?;
        let key = RequestKey::from_url(&resolved);
        let response = self
            .host
            .network
            .fetch(&Request::get(resolved.as_str()))
            .await?;

        if !response.ok() {
            return Err(OffcacheError::network(
                resolved.as_str(),
                format!("HTTP {}", response.status()),
            ));
        }

        self.host
            .caches
            .put(&self.config.generation, CachedEntry::new(key, response))
            .await
    }

    /// Delete every generation except the current one, then claim clients
    pub async fn handle_activate(&self) -> OffcacheResult<ActivateReport> {
        let generation = &self.config.generation;
        info!("Activating cache generation {}", generation);

        let mut deleted = vec![];
        for name in self.host.caches.keys().await? {
            if &name != generation {
                info!("Deleting old cache: {}", name);
                self.host.caches.delete(&name).await?;
                deleted.push(name);
            }
        }

        self.host.clients.claim().await?;

        Ok(ActivateReport {
            generation: generation.clone(),
            deleted,
        })
    }
}
