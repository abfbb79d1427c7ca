//! In-memory cache storage

use super::CacheStorage;
use crate::cache::CachedEntry;
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::RequestKey;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

type Generation = BTreeMap<RequestKey, CachedEntry>;

/// Cache storage held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    generations: RwLock<HashMap<String, Generation>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, generation: &str) -> OffcacheResult<()> {
        self.generations
            .write()
            .await
            .entry(generation.to_string())
            .or_default();
        Ok(())
    }

    async fn keys(&self) -> OffcacheResult<Vec<String>> {
        let mut names: Vec<String> = self.generations.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, generation: &str) -> OffcacheResult<bool> {
        Ok(self.generations.write().await.remove(generation).is_some())
    }

    async fn lookup(
        &self,
        generation: &str,
        key: &RequestKey,
    ) -> OffcacheResult<Option<CachedEntry>> {
        Ok(self
            .generations
            .read()
            .await
            .get(generation)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(&self, generation: &str, entry: CachedEntry) -> OffcacheResult<()> {
        let mut generations = self.generations.write().await;
        let entries = generations
            .get_mut(generation)
            .ok_or_else(|| OffcacheError::GenerationNotFound(generation.to_string()))?;
        entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn put_all(&self, generation: &str, batch: Vec<CachedEntry>) -> OffcacheResult<()> {
        let mut generations = self.generations.write().await;
        let entries = generations
            .get_mut(generation)
            .ok_or_else(|| OffcacheError::GenerationNotFound(generation.to_string()))?;
        for entry in batch {
            entries.insert(entry.key.clone(), entry);
        }
        Ok(())
    }

    async fn entries(&self, generation: &str) -> OffcacheResult<Vec<RequestKey>> {
        self.generations
            .read()
            .await
            .get(generation)
            .map(|entries| entries.keys().cloned().collect())
            .ok_or_else(|| OffcacheError::GenerationNotFound(generation.to_string()))
    }
}
