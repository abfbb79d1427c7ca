//! On-disk cache storage
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/<sanitized-name>-<hash>/generation.json
//! <root>/<sanitized-name>-<hash>/entries/<sha256(key)>.json
//! <root>/<sanitized-name>-<hash>/entries/<sha256(key)>.body
//! ```
//!
//! Metadata and body are written to uniquely named temporary files and
//! renamed into place, so a reader never observes a half-written entry.
//! Commits are serialized per storage so concurrent writers of one key
//! never interleave a body with another writer's metadata.

use super::CacheStorage;
use crate::cache::{CachedEntry, ResponseSnapshot};
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::{Headers, RequestKey, ResponseType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

const GENERATION_FILE: &str = "generation.json";
const ENTRIES_DIR: &str = "entries";

/// Generation marker persisted in each generation directory
#[derive(Debug, Serialize, Deserialize)]
struct GenerationMeta {
    name: String,
    created_at: DateTime<Utc>,
}

/// Entry metadata; the body lives next to it in a `.body` file
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    key: RequestKey,
    url: String,
    status: u16,
    response_type: ResponseType,
    headers: Headers,
    stored_at: DateTime<Utc>,
}

/// Cache storage persisted under a directory
#[derive(Debug, Clone)]
pub struct DiskCacheStorage {
    root: PathBuf,
    commit_lock: Arc<Mutex<()>>,
}

impl DiskCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Directory holding a generation
    fn generation_dir(&self, generation: &str) -> PathBuf {
        let sanitized: String = generation
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let digest = hex::encode(Sha256::digest(generation.as_bytes()));
        self.root.join(format!("{}-{}", sanitized, &digest[..12]))
    }

    fn entry_stem(key: &RequestKey) -> String {
        hex::encode(Sha256::digest(key.as_str().as_bytes()))
    }

    /// Entries directory of an existing generation
    async fn existing_entries_dir(&self, generation: &str) -> OffcacheResult<PathBuf> {
        let dir = self.generation_dir(generation);
        if !fs::try_exists(dir.join(GENERATION_FILE))
            .await
            .map_err(|e| OffcacheError::io(format!("checking {}", dir.display()), e))?
        {
            return Err(OffcacheError::GenerationNotFound(generation.to_string()));
        }
        Ok(dir.join(ENTRIES_DIR))
    }

    /// Write both files of an entry under temporary names.
    ///
    /// Returns the (temporary, final) path pairs to rename.
    async fn stage(
        &self,
        entries_dir: &Path,
        entry: CachedEntry,
    ) -> OffcacheResult<Vec<(PathBuf, PathBuf)>> {
        let stem = Self::entry_stem(&entry.key);
        let ResponseSnapshot {
            url,
            status,
            response_type,
            headers,
            body,
        } = entry.response;
        let meta = EntryMeta {
            key: entry.key,
            url,
            status,
            response_type,
            headers,
            stored_at: entry.stored_at,
        };

        let body_path = entries_dir.join(format!("{}.body", stem));
        let meta_path = entries_dir.join(format!("{}.json", stem));
        let suffix = Uuid::new_v4().simple();
        let body_tmp = entries_dir.join(format!("{}.body.{}.tmp", stem, suffix));
        let meta_tmp = entries_dir.join(format!("{}.json.{}.tmp", stem, suffix));

        let staged = async {
            fs::write(&body_tmp, body)
                .await
                .map_err(|e| OffcacheError::io(format!("writing {}", body_tmp.display()), e))?;
            fs::write(&meta_tmp, serde_json::to_vec_pretty(&meta)?)
                .await
                .map_err(|e| OffcacheError::io(format!("writing {}", meta_tmp.display()), e))
        };
        if let Err(e) = staged.await {
            let _ = fs::remove_file(&body_tmp).await;
            let _ = fs::remove_file(&meta_tmp).await;
            return Err(e);
        }

        // Body before metadata: an entry is visible once its .json exists
        Ok(vec![(body_tmp, body_path), (meta_tmp, meta_path)])
    }

    /// Rename staged files into place.
    ///
    /// Renames come in (body, metadata) pairs. If one fails, every entry this
    /// commit touched is removed and the remaining temporaries are discarded.
    async fn commit(renames: Vec<(PathBuf, PathBuf)>) -> OffcacheResult<()> {
        for (index, (from, to)) in renames.iter().enumerate() {
            if let Err(e) = fs::rename(from, to).await {
                let touched = (index / 2 + 1) * 2;
                warn!("Rolling back cache write of {} entries", touched / 2);
                for (_, placed) in renames.iter().take(touched) {
                    let _ = fs::remove_file(placed).await;
                }
                Self::discard(&renames[index..]).await;
                return Err(OffcacheError::io(
                    format!("moving {} into place", to.display()),
                    e,
                ));
            }
        }
        Ok(())
    }

    async fn discard(renames: &[(PathBuf, PathBuf)]) {
        for (tmp, _) in renames {
            let _ = fs::remove_file(tmp).await;
        }
    }

    async fn read_generation_meta(dir: &Path) -> Option<GenerationMeta> {
        let content = fs::read_to_string(dir.join(GENERATION_FILE)).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!("Ignoring corrupt generation in {}: {}", dir.display(), e);
                None
            }
        }
    }

    async fn find_generation_dir(&self, generation: &str) -> OffcacheResult<Option<PathBuf>> {
        let dir = self.generation_dir(generation);
        let exists = fs::try_exists(&dir)
            .await
            .map_err(|e| OffcacheError::io(format!("checking {}", dir.display()), e))?;
        Ok(exists.then_some(dir))
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, generation: &str) -> OffcacheResult<()> {
        let dir = self.generation_dir(generation);
        let marker = dir.join(GENERATION_FILE);

        fs::create_dir_all(dir.join(ENTRIES_DIR))
            .await
            .map_err(|e| OffcacheError::io(format!("creating {}", dir.display()), e))?;

        if !fs::try_exists(&marker)
            .await
            .map_err(|e| OffcacheError::io(format!("checking {}", marker.display()), e))?
        {
            let meta = GenerationMeta {
                name: generation.to_string(),
                created_at: Utc::now(),
            };
            fs::write(&marker, serde_json::to_vec_pretty(&meta)?)
                .await
                .map_err(|e| OffcacheError::io(format!("writing {}", marker.display()), e))?;
            debug!("Created cache generation {} at {}", generation, dir.display());
        }

        Ok(())
    }

    async fn keys(&self) -> OffcacheResult<Vec<String>> {
        if !fs::try_exists(&self.root)
            .await
            .map_err(|e| OffcacheError::io(format!("checking {}", self.root.display()), e))?
        {
            return Ok(vec![]);
        }

        let mut names = vec![];
        let mut dirs = fs::read_dir(&self.root)
            .await
            .map_err(|e| OffcacheError::io("reading cache storage directory", e))?;

        while let Some(dir) = dirs
            .next_entry()
            .await
            .map_err(|e| OffcacheError::io("reading cache storage entry", e))?
        {
            if let Some(meta) = Self::read_generation_meta(&dir.path()).await {
                names.push(meta.name);
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, generation: &str) -> OffcacheResult<bool> {
        let Some(dir) = self.find_generation_dir(generation).await? else {
            return Ok(false);
        };

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| OffcacheError::io(format!("deleting {}", dir.display()), e))?;
        Ok(true)
    }

    async fn lookup(
        &self,
        generation: &str,
        key: &RequestKey,
    ) -> OffcacheResult<Option<CachedEntry>> {
        let entries_dir = self.generation_dir(generation).join(ENTRIES_DIR);
        let stem = Self::entry_stem(key);
        let meta_path = entries_dir.join(format!("{}.json", stem));

        // Metadata and body must come from the same commit
        let _guard = self.commit_lock.lock().await;
        let content = match fs::read(&meta_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(OffcacheError::io(
                    format!("reading {}", meta_path.display()),
                    e,
                ))
            }
        };

        let meta: EntryMeta =
            serde_json::from_slice(&content).map_err(|e| OffcacheError::CacheCorrupt {
                path: meta_path.clone(),
                reason: e.to_string(),
            })?;

        let body_path = entries_dir.join(format!("{}.body", stem));
        let body = fs::read(&body_path)
            .await
            .map_err(|e| OffcacheError::io(format!("reading {}", body_path.display()), e))?;

        Ok(Some(CachedEntry {
            key: meta.key,
            response: ResponseSnapshot {
                url: meta.url,
                status: meta.status,
                response_type: meta.response_type,
                headers: meta.headers,
                body,
            },
            stored_at: meta.stored_at,
        }))
    }

    async fn put(&self, generation: &str, entry: CachedEntry) -> OffcacheResult<()> {
        let entries_dir = self.existing_entries_dir(generation).await?;
        let renames = self.stage(&entries_dir, entry).await?;
        let _guard = self.commit_lock.lock().await;
        Self::commit(renames).await
    }

    async fn put_all(&self, generation: &str, batch: Vec<CachedEntry>) -> OffcacheResult<()> {
        let entries_dir = self.existing_entries_dir(generation).await?;

        // Same key twice: the later entry wins, as in a sequence of puts
        let mut order: Vec<RequestKey> = vec![];
        let mut latest: HashMap<RequestKey, CachedEntry> = HashMap::new();
        for entry in batch {
            let key = entry.key.clone();
            if latest.insert(key.clone(), entry).is_none() {
                order.push(key);
            }
        }

        let mut renames = vec![];
        for key in order {
            let Some(entry) = latest.remove(&key) else {
                continue;
            };
            match self.stage(&entries_dir, entry).await {
                Ok(staged) => renames.extend(staged),
                Err(e) => {
                    Self::discard(&renames).await;
                    return Err(e);
                }
            }
        }

        let _guard = self.commit_lock.lock().await;
        Self::commit(renames).await
    }

    async fn entries(&self, generation: &str) -> OffcacheResult<Vec<RequestKey>> {
        let entries_dir = self.existing_entries_dir(generation).await?;

        let mut keys = vec![];
        let mut files = fs::read_dir(&entries_dir)
            .await
            .map_err(|e| OffcacheError::io(format!("reading {}", entries_dir.display()), e))?;

        while let Some(file) = files
            .next_entry()
            .await
            .map_err(|e| OffcacheError::io("reading cache entry", e))?
        {
            let path = file.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read(&path).await.ok();
                let meta = content.and_then(|c| serde_json::from_slice::<EntryMeta>(&c).ok());
                if let Some(meta) = meta {
                    keys.push(meta.key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
