//! Local definition cache.
//!
//! The index (cache key -> last write time) lives in memory and is mirrored
//! to the store under [`keys::CACHE_INDEX`]. Entries live under
//! [`CacheKey::storage_key`]. The index may list keys whose entry is gone;
//! every read path that notices this drops the key on the spot. It never
//! lacks a key whose entry was written by this process.

use std::collections::BTreeMap;
use std::sync::Arc;

use lexi_types::{CacheEntry, RequestParams};
use tokio::sync::Mutex;

use crate::clock::now_millis;
use crate::key::{CacheKey, derive_key};
use crate::store::{ClearReport, KeyValueStore, StoreError, keys, load_snapshot, persist_snapshot};

type Index = BTreeMap<String, i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub last_write: Option<i64>,
}

pub struct DefinitionCache {
    store: Arc<dyn KeyValueStore>,
    index: Mutex<Index>,
}

impl DefinitionCache {
    /// Load the persisted index
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let index: Index = load_snapshot(store.as_ref(), keys::CACHE_INDEX).await;
        tracing::info!("Cache index loaded: {} entries", index.len());

        Self {
            store,
            index: Mutex::new(index),
        }
    }

    /// Cached entry for `params`, marked as a cache hit.
    ///
    /// Keys missing from the index short-circuit without store I/O. An
    /// indexed key whose entry cannot be read is removed from the index.
    pub async fn lookup(&self, params: &RequestParams) -> Option<CacheEntry> {
        let key = derive_key(params);

        let observed = self.index.lock().await.get(key.as_str()).copied()?;

        match self.store.get(&key.storage_key()).await {
            Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(mut entry) => {
                    entry.cache_hit = true;
                    tracing::debug!("Cache hit for {}", key);
                    return Some(entry);
                }
                Err(e) => tracing::warn!("Cache entry {} is unreadable: {}", key, e),
            },
            Ok(None) => tracing::warn!("Cache index lists {} but the store has no entry", key),
            Err(e) => tracing::warn!("Cache read for {} failed: {}", key, e),
        }

        self.forget(&key, observed).await;
        None
    }

    /// Write `entry` for `params` and record it in the index.
    ///
    /// The index is only touched once the entry write succeeded.
    pub async fn store(&self, params: &RequestParams, entry: CacheEntry) -> Result<(), StoreError> {
        let key = derive_key(params);
        let now = now_millis();
        let entry = CacheEntry {
            saved_at: now,
            cache_hit: false,
            ..entry
        };

        let raw = serde_json::to_string(&entry)?;
        self.store.set(&key.storage_key(), raw).await?;

        let mut index = self.index.lock().await;
        index.insert(key.as_str().to_string(), now);
        if let Err(e) = persist_snapshot(self.store.as_ref(), keys::CACHE_INDEX, &*index).await {
            // The entry is stored; a stale persisted index only costs a miss next run
            tracing::warn!("Failed to persist cache index: {}", e);
        }

        tracing::debug!("Cached {}", key);
        Ok(())
    }

    /// Remove every indexed entry and empty the index.
    ///
    /// The index is reset even when the bulk removal fails.
    pub async fn clear(&self) -> ClearReport {
        let mut index = self.index.lock().await;
        let storage_keys: Vec<String> = index
            .keys()
            .map(|k| CacheKey::from(k.clone()).storage_key())
            .collect();
        let targeted = storage_keys.len();

        let removal = if storage_keys.is_empty() {
            Ok(())
        } else {
            self.store.remove_many(&storage_keys).await
        };
        if let Err(e) = &removal {
            tracing::warn!("Bulk removal of {} cache entries failed: {}", targeted, e);
        }

        index.clear();
        let persisted = persist_snapshot(self.store.as_ref(), keys::CACHE_INDEX, &*index).await;
        if let Err(e) = &persisted {
            tracing::warn!("Failed to persist empty cache index: {}", e);
        }

        tracing::info!("Cache cleared: {} entries targeted", targeted);
        ClearReport {
            targeted,
            error: removal.err().or(persisted.err()),
        }
    }

    pub async fn contains(&self, params: &RequestParams) -> bool {
        let key = derive_key(params);
        self.index.lock().await.contains_key(key.as_str())
    }

    pub async fn stats(&self) -> CacheStats {
        let index = self.index.lock().await;
        CacheStats {
            entries: index.len(),
            last_write: index.values().copied().max(),
        }
    }

    /// Drop `key` from the index if it still carries the write time seen by
    /// the failed read. A newer write in the meantime keeps its entry.
    async fn forget(&self, key: &CacheKey, observed: i64) {
        let mut index = self.index.lock().await;
        if index.get(key.as_str()) != Some(&observed) {
            return;
        }

        index.remove(key.as_str());
        tracing::info!("Removed stale cache key {}", key);
        if let Err(e) = persist_snapshot(self.store.as_ref(), keys::CACHE_INDEX, &*index).await {
            tracing::warn!("Failed to persist repaired cache index: {}", e);
        }
    }
}
