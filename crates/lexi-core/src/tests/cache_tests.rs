use std::sync::Arc;
use std::sync::atomic::Ordering;

use lexi_types::{CacheEntry, RequestParams};

use super::support::{FlakyStore, definition};
use crate::cache::DefinitionCache;
use crate::key::derive_key;
use crate::store::{KeyValueStore, keys};

fn params() -> RequestParams {
    RequestParams::new("Ephemeral", 25).with_tone("formal")
}

fn entry() -> CacheEntry {
    CacheEntry::fetched(definition("ephemeral"), 25)
}

#[tokio::test]
async fn test_store_then_lookup_returns_entry_as_hit() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;

    cache.store(&params(), entry()).await.unwrap();
    let found = cache.lookup(&params()).await.expect("entry should be cached");

    assert_eq!(found.definition, entry().definition);
    assert_eq!(found.requested_length, 25);
    assert!(found.cache_hit);
    assert!(found.saved_at > 0);

    // The stored copy itself is not marked as a hit
    let raw = store
        .inner
        .get(&derive_key(&params()).storage_key())
        .await
        .unwrap()
        .unwrap();
    let stored: CacheEntry = serde_json::from_str(&raw).unwrap();
    assert!(!stored.cache_hit);
}

#[tokio::test]
async fn test_lookup_of_unindexed_key_skips_the_store() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;
    let gets_after_load = store.gets.load(Ordering::SeqCst);

    assert!(cache.lookup(&params()).await.is_none());
    assert_eq!(store.gets.load(Ordering::SeqCst), gets_after_load);
}

#[tokio::test]
async fn test_stray_index_key_is_removed_on_lookup() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;
    cache.store(&params(), entry()).await.unwrap();

    // Entry vanishes behind the cache's back
    store
        .inner
        .remove(&derive_key(&params()).storage_key())
        .await
        .unwrap();

    assert!(cache.lookup(&params()).await.is_none());
    assert!(!cache.contains(&params()).await);
    assert_eq!(cache.stats().await.entries, 0);

    // Repair is persisted
    let reloaded = DefinitionCache::load(store.clone()).await;
    assert!(!reloaded.contains(&params()).await);
}

#[tokio::test]
async fn test_read_failure_heals_like_a_missing_entry() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;
    cache.store(&params(), entry()).await.unwrap();

    store.fail_get.store(true, Ordering::SeqCst);
    assert!(cache.lookup(&params()).await.is_none());
    assert!(!cache.contains(&params()).await);
}

#[tokio::test]
async fn test_undecodable_entry_is_treated_as_missing() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;
    cache.store(&params(), entry()).await.unwrap();

    store
        .inner
        .set(&derive_key(&params()).storage_key(), "not json".to_string())
        .await
        .unwrap();

    assert!(cache.lookup(&params()).await.is_none());
    assert!(!cache.contains(&params()).await);
}

#[tokio::test]
async fn test_failed_write_leaves_index_untouched() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;

    store.fail_set.store(true, Ordering::SeqCst);
    assert!(cache.store(&params(), entry()).await.is_err());

    store.fail_set.store(false, Ordering::SeqCst);
    assert!(!cache.contains(&params()).await);
    assert!(cache.lookup(&params()).await.is_none());
    assert_eq!(cache.stats().await.entries, 0);
}

#[tokio::test]
async fn test_clear_removes_entries_and_empties_index() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;
    cache.store(&params(), entry()).await.unwrap();
    cache
        .store(&RequestParams::new("serene", 10), CacheEntry::fetched(definition("serene"), 10))
        .await
        .unwrap();

    let report = cache.clear().await;

    assert_eq!(report.targeted, 2);
    assert!(report.error.is_none());
    assert_eq!(cache.stats().await.entries, 0);
    assert!(!store.inner.contains(&derive_key(&params()).storage_key()));
}

#[tokio::test]
async fn test_clear_empties_index_even_when_removal_fails() {
    let store = FlakyStore::new();
    let cache = DefinitionCache::load(store.clone()).await;
    cache.store(&params(), entry()).await.unwrap();

    store.fail_remove.store(true, Ordering::SeqCst);
    let report = cache.clear().await;

    assert_eq!(report.targeted, 1);
    assert!(report.error.is_some());
    assert_eq!(cache.stats().await.entries, 0);
    assert!(cache.lookup(&params()).await.is_none());

    let reloaded = DefinitionCache::load(store.clone()).await;
    assert_eq!(reloaded.stats().await.entries, 0);
}

#[tokio::test]
async fn test_index_survives_reload() {
    let store = FlakyStore::new();
    {
        let cache = DefinitionCache::load(store.clone()).await;
        cache.store(&params(), entry()).await.unwrap();
    }

    let cache = DefinitionCache::load(store.clone()).await;
    let stats = cache.stats().await;
    assert_eq!(stats.entries, 1);
    assert!(stats.last_write.is_some());
    assert!(cache.lookup(&params()).await.is_some());
}

#[tokio::test]
async fn test_corrupt_index_snapshot_loads_empty() {
    let store = FlakyStore::new();
    store
        .inner
        .set(keys::CACHE_INDEX, "[1, 2".to_string())
        .await
        .unwrap();

    let cache = DefinitionCache::load(store as Arc<dyn KeyValueStore>).await;
    assert_eq!(cache.stats().await.entries, 0);
}
