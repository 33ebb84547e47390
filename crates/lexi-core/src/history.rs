use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use lexi_types::{HistoryItem, HistorySort};
use tokio::sync::Mutex;

use crate::clock::now_millis;
use crate::key::{NormalizedParams, normalize};
use crate::store::{ClearReport, KeyValueStore, keys, load_snapshot, persist_snapshot};

/// Normalized (word, length, tone, context, lang) of a history item
pub fn identity(item: &HistoryItem) -> NormalizedParams {
    normalize(&item.to_request())
}

/// Newest-first, bounded log of past requests. Holds at most one item per
/// identity tuple.
pub struct HistoryLedger {
    store: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<HistoryItem>>,
    max_items: usize,
}

impl HistoryLedger {
    pub async fn load(store: Arc<dyn KeyValueStore>, max_items: usize) -> Self {
        let mut items: Vec<HistoryItem> = load_snapshot(store.as_ref(), keys::HISTORY).await;
        dedupe(&mut items);
        items.truncate(max_items);
        tracing::info!("History loaded: {} items", items.len());

        Self {
            store,
            items: Mutex::new(items),
            max_items,
        }
    }

    /// Prepend `item` with a fresh timestamp, replacing any item with the
    /// same identity tuple. Returns the stored item.
    pub async fn record(&self, item: HistoryItem) -> HistoryItem {
        let mut items = self.items.lock().await;
        let item = insert(&mut items, item, now_millis(), self.max_items);
        self.persist(&items).await;
        item
    }

    /// Snapshot in stored (newest-first) order
    pub async fn items(&self) -> Vec<HistoryItem> {
        self.items.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Sorted copy for presentation; the stored order is left alone.
    pub async fn sorted(&self, sort: HistorySort) -> Vec<HistoryItem> {
        let mut view = self.items().await;
        sort_view(&mut view, sort);
        view
    }

    /// Empty the ledger. Callers reach this only after the user confirmed
    /// the destructive action.
    pub async fn clear_confirmed(&self) -> ClearReport {
        let mut items = self.items.lock().await;
        let targeted = items.len();
        items.clear();

        let error = persist_snapshot(self.store.as_ref(), keys::HISTORY, &*items)
            .await
            .err();
        if let Some(e) = &error {
            tracing::warn!("Failed to persist cleared history: {}", e);
        }

        tracing::info!("History cleared: {} items", targeted);
        ClearReport { targeted, error }
    }

    async fn persist(&self, items: &[HistoryItem]) {
        if let Err(e) = persist_snapshot(self.store.as_ref(), keys::HISTORY, items).await {
            tracing::warn!("Failed to persist history: {}", e);
        }
    }
}

/// Keep the first (newest) item of each identity tuple
fn dedupe(items: &mut Vec<HistoryItem>) {
    let mut seen = HashSet::new();
    let before = items.len();
    items.retain(|item| seen.insert(identity(item)));
    if items.len() != before {
        tracing::warn!("Dropped {} duplicate history items", before - items.len());
    }
}

fn insert(items: &mut Vec<HistoryItem>, mut item: HistoryItem, now: i64, max_items: usize) -> HistoryItem {
    // Strictly newer than everything already recorded, even within one millisecond
    let newest = items.iter().map(|i| i.timestamp).max();
    item.timestamp = match newest {
        Some(newest) if newest >= now => newest + 1,
        _ => now,
    };

    let id = identity(&item);
    items.retain(|existing| identity(existing) != id);
    items.insert(0, item.clone());
    items.truncate(max_items);
    item
}

pub fn sort_view(view: &mut [HistoryItem], sort: HistorySort) {
    match sort {
        HistorySort::TimeDesc => view.sort_by_key(|i| Reverse(i.timestamp)),
        HistorySort::TimeAsc => view.sort_by_key(|i| i.timestamp),
        HistorySort::WordAsc => view.sort_by_cached_key(|i| i.word.to_lowercase()),
        HistorySort::WordDesc => view.sort_by_cached_key(|i| Reverse(i.word.to_lowercase())),
    }
}
