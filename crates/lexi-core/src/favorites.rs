use std::collections::HashSet;
use std::sync::Arc;

use lexi_types::{FavoriteItem, Notice};
use tokio::sync::Mutex;

use crate::clock::now_millis;
use crate::store::{KeyValueStore, keys, load_snapshot, persist_snapshot};

pub(crate) fn same_word(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Keep the first entry of each case-insensitive word
pub(crate) fn dedupe_words<T>(items: &mut Vec<T>, word: impl Fn(&T) -> &str) {
    let mut seen = HashSet::new();
    let before = items.len();
    items.retain(|item| seen.insert(word(item).trim().to_lowercase()));
    if items.len() != before {
        tracing::warn!("Dropped {} duplicate words", before - items.len());
    }
}

/// User's favorite words, unique by case-insensitive word, newest first.
pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<FavoriteItem>>,
}

impl Favorites {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut items: Vec<FavoriteItem> = load_snapshot(store.as_ref(), keys::FAVORITES).await;
        dedupe_words(&mut items, |f| &f.word);
        tracing::info!("Favorites loaded: {} words", items.len());

        Self {
            store,
            items: Mutex::new(items),
        }
    }

    pub async fn add(&self, word: &str) -> Notice {
        let word = word.trim();
        if word.is_empty() {
            return Notice::warning("Enter a word to add to favorites");
        }

        let mut items = self.items.lock().await;
        if items.iter().any(|f| same_word(&f.word, word)) {
            return Notice::info(format!("'{word}' is already in favorites"));
        }

        items.insert(
            0,
            FavoriteItem {
                word: word.to_string(),
                timestamp: now_millis(),
            },
        );
        if !self.persist(&items).await {
            return Notice::warning(format!(
                "Added '{word}' to favorites, but it could not be saved"
            ));
        }
        Notice::success(format!("Added '{word}' to favorites"))
    }

    /// Remove every entry matching `word`
    pub async fn remove(&self, word: &str) -> Notice {
        let word = word.trim();
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|f| !same_word(&f.word, word));

        if items.len() == before {
            return Notice::info(format!("'{word}' is not in favorites"));
        }

        if !self.persist(&items).await {
            return Notice::warning(format!(
                "Removed '{word}' from favorites, but it could not be saved"
            ));
        }
        Notice::success(format!("Removed '{word}' from favorites"))
    }

    pub async fn toggle(&self, word: &str) -> Notice {
        if self.is_favorite(word).await {
            self.remove(word).await
        } else {
            self.add(word).await
        }
    }

    pub async fn is_favorite(&self, word: &str) -> bool {
        self.items
            .lock()
            .await
            .iter()
            .any(|f| same_word(&f.word, word))
    }

    pub async fn items(&self) -> Vec<FavoriteItem> {
        self.items.lock().await.clone()
    }

    /// Returns whether the snapshot reached the store
    async fn persist(&self, items: &[FavoriteItem]) -> bool {
        match persist_snapshot(self.store.as_ref(), keys::FAVORITES, items).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist favorites: {}", e);
                false
            }
        }
    }
}
