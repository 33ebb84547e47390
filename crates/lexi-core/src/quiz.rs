use std::sync::Arc;

use lexi_types::{Notice, QuizItem};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::favorites::{dedupe_words, same_word};
use crate::store::{KeyValueStore, keys, load_snapshot, persist_snapshot};

/// Words queued for practice. Unique by case-insensitive word; each item
/// keeps the id it was given on insertion.
pub struct QuizList {
    store: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<QuizItem>>,
}

impl QuizList {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut items: Vec<QuizItem> = load_snapshot(store.as_ref(), keys::QUIZ).await;
        dedupe_words(&mut items, |q| &q.word);
        tracing::info!("Quiz list loaded: {} words", items.len());

        Self {
            store,
            items: Mutex::new(items),
        }
    }

    pub async fn add(&self, word: &str) -> Notice {
        let word = word.trim();
        if word.is_empty() {
            return Notice::warning("Enter a word to add to the quiz list");
        }

        let mut items = self.items.lock().await;
        if items.iter().any(|q| same_word(&q.word, word)) {
            return Notice::info(format!("'{word}' is already in the quiz list"));
        }

        items.insert(
            0,
            QuizItem {
                word: word.to_string(),
                id: Uuid::new_v4(),
            },
        );
        if !self.persist(&items).await {
            return Notice::warning(format!(
                "Added '{word}' to the quiz list, but it could not be saved"
            ));
        }
        Notice::success(format!("Added '{word}' to the quiz list"))
    }

    pub async fn remove(&self, id: Uuid) -> Notice {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|q| q.id != id);

        if items.len() == before {
            return Notice::info("That word is not in the quiz list");
        }

        if !self.persist(&items).await {
            return Notice::warning("Removed from the quiz list, but it could not be saved");
        }
        Notice::success("Removed from the quiz list")
    }

    pub async fn contains(&self, word: &str) -> bool {
        self.items
            .lock()
            .await
            .iter()
            .any(|q| same_word(&q.word, word))
    }

    pub async fn items(&self) -> Vec<QuizItem> {
        self.items.lock().await.clone()
    }

    async fn persist(&self, items: &[QuizItem]) -> bool {
        match persist_snapshot(self.store.as_ref(), keys::QUIZ, items).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist quiz list: {}", e);
                false
            }
        }
    }
}
