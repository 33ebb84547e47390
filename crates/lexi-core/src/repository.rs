use std::sync::Arc;

use lexi_config::limits::LimitsConfig;

use crate::cache::DefinitionCache;
use crate::favorites::Favorites;
use crate::history::HistoryLedger;
use crate::quiz::QuizList;
use crate::store::KeyValueStore;

/// Live copy of every persisted collection.
///
/// Only obtainable through [`Repository::open`], which returns once all
/// collections are loaded, so nothing can read or mutate them earlier.
pub struct Repository {
    pub cache: DefinitionCache,
    pub history: HistoryLedger,
    pub favorites: Favorites,
    pub quiz: QuizList,
}

impl Repository {
    pub async fn open(store: Arc<dyn KeyValueStore>, limits: &LimitsConfig) -> Self {
        let limits = limits.sanitized();
        let (cache, history, favorites, quiz) = tokio::join!(
            DefinitionCache::load(store.clone()),
            HistoryLedger::load(store.clone(), limits.history_max_items),
            Favorites::load(store.clone()),
            QuizList::load(store),
        );

        tracing::info!("Repository ready");
        Self {
            cache,
            history,
            favorites,
            quiz,
        }
    }
}
