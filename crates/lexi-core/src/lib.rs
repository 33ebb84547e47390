pub mod cache;
pub mod clock;
pub mod favorites;
pub mod history;
pub mod key;
pub mod orchestrator;
pub mod quiz;
pub mod repository;
pub mod store;

#[cfg(test)]
mod tests;

pub use cache::{CacheStats, DefinitionCache};
pub use favorites::Favorites;
pub use history::HistoryLedger;
pub use key::{CacheKey, NormalizedParams, derive_key, normalize};
pub use orchestrator::{DisplaySlot, Orchestrator, RequestOutcome, RequestState, ValidationError};
pub use quiz::QuizList;
pub use repository::Repository;
pub use store::{ClearReport, KeyValueStore, MemoryStore, StoreError};
