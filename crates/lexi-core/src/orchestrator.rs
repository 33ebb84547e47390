//! Definition request flow.
//!
//! ```text
//! Idle -> Validating -> Invalid -> Idle
//!                    -> CacheLookup -> Hit -> Completed
//!                                   -> Miss -> Fetching -> Completed | Failed
//! ```
//!
//! Runs are independent. Each one takes a token from the [`DisplaySlot`]
//! once validated, and only the holder of the newest token may change what
//! is displayed. Identical concurrent requests are not merged; each fetches
//! on its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lexi_config::limits::LimitsConfig;
use lexi_define::DefineService;
use lexi_types::{CacheEntry, Displayed, HistoryItem, HistoryResult, Notice, RequestParams};
use tokio::sync::watch;

use crate::key::define_request;
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Enter a word to define")]
    EmptyWord,

    #[error("Enter a length as a whole number")]
    MissingLength,

    #[error("Length must be between 1 and {max} (got {length})")]
    LengthOutOfRange { length: i64, max: i64 },
}

/// Reject requests without a word or with a length outside `[1, max]`
pub fn validate(params: &RequestParams, max_length: i64) -> Result<i64, ValidationError> {
    if params.word.trim().is_empty() {
        return Err(ValidationError::EmptyWord);
    }

    let length = params.length.ok_or(ValidationError::MissingLength)?;
    if !(1..=max_length).contains(&length) {
        return Err(ValidationError::LengthOutOfRange {
            length,
            max: max_length,
        });
    }

    Ok(length)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// Currently displayed result, guarded so that only the latest run writes.
pub struct DisplaySlot {
    latest: AtomicU64,
    tx: watch::Sender<Displayed>,
}

impl DisplaySlot {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Displayed::Empty);
        Self {
            latest: AtomicU64::new(0),
            tx,
        }
    }

    /// Claim the display for a new run, superseding all earlier runs
    pub fn begin(&self) -> RunToken {
        RunToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, token: RunToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Show `value` if `token` is still the newest. Returns whether it was shown.
    pub fn publish(&self, token: RunToken, value: Displayed) -> bool {
        self.tx.send_if_modified(|current| {
            if !self.is_latest(token) {
                return false;
            }
            *current = value;
            true
        })
    }

    pub fn current(&self) -> Displayed {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Displayed> {
        self.tx.subscribe()
    }
}

impl Default for DisplaySlot {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Invalid(ValidationError),
    Completed { entry: CacheEntry, from_cache: bool },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub state: RequestState,
    pub notices: Vec<Notice>,
    /// Whether this run still owned the display when it settled
    pub displayed: bool,
}

impl RequestOutcome {
    fn invalid(error: ValidationError) -> Self {
        Self {
            notices: vec![Notice::error(error.to_string())],
            state: RequestState::Invalid(error),
            displayed: false,
        }
    }
}

pub struct Orchestrator {
    repository: Arc<Repository>,
    service: Arc<dyn DefineService>,
    limits: LimitsConfig,
    display: DisplaySlot,
}

impl Orchestrator {
    pub fn new(
        repository: Arc<Repository>,
        service: Arc<dyn DefineService>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            repository,
            service,
            limits: limits.sanitized(),
            display: DisplaySlot::new(),
        }
    }

    pub fn display(&self) -> &DisplaySlot {
        &self.display
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }

    /// Run one definition request to completion
    pub async fn define(&self, params: RequestParams) -> RequestOutcome {
        let length = match validate(&params, self.limits.max_requested_length) {
            Ok(length) => length,
            Err(e) => {
                tracing::debug!("Rejected request: {}", e);
                return RequestOutcome::invalid(e);
            }
        };

        let token = self.display.begin();
        let word = params.word.trim().to_string();

        if let Some(entry) = self.repository.cache.lookup(&params).await {
            tracing::info!("'{}' served from cache", word);
            self.repository
                .history
                .record(HistoryItem::from_request(&params, HistoryResult::from(&entry)))
                .await;

            let displayed = self.display.publish(token, Displayed::Result(entry.clone()));
            return RequestOutcome {
                state: RequestState::Completed {
                    entry,
                    from_cache: true,
                },
                notices: vec![Notice::info("Loaded from cache")],
                displayed,
            };
        }

        // Fetching: nothing stale stays on screen while the call is in flight
        self.display.publish(token, Displayed::Loading { word: word.clone() });
        tracing::info!("Fetching definition for '{}' (length {})", word, length);

        let result = match self.service.define(&define_request(&params)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Define request for '{}' failed: {}", word, e);
                let message = e.user_message();
                let displayed = self.display.publish(token, Displayed::Error(message.clone()));
                return RequestOutcome {
                    notices: vec![Notice::error(message.clone())],
                    state: RequestState::Failed(message),
                    displayed,
                };
            }
        };

        let entry = CacheEntry::fetched(result, length);
        self.repository
            .history
            .record(HistoryItem::from_request(&params, HistoryResult::from(&entry)))
            .await;
        let displayed = self.display.publish(token, Displayed::Result(entry.clone()));

        let mut notices = Vec::new();
        if let Err(e) = self.repository.cache.store(&params, entry.clone()).await {
            tracing::warn!("Could not cache '{}': {}", word, e);
            notices.push(Notice::warning("Could not save the definition locally"));
        }

        RequestOutcome {
            state: RequestState::Completed {
                entry,
                from_cache: false,
            },
            notices,
            displayed,
        }
    }
}
