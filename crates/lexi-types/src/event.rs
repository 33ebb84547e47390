use uuid::Uuid;

use crate::model::{CacheEntry, FavoriteItem, HistoryItem, HistorySort, QuizItem, RequestParams};

#[derive(Debug, Clone)]
pub enum AppEvent {
    // Console -> app
    Define(RequestParams),
    /// Re-run the history item at this position of the newest-first view
    Replay(usize),
    FavoriteAdd(String),
    FavoriteRemove(String),
    FavoriteToggle(String),
    FavoritesList,
    QuizAdd(String),
    QuizRemove(Uuid),
    QuizList,
    HistoryList(HistorySort),
    HistoryClear {
        confirmed: bool,
    },
    CacheClear,
    CacheStats,
    Quit,

    // App -> console
    BackendReady,
    Display(Displayed),
    Notice(Notice),
    ShowFavorites(Vec<FavoriteItem>),
    ShowQuiz(Vec<QuizItem>),
    ShowHistory(Vec<HistoryItem>),
    ShowCacheStats {
        entries: usize,
        last_write: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Dismissible user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// What the result area currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Displayed {
    #[default]
    Empty,
    Loading {
        word: String,
    },
    Result(CacheEntry),
    Error(String),
}
