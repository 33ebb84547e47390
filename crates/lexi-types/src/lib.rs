mod event;
mod model;

pub use event::{AppEvent, Displayed, Notice, NoticeKind};
pub use model::{
    CacheEntry, DefineConfig, DefineResult, FavoriteItem, HistoryItem, HistoryResult,
    HistorySort, QuizItem, RequestParams, parse_length,
};
