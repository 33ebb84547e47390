use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters of a definition request as entered by the user or replayed
/// from history. Optional fields stay `None` until normalization fills in
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub word: String,
    /// Requested definition length. `None` when absent or not an integer.
    pub length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl RequestParams {
    pub fn new(word: impl Into<String>, length: i64) -> Self {
        Self {
            word: word.into(),
            length: Some(length),
            ..Self::default()
        }
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

/// Parse a user-entered length. Surrounding whitespace is ignored; anything
/// that is not an integer yields `None`.
pub fn parse_length(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Generation settings echoed back by the define service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineConfig {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub effective_lang: String,
}

/// Successful define service response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineResult {
    pub word: String,
    /// Definition text
    pub result: String,
    pub actual_length: i64,
    pub status: String,
    #[serde(default)]
    pub config: DefineConfig,
}

/// A definition result as held by the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(flatten)]
    pub definition: DefineResult,
    pub requested_length: i64,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub saved_at: i64,
    #[serde(default)]
    pub cache_hit: bool,
}

impl CacheEntry {
    /// Tag a fresh service response with the length the user asked for.
    pub fn fetched(definition: DefineResult, requested_length: i64) -> Self {
        Self {
            definition,
            requested_length,
            saved_at: 0,
            cache_hit: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResult {
    pub actual_length: i64,
    pub status: String,
    pub effective_lang: String,
}

impl From<&CacheEntry> for HistoryResult {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            actual_length: entry.definition.actual_length,
            status: entry.definition.status.clone(),
            effective_lang: entry.definition.config.effective_lang.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub word: String,
    pub length: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub timestamp: i64,
    pub result: HistoryResult,
}

/// Trimmed value, `None` when blank
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl HistoryItem {
    /// Build a history record for `params`; the ledger stamps the timestamp.
    pub fn from_request(params: &RequestParams, result: HistoryResult) -> Self {
        Self {
            word: params.word.trim().to_string(),
            length: params.length.unwrap_or_default(),
            tone: present(&params.tone),
            context: present(&params.context),
            lang: present(&params.lang),
            timestamp: 0,
            result,
        }
    }

    /// Parameters that reproduce this request.
    pub fn to_request(&self) -> RequestParams {
        RequestParams {
            word: self.word.clone(),
            length: Some(self.length),
            tone: self.tone.clone(),
            context: self.context.clone(),
            lang: self.lang.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub word: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub word: String,
    pub id: Uuid,
}

/// Presentation order for the history view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistorySort {
    #[default]
    TimeDesc,
    TimeAsc,
    WordAsc,
    WordDesc,
}
