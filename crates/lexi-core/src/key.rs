//! Canonical identity of a definition request.
//!
//! The same normalized form backs both the cache key and the history
//! identity tuple, so two requests share a cache entry exactly when they
//! would replace each other in history.

use std::fmt;

use lexi_define::DefineRequest;
use lexi_types::RequestParams;
use serde_json::json;

/// Store key prefix for individual cache entries
pub const ENTRY_PREFIX: &str = "lexi.cache:";

pub const DEFAULT_TONE: &str = "neutral";
pub const DEFAULT_CONTEXT: &str = "none";
pub const DEFAULT_LANG: &str = "auto";

/// Request parameters with every field trimmed, lower-cased and defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedParams {
    pub word: String,
    pub length: i64,
    pub tone: String,
    pub context: String,
    pub lang: String,
}

/// Blank optional fields count as absent.
fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

pub fn normalize(params: &RequestParams) -> NormalizedParams {
    NormalizedParams {
        word: params.word.trim().to_lowercase(),
        length: params.length.unwrap_or(0),
        tone: optional(&params.tone).unwrap_or_else(|| DEFAULT_TONE.to_string()),
        context: optional(&params.context).unwrap_or_else(|| DEFAULT_CONTEXT.to_string()),
        lang: optional(&params.lang).unwrap_or_else(|| DEFAULT_LANG.to_string()),
    }
}

/// Body for the define service: normalized values, with fields the user
/// left out omitted rather than defaulted.
pub fn define_request(params: &RequestParams) -> DefineRequest {
    DefineRequest {
        word: params.word.trim().to_lowercase(),
        length: params.length.unwrap_or(0),
        tone: optional(&params.tone),
        context: optional(&params.context),
        lang: optional(&params.lang),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the entry itself lives in the key-value store
    pub fn storage_key(&self) -> String {
        format!("{ENTRY_PREFIX}{}", self.0)
    }
}

impl From<String> for CacheKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl NormalizedParams {
    /// JSON object with keys in lexicographic order: serde_json's default
    /// map is ordered, so construction order never leaks into the key.
    pub fn key(&self) -> CacheKey {
        let fields = json!({
            "word": self.word,
            "length": self.length,
            "tone": self.tone,
            "context": self.context,
            "lang": self.lang,
        });
        CacheKey(fields.to_string())
    }
}

pub fn derive_key(params: &RequestParams) -> CacheKey {
    normalize(params).key()
}
