mod client;


pub use client::HttpDefineClient;

use lexi_types::DefineResult;
use serde::Serialize;

/// Message shown when the service fails without explaining why
pub const GENERIC_FAILURE: &str = "Could not fetch a definition. Please try again.";

/// Definition provider interface
#[async_trait::async_trait]
pub trait DefineService: Send + Sync {
    /// Request a definition for the given parameters
    async fn define(&self, request: &DefineRequest) -> Result<DefineResult, DefineError>;
}

/// Wire body of a define call. Optional fields are left out of the JSON
/// entirely instead of being sent empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefineRequest {
    pub word: String,
    pub length: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DefineError {
    /// Non-success response; carries the service message when it sent one
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Service { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DefineError {
    /// Text to surface to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            DefineError::Service {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
