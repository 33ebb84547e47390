use async_trait::async_trait;
use lexi_types::DefineResult;
use serde::Deserialize;

use crate::{DefineError, DefineRequest, DefineService};

#[derive(Clone)]
pub struct HttpDefineClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDefineClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Use a preconfigured HTTP client (proxies, TLS, timeouts)
    pub fn with_client(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[async_trait]
impl DefineService for HttpDefineClient {
    async fn define(&self, request: &DefineRequest) -> Result<DefineResult, DefineError> {
        tracing::debug!("POST {} word='{}'", self.endpoint, request.word);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Body is optional on failures; an unreadable one means no message
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.trim().is_empty());

            tracing::warn!("Define service returned HTTP {}", status);
            return Err(DefineError::Service {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DefineResult>()
            .await
            .map_err(|e| DefineError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
