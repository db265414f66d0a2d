//! OpenAI-compatible chat completions over HTTP

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{TransportError, TransportResult};
use super::traits::{ChatTransport, CompletionRequest, CompletionResponse};
use crate::logging::Logger;

/// POSTs requests to `<api_base>/chat/completions`
pub struct HttpChatTransport {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    logger: Arc<dyn Logger>,
}

impl HttpChatTransport {
    pub fn new(api_base: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            token: None,
            logger,
        }
    }

    /// Send `token` as a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use a preconfigured client (proxies, timeouts, extra headers)
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Full completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, request: CompletionRequest) -> TransportResult<CompletionResponse> {
        let url = self.endpoint();
        self.logger.debug(&format!(
            "[HttpChatTransport] POST {} model={} messages={}",
            url,
            request.model,
            request.messages.len()
        ));

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.logger.error(&format!(
                "[HttpChatTransport] {} returned {}",
                url,
                status.as_u16()
            ));
            return Err(TransportError::from_status(status.as_u16(), body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
