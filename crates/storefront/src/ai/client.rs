//! Anthropic Messages API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::AiConfig;

use super::TextGenerator;
use super::error::AiError;
use super::types::{ChatRequest, ChatResponse, ErrorEnvelope, Message, StopReason};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Claude API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct AnthropicClient {
    inner: Arc<AnthropicClientInner>,
}

struct AnthropicClientInner {
    client: reqwest::Client,
    model: String,
}

impl AnthropicClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `AiError::Config` if the API key is not a valid header value
    /// or the HTTP client cannot be built.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| AiError::Config("API key contains invalid header characters".to_string()))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AiError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(AnthropicClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    /// Model the client sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a chat request and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, messages, system), fields(model = %self.inner.model))]
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> Result<ChatResponse, AiError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system,
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let parsed: ChatResponse = serde_json::from_str(&body)
                .map_err(|e| AiError::Parse(format!("Failed to parse response: {e}")))?;
            tracing::debug!(
                input_tokens = parsed.usage.input_tokens,
                output_tokens = parsed.usage.output_tokens,
                stop_reason = ?parsed.stop_reason,
                "Completion received"
            );
            Ok(parsed)
        } else {
            Err(handle_error_status(status, response).await)
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let response = self.chat(vec![Message::user(prompt)], None).await?;
        if response.stop_reason == Some(StopReason::MaxTokens) {
            tracing::warn!(response_id = %response.id, "Completion truncated at max_tokens");
        }
        Ok(response.text())
    }
}

/// Map an error status code to an [`AiError`].
async fn handle_error_status(status: reqwest::StatusCode, response: reqwest::Response) -> AiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return AiError::RateLimited {
            retry_after_secs: retry_after,
        };
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return AiError::Unauthorized;
    }

    match response.text().await {
        Ok(body) => parse_api_error(&body),
        Err(e) => AiError::Http(e),
    }
}

fn parse_api_error(body: &str) -> AiError {
    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| AiError::Api {
            error_type: "unknown".to_string(),
            message: body.to_string(),
        },
        |envelope| AiError::Api {
            error_type: envelope.error.error_type,
            message: envelope.error.message,
        },
    )
}
