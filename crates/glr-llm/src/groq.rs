//! Groq Provider Implementation
//!
//! Talks to any OpenAI-compatible chat-completions endpoint; Groq's hosted
//! API is the default.
//!
//! # Features
//!
//! - Async HTTP communication with bearer-token auth
//! - Configurable endpoint and model
//! - Explicit per-request timeout
//! - JSON-object response mode
//!
//! Failed requests are not retried; the caller decides what to do.
//!
//! # Examples
//!
//! ```no_run
//! use glr_llm::GroqProvider;
//!
//! let provider = GroqProvider::new("gsk_...").unwrap();
//! ```

use crate::LlmError;
use glr_domain::traits::{CompletionRequest, LlmProvider as LlmProviderTrait, ResponseFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default Groq OpenAI-compatible API base
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default model: a 70b-class, versatile instruction-tuned model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat-completions provider
///
/// The API key is held in memory only and is never printed by `Debug`.
pub struct GroqProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatBody {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatBody>,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl GroqProvider {
    /// Create a provider for the default endpoint and model
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_settings(api_key, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a provider with explicit settings
    ///
    /// # Parameters
    ///
    /// - `api_key`: bearer token for the API
    /// - `endpoint`: API base, e.g. `https://api.groq.com/openai/v1`
    /// - `model`: model identifier
    /// - `timeout_secs`: whole-request timeout
    pub fn with_settings(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Authentication("API key not provided".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            timeout_secs,
            client,
        })
    }

    /// The API base this provider talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    /// Run one chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or the request times out
    /// - The key is rejected (401/403)
    /// - The model does not exist (404)
    /// - The API is rate limiting (429)
    /// - The reply cannot be decoded or carries no content
    pub async fn chat(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: request.temperature,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.user },
            ],
            response_format: match request.response_format {
                ResponseFormat::JsonObject => Some(ResponseFormatBody { kind: "json_object" }),
                ResponseFormat::Text => None,
            },
        };

        debug!(
            "POST {} model={} system_len={} user_len={}",
            self.completions_url(),
            self.model,
            request.system.len(),
            request.user.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(format!("HTTP {}", status))
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parse_reply(parsed)
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout_secs)
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

fn parse_reply(parsed: ChatCompletionResponse) -> Result<String, LlmError> {
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response carried no message content".to_string()))
}

impl fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl LlmProviderTrait for GroqProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, Self::Error>> + Send {
        self.chat(request)
    }
}
