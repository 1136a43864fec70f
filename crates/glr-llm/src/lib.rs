//! GLR LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `glr-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GroqProvider`: OpenAI-compatible chat completions (Groq by default)
//!
//! # Examples
//!
//! ```
//! use glr_llm::MockProvider;
//! use glr_domain::traits::{CompletionRequest, LlmProvider};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = CompletionRequest::new("system", "user", 0.0);
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let result = rt.block_on(provider.complete(&request)).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod groq;

use glr_domain::traits::{
    CompletionRequest, LlmProvider as LlmProviderTrait, ProviderError, ProviderErrorKind,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use groq::GroqProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not finish in time
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The API rejected the credential
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl ProviderError for LlmError {
    fn kind(&self) -> ProviderErrorKind {
        match self {
            LlmError::InvalidResponse(_) => ProviderErrorKind::Response,
            _ => ProviderErrorKind::Request,
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured replies without making any network calls. A
/// scripted reply is chosen when its marker occurs in the request's system
/// or user message; otherwise the default reply is returned. Every request
/// is recorded for later inspection.
///
/// # Examples
///
/// ```
/// use glr_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("extraction engine", "{}");
/// provider.add_response("field adjuster", "Final report");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    delay: Option<Duration>,
    responses: Arc<Mutex<Vec<(String, Scripted)>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed reply for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock-model".to_string(),
            default_response: response.into(),
            delay: None,
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the reported model name
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Hold every reply back for `delay` before returning it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply with `response` to requests whose messages contain `marker`
    pub fn add_response(&mut self, marker: impl Into<String>, response: impl Into<String>) {
        self.lock_responses()
            .push((marker.into(), Scripted::Reply(response.into())));
    }

    /// Fail requests whose messages contain `marker`
    pub fn add_error(&mut self, marker: impl Into<String>) {
        self.lock_responses().push((marker.into(), Scripted::Fail));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock_requests().clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        self.lock_requests().clear();
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, Vec<(String, Scripted)>> {
        self.responses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<CompletionRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reply_for(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.lock_requests().push(request.clone());

        let responses = self.lock_responses();
        let scripted = responses
            .iter()
            .find(|(marker, _)| request.system.contains(marker) || request.user.contains(marker))
            .map(|(_, scripted)| scripted.clone());

        match scripted {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, Self::Error>> + Send {
        let result = self.reply_for(request);
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}
