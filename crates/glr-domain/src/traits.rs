//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ExtractedData, ExtractionField};
use std::fmt;
use std::future::Future;

/// Shape the model is asked to reply in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free text
    #[default]
    Text,
    /// A single JSON object
    JsonObject,
}

/// One chat-completion request to the hosted model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message
    pub system: String,

    /// User message
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Requested response format
    pub response_format: ResponseFormat,
}

impl CompletionRequest {
    /// Create a free-text request
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            response_format: ResponseFormat::Text,
        }
    }

    /// Ask for a JSON object reply
    pub fn json_object(mut self) -> Self {
        self.response_format = ResponseFormat::JsonObject;
        self
    }
}

/// Which side of a model call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The request never produced a usable reply (network, auth, rate limit, timeout)
    Request,
    /// A reply arrived but could not be understood
    Response,
}

/// Errors returned by an [`LlmProvider`] must say which side failed
pub trait ProviderError: fmt::Display {
    /// Classify the failure
    fn kind(&self) -> ProviderErrorKind;
}

/// Trait for hosted-model completion
///
/// Implemented by the infrastructure layer (glr-llm)
pub trait LlmProvider {
    /// Error type for model calls
    type Error: ProviderError + Send;

    /// Identifier of the model that serves requests
    fn model_name(&self) -> &str;

    /// Run one completion and return the reply text
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Trait for turning raw evidence text into the field mapping
///
/// Implemented by the application layer (glr-extractor). The returned mapping
/// is always complete, whatever subset of `fields` was requested.
pub trait FieldExtractor {
    /// Error type for extraction
    type Error;

    /// Extract the given fields from the text
    fn extract(
        &self,
        raw_text: &str,
        fields: &[ExtractionField],
    ) -> impl Future<Output = Result<ExtractedData, Self::Error>> + Send;
}

/// Capability for rendering a docx as pdf
///
/// Injected so that hosts without word-processor automation, and tests, can
/// supply their own answer.
pub trait PdfConverter {
    /// Error type for conversion
    type Error: fmt::Display;

    /// Whether this host can convert at all
    fn is_available(&self) -> bool;

    /// Convert docx bytes to pdf bytes
    fn convert(&self, docx: &[u8]) -> Result<Vec<u8>, Self::Error>;
}
