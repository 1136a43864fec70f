//! Error types for the report pipeline

use glr_documents::DocumentError;
use glr_domain::traits::{ProviderError, ProviderErrorKind};
use glr_domain::PipelineStage;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while generating a report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlrError {
    /// A template or evidence file is missing or cannot be parsed
    #[error("File read error: {0}")]
    FileRead(String),

    /// The hosted model could not be reached, refused the call or timed out
    #[error("Model request error: {0}")]
    ModelRequest(String),

    /// The model answered with something unusable
    #[error("Model response error: {0}")]
    ModelResponse(String),

    /// The output document could not be serialized
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GlrError {
    /// Classify a provider failure as a request or response error
    pub fn from_provider<E: ProviderError>(error: E) -> Self {
        match error.kind() {
            ProviderErrorKind::Request => GlrError::ModelRequest(error.to_string()),
            ProviderErrorKind::Response => GlrError::ModelResponse(error.to_string()),
        }
    }
}

impl From<DocumentError> for GlrError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::InvalidPdf { .. } | DocumentError::InvalidDocx { .. } => {
                GlrError::FileRead(e.to_string())
            }
            DocumentError::Write(_) | DocumentError::Conversion(_) => {
                GlrError::Assembly(e.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for GlrError {
    fn from(e: serde_json::Error) -> Self {
        GlrError::ModelResponse(format!("JSON parse error: {}", e))
    }
}

/// A request that stopped at a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineFailure {
    /// Stage that was active when the error occurred
    pub stage: PipelineStage,

    /// What went wrong
    pub error: GlrError,
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed while {}: {}", self.stage, self.error)
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_errors_classified() {
        let pdf = DocumentError::InvalidPdf {
            name: "a.pdf".to_string(),
            reason: "bad header".to_string(),
        };
        assert!(matches!(GlrError::from(pdf), GlrError::FileRead(msg) if msg.contains("a.pdf")));

        let write = DocumentError::Write("disk full".to_string());
        assert!(matches!(GlrError::from(write), GlrError::Assembly(_)));
    }

    #[test]
    fn test_failure_names_stage() {
        let failure = PipelineFailure {
            stage: PipelineStage::ExtractingFields,
            error: GlrError::ModelRequest("timed out".to_string()),
        };
        let message = failure.to_string();
        assert!(message.contains(PipelineStage::ExtractingFields.as_str()));
        assert!(message.contains("timed out"));
    }
}
