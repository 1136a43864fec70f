//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key on the command line or in the environment
    #[error("No API key provided. Pass --api-key or set GROQ_API_KEY.")]
    MissingApiKey,

    /// Model provider could not be set up
    #[error("Model provider error: {0}")]
    Llm(#[from] glr_llm::LlmError),

    /// The report pipeline stopped at a stage
    #[error("{0}")]
    Pipeline(#[from] glr_extractor::PipelineFailure),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
