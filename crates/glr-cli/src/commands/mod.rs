//! Command implementations.

pub mod config;
pub mod extract;
pub mod fields;
pub mod generate;
pub mod status;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::fields::execute_fields;
pub use self::generate::execute_generate;
pub use self::status::execute_status;

use crate::cli::ModelArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use glr_domain::UploadedDocument;
use glr_extractor::PipelineConfig;
use glr_llm::GroqProvider;
use std::path::Path;

/// Read a file from disk as an upload named after its file name.
pub fn read_upload(path: &Path) -> Result<UploadedDocument> {
    let bytes = std::fs::read(path)
        .map_err(|e| CliError::InvalidInput(format!("Cannot read '{}': {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedDocument::new(name, bytes))
}

/// Pipeline settings from the config file with command-line overrides.
pub fn pipeline_config(args: &ModelArgs, config: &Config) -> Result<PipelineConfig> {
    let mut pipeline = config.pipeline.clone();
    if let Some(timeout) = args.timeout {
        pipeline.request_timeout_secs = timeout;
    }
    pipeline.validate().map_err(CliError::InvalidInput)?;
    Ok(pipeline)
}

/// Model identifier and endpoint after command-line overrides.
pub fn model_settings(args: &ModelArgs, config: &Config) -> (String, String) {
    let model = args.model.clone().unwrap_or_else(|| config.llm.model.clone());
    let endpoint = args.endpoint.clone().unwrap_or_else(|| config.llm.endpoint.clone());
    (model, endpoint)
}

/// Build the hosted model client; the key is only held in memory.
pub fn build_provider(args: &ModelArgs, config: &Config) -> Result<GroqProvider> {
    let api_key = args
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;
    let (model, endpoint) = model_settings(args, config);
    let timeout = pipeline_config(args, config)?.request_timeout_secs;
    Ok(GroqProvider::with_settings(api_key, endpoint, model, timeout)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_args() -> ModelArgs {
        ModelArgs {
            api_key: None,
            model: None,
            endpoint: None,
            timeout: None,
        }
    }

    #[test]
    fn test_read_upload_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspection.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let upload = read_upload(&path).unwrap();
        assert_eq!(upload.name, "inspection.pdf");
        assert_eq!(upload.bytes, b"%PDF");
    }

    #[test]
    fn test_read_upload_missing_file() {
        let err = read_upload(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(err.to_string().contains("here.pdf"));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default();
        let args = ModelArgs {
            model: Some("llama-3.1-8b-instant".to_string()),
            timeout: Some(30),
            ..model_args()
        };

        let (model, endpoint) = model_settings(&args, &config);
        assert_eq!(model, "llama-3.1-8b-instant");
        assert_eq!(endpoint, config.llm.endpoint);
        assert_eq!(pipeline_config(&args, &config).unwrap().request_timeout_secs, 30);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = ModelArgs {
            timeout: Some(0),
            ..model_args()
        };
        assert!(pipeline_config(&args, &Config::default()).is_err());
    }

    #[test]
    fn test_provider_requires_key() {
        assert!(matches!(
            build_provider(&model_args(), &Config::default()),
            Err(CliError::MissingApiKey)
        ));

        let blank = ModelArgs {
            api_key: Some("  ".to_string()),
            ..model_args()
        };
        assert!(matches!(build_provider(&blank, &Config::default()), Err(CliError::MissingApiKey)));
    }

    #[test]
    fn test_provider_with_key() {
        let args = ModelArgs {
            api_key: Some("gsk_test".to_string()),
            ..model_args()
        };
        let provider = build_provider(&args, &Config::default()).unwrap();
        assert_eq!(provider.endpoint(), "https://api.groq.com/openai/v1");
    }
}
