//! Configuration for the report pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest sampling temperature accepted by OpenAI-compatible endpoints
const MAX_TEMPERATURE: f32 = 2.0;

/// Configuration for the report pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sampling temperature for field extraction (model call #1)
    pub extraction_temperature: f32,

    /// Sampling temperature for the template rewrite (model call #2)
    pub report_temperature: f32,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Substitute found values into placeholders the model left behind
    pub substitute_leftover_placeholders: bool,
}

impl PipelineConfig {
    /// Get the model call timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("extraction_temperature", self.extraction_temperature),
            ("report_temperature", self.report_temperature),
        ] {
            if !(0.0..=MAX_TEMPERATURE).contains(&value) {
                return Err(format!(
                    "{} must be between 0.0 and {}, got {}",
                    name, MAX_TEMPERATURE, value
                ));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Deterministic preset: both model calls at temperature 0
    pub fn deterministic() -> Self {
        Self {
            report_temperature: 0.0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extraction_temperature: 0.0,
            report_temperature: 0.1,
            request_timeout_secs: 120,
            substitute_leftover_placeholders: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_temperature, 0.0);
        assert_eq!(config.report_temperature, 0.1);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_deterministic_config_is_valid() {
        let config = PipelineConfig::deterministic();
        assert!(config.validate().is_ok());
        assert_eq!(config.report_temperature, 0.0);
    }

    #[test]
    fn test_invalid_temperature() {
        let config = PipelineConfig {
            report_temperature: 2.5,
            ..PipelineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("report_temperature"));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = PipelineConfig {
            request_timeout_secs: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::deterministic();
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = PipelineConfig::from_toml("request_timeout_secs = 30").unwrap();
        assert_eq!(parsed.request_timeout_secs, 30);
        assert!(parsed.substitute_leftover_placeholders);
    }
}
