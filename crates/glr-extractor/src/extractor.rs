//! Model-backed field extraction

use crate::config::PipelineConfig;
use crate::error::GlrError;
use crate::parser::parse_extraction_response;
use crate::prompt::ExtractionPromptBuilder;
use glr_domain::traits::{CompletionRequest, FieldExtractor, LlmProvider};
use glr_domain::{ExtractedData, ExtractionField};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Send one request to the model, bounded by `limit`
pub(crate) async fn call_model<L>(
    llm: &L,
    request: &CompletionRequest,
    limit: Duration,
) -> Result<String, GlrError>
where
    L: LlmProvider + Sync,
{
    debug!(
        "Calling {} (system {} chars, user {} chars, temperature {})",
        llm.model_name(),
        request.system.len(),
        request.user.len(),
        request.temperature
    );

    let reply = timeout(limit, llm.complete(request))
        .await
        .map_err(|_| {
            GlrError::ModelRequest(format!(
                "No reply from {} within {}s",
                llm.model_name(),
                limit.as_secs()
            ))
        })?
        .map_err(GlrError::from_provider)?;

    debug!("Model reply length: {} chars", reply.len());
    Ok(reply)
}

/// Extracts fields by asking the hosted model (model call #1)
pub struct LlmFieldExtractor<L> {
    llm: Arc<L>,
    config: PipelineConfig,
}

impl<L> LlmFieldExtractor<L>
where
    L: LlmProvider + Send + Sync,
{
    /// Create an extractor owning its provider
    pub fn new(llm: L, config: PipelineConfig) -> Self {
        Self::shared(Arc::new(llm), config)
    }

    /// Create an extractor over a provider shared with other stages
    pub fn shared(llm: Arc<L>, config: PipelineConfig) -> Self {
        Self { llm, config }
    }

    async fn run(&self, raw_text: &str, fields: &[ExtractionField]) -> Result<ExtractedData, GlrError> {
        info!("Extracting {} field(s) from {} chars of text", fields.len(), raw_text.len());

        let request = ExtractionPromptBuilder::new(raw_text)
            .with_fields(fields)
            .build(self.config.extraction_temperature);

        let reply = call_model(self.llm.as_ref(), &request, self.config.request_timeout()).await?;
        let data = parse_extraction_response(&reply, fields)?;

        info!("Model found {} of {} field(s)", data.found_count(), fields.len());
        Ok(data)
    }
}

impl<L> FieldExtractor for LlmFieldExtractor<L>
where
    L: LlmProvider + Send + Sync,
{
    type Error = GlrError;

    fn extract(
        &self,
        raw_text: &str,
        fields: &[ExtractionField],
    ) -> impl std::future::Future<Output = Result<ExtractedData, Self::Error>> + Send {
        self.run(raw_text, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glr_domain::traits::ResponseFormat;
    use glr_domain::FieldValue;
    use glr_llm::MockProvider;

    fn extractor(reply: &str) -> LlmFieldExtractor<MockProvider> {
        LlmFieldExtractor::new(MockProvider::new(reply), PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_extract_maps_every_field() {
        let extractor = extractor(r#"{"INSURED_NAME": "Jane Doe", "DATE_LOSS": "03/14/2024"}"#);
        let data = extractor
            .extract("Insured Jane Doe, loss 03/14/2024", &ExtractionField::ALL)
            .await
            .unwrap();

        assert_eq!(data.len(), ExtractionField::ALL.len());
        assert_eq!(data.get(ExtractionField::DateLoss).as_found(), Some("03/14/2024"));
        assert_eq!(data.get(ExtractionField::ClaimNumber), &FieldValue::NotFound);
    }

    #[tokio::test]
    async fn test_extract_sends_json_mode_request() {
        let llm = Arc::new(MockProvider::new(r#"{"CLAIM_NUMBER": "C-1"}"#));
        let extractor = LlmFieldExtractor::shared(llm.clone(), PipelineConfig::default());
        extractor.extract("Claim C-1", &ExtractionField::ALL).await.unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.0);
        assert_eq!(requests[0].response_format, ResponseFormat::JsonObject);
        assert!(requests[0].user.contains("Claim C-1"));
    }

    #[tokio::test]
    async fn test_extract_invalid_json() {
        let err = extractor("This is not JSON")
            .extract("text", &ExtractionField::ALL)
            .await
            .unwrap_err();
        assert!(matches!(err, GlrError::ModelResponse(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out() {
        let llm = MockProvider::new(r#"{"CLAIM_NUMBER": "C-1"}"#).with_delay(Duration::from_secs(60));
        let config = PipelineConfig {
            request_timeout_secs: 5,
            ..PipelineConfig::default()
        };
        let extractor = LlmFieldExtractor::new(llm, config);

        let err = extractor.extract("Claim C-1", &ExtractionField::ALL).await.unwrap_err();
        match err {
            GlrError::ModelRequest(msg) => assert!(msg.contains("within 5s"), "{}", msg),
            other => panic!("expected ModelRequest, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_inside_limit_is_kept() {
        let llm = MockProvider::new(r#"{"CLAIM_NUMBER": "C-1"}"#).with_delay(Duration::from_secs(4));
        let config = PipelineConfig {
            request_timeout_secs: 5,
            ..PipelineConfig::default()
        };
        let data = LlmFieldExtractor::new(llm, config)
            .extract("Claim C-1", &ExtractionField::ALL)
            .await
            .unwrap();
        assert_eq!(data.get(ExtractionField::ClaimNumber).as_found(), Some("C-1"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_request_error() {
        let mut llm = MockProvider::new("{}");
        llm.add_error("extraction engine");
        let extractor = LlmFieldExtractor::new(llm, PipelineConfig::default());

        let err = extractor.extract("text", &ExtractionField::ALL).await.unwrap_err();
        assert!(matches!(err, GlrError::ModelRequest(_)));
    }
}
