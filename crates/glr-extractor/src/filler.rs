//! Template rewrite (model call #2) and the deterministic placeholder pass

use crate::config::PipelineConfig;
use crate::error::GlrError;
use crate::extractor::call_model;
use crate::prompt::ReportPromptBuilder;
use glr_domain::traits::LlmProvider;
use glr_domain::{ExtractedData, ExtractionField};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rewrites the template text into the final report using the hosted model
pub struct TemplateFiller<L> {
    llm: Arc<L>,
    config: PipelineConfig,
}

impl<L> TemplateFiller<L>
where
    L: LlmProvider + Send + Sync,
{
    /// Create a filler over a provider shared with other stages
    pub fn shared(llm: Arc<L>, config: PipelineConfig) -> Self {
        Self { llm, config }
    }

    /// Produce the completed report text
    ///
    /// # Errors
    ///
    /// [`GlrError::ModelRequest`] when the call fails or times out and
    /// [`GlrError::ModelResponse`] when the reply is empty.
    pub async fn fill(&self, template_text: &str, data: &ExtractedData) -> Result<String, GlrError> {
        info!(
            "Filling template ({} chars) with {} found field(s)",
            template_text.len(),
            data.found_count()
        );

        let request = ReportPromptBuilder::new(template_text, data).build(self.config.report_temperature);
        let reply = call_model(self.llm.as_ref(), &request, self.config.request_timeout()).await?;

        let mut text = reply.trim().to_string();
        if text.is_empty() {
            return Err(GlrError::ModelResponse("Model returned an empty report".to_string()));
        }

        if self.config.substitute_leftover_placeholders {
            let (substituted, count) = substitute_placeholders(&text, data);
            if count > 0 {
                debug!("Substituted {} leftover placeholder(s)", count);
            }
            text = substituted;
        }

        let unresolved = unresolved_placeholders(&text);
        if !unresolved.is_empty() {
            let names: Vec<_> = unresolved.iter().map(|f| f.as_str()).collect();
            warn!("Report still contains placeholders: {}", names.join(", "));
        }

        Ok(text)
    }
}

/// Replace `[FIELD]` placeholders whose value was found
///
/// Returns the new text and the number of replacements made. Placeholders
/// for fields that were not found are left in place. The text is scanned
/// once, so a substituted value is never itself rewritten.
pub fn substitute_placeholders(text: &str, data: &ExtractedData) -> (String, usize) {
    let found: Vec<(String, &str)> = data
        .found()
        .map(|(field, value)| (field.placeholder(), value))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        match found.iter().find(|(placeholder, _)| candidate.starts_with(placeholder.as_str())) {
            Some((placeholder, value)) => {
                out.push_str(value);
                count += 1;
                rest = &candidate[placeholder.len()..];
            }
            None => {
                out.push('[');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    (out, count)
}

/// Fields whose `[FIELD]` placeholder still appears in `text`
pub fn unresolved_placeholders(text: &str) -> Vec<ExtractionField> {
    ExtractionField::ALL
        .iter()
        .copied()
        .filter(|field| text.contains(field.placeholder().as_str()))
        .collect()
}
