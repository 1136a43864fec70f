//! The per-request report pipeline

use crate::config::PipelineConfig;
use crate::error::{GlrError, PipelineFailure};
use crate::extractor::LlmFieldExtractor;
use crate::filler::{unresolved_placeholders, TemplateFiller};
use crate::parser::unverified_fields;
use crate::types::{ExtractionOutcome, GenerationOutcome, GenerationRequest};
use glr_documents::{assemble_docx, extract_pdf_text, DocxPackage, EvidenceText};
use glr_domain::traits::{FieldExtractor, LlmProvider, PdfConverter};
use glr_domain::{
    DocumentKind, ExtractedData, ExtractionField, GeneratedReport, PipelineStage, ReportNotice,
    RequestId, UploadedDocument,
};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

type StageObserver = Box<dyn Fn(PipelineStage) + Send + Sync>;

/// Tracks the stage of one request and reports transitions
struct StageTracker<'a> {
    current: PipelineStage,
    history: Vec<PipelineStage>,
    observer: Option<&'a StageObserver>,
}

impl<'a> StageTracker<'a> {
    fn new(observer: Option<&'a StageObserver>) -> Self {
        Self {
            current: PipelineStage::Idle,
            history: vec![PipelineStage::Idle],
            observer,
        }
    }

    fn enter(&mut self, next: PipelineStage) {
        debug_assert!(
            self.current.can_transition_to(next),
            "illegal transition {} -> {}",
            self.current,
            next
        );
        info!("Stage: {}", next);
        self.current = next;
        self.history.push(next);
        if let Some(observer) = self.observer {
            observer(next);
        }
    }

    fn fail(&mut self, error: GlrError) -> PipelineFailure {
        let stage = self.current;
        warn!("Request failed while {}: {}", stage, error);
        self.enter(PipelineStage::Failed);
        PipelineFailure { stage, error }
    }
}

/// Generates completed reports from a template and PDF evidence
///
/// The pipeline owns the model provider and the PDF conversion capability.
/// Each call to [`Pipeline::generate`] is one independent request.
pub struct Pipeline<L, C> {
    llm: Arc<L>,
    converter: Arc<C>,
    config: PipelineConfig,
    observer: Option<StageObserver>,
}

impl<L, C> Pipeline<L, C>
where
    L: LlmProvider + Send + Sync + 'static,
    C: PdfConverter + Send + Sync + 'static,
{
    /// Create a pipeline
    pub fn new(llm: L, converter: C, config: PipelineConfig) -> Self {
        Self {
            llm: Arc::new(llm),
            converter: Arc::new(converter),
            config,
            observer: None,
        }
    }

    /// Report every stage transition to `observer`
    pub fn with_observer(mut self, observer: impl Fn(PipelineStage) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether this host can produce a PDF alongside the docx
    pub fn can_convert_pdf(&self) -> bool {
        self.converter.is_available()
    }

    /// Run one request from uploaded files to finished documents
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFailure`] naming the stage that failed. A missing
    /// template or missing evidence fails before any model call. PDF
    /// conversion problems are reported as notices, not errors.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, PipelineFailure> {
        let request_id = RequestId::new();
        let span = info_span!("generate", request_id = %request_id);
        self.run_generate(request_id, request).instrument(span).await
    }

    async fn run_generate(
        &self,
        request_id: RequestId,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, PipelineFailure> {
        let mut tracker = StageTracker::new(self.observer.as_ref());

        tracker.enter(PipelineStage::ExtractingText);
        let (package, evidence) = match self.read_inputs(&request).await {
            Ok(inputs) => inputs,
            Err(e) => return Err(tracker.fail(e)),
        };
        let template_text = package.text();
        if template_text.trim().is_empty() {
            warn!("Template has no text; the model will only see the extracted data");
        }

        tracker.enter(PipelineStage::ExtractingFields);
        let extracted = match self.extract_fields(&evidence).await {
            Ok(data) => data,
            Err(e) => return Err(tracker.fail(e)),
        };
        let unverified = check_grounding(&extracted, &evidence.text);

        tracker.enter(PipelineStage::FillingTemplate);
        let filler = TemplateFiller::shared(self.llm.clone(), self.config.clone());
        let report_text = match filler.fill(&template_text, &extracted).await {
            Ok(text) => text,
            Err(e) => return Err(tracker.fail(e)),
        };
        let unresolved = unresolved_placeholders(&report_text);

        tracker.enter(PipelineStage::Assembling);
        let docx = match assemble_docx(&package, &report_text) {
            Ok(bytes) => bytes,
            Err(e) => return Err(tracker.fail(GlrError::Assembly(e.to_string()))),
        };
        let mut report = GeneratedReport::new(docx);
        if request.want_pdf {
            self.attach_pdf(&mut report).await;
        }

        tracker.enter(PipelineStage::Done);
        info!(
            "Report ready: {} byte docx, pdf {}",
            report.docx.len(),
            if report.pdf.is_some() { "included" } else { "not included" }
        );

        Ok(GenerationOutcome {
            request_id,
            report,
            extracted,
            unverified,
            unresolved,
            stages: tracker.history,
        })
    }

    /// Run text and field extraction only
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFailure`] naming the stage that failed.
    pub async fn extract_only(&self, evidence: &[UploadedDocument]) -> Result<ExtractionOutcome, PipelineFailure> {
        let span = info_span!("extract", request_id = %RequestId::new());
        async {
            let mut tracker = StageTracker::new(self.observer.as_ref());

            tracker.enter(PipelineStage::ExtractingText);
            let text = match self.read_evidence(evidence).await {
                Ok(text) => text,
                Err(e) => return Err(tracker.fail(e)),
            };

            tracker.enter(PipelineStage::ExtractingFields);
            let extracted = match self.extract_fields(&text).await {
                Ok(data) => data,
                Err(e) => return Err(tracker.fail(e)),
            };
            let unverified = check_grounding(&extracted, &text.text);

            Ok(ExtractionOutcome {
                extracted,
                unverified,
                pages: text.pages,
                pages_with_text: text.pages_with_text,
            })
        }
        .instrument(span)
        .await
    }

    async fn read_inputs(&self, request: &GenerationRequest) -> Result<(DocxPackage, EvidenceText), GlrError> {
        let template = request
            .template
            .as_ref()
            .ok_or_else(|| GlrError::FileRead("No template provided".to_string()))?;
        if template.kind() != DocumentKind::Docx {
            warn!("Template '{}' does not have a .docx extension", template.name);
        }
        let package = DocxPackage::open(template)?;

        let evidence = self.read_evidence(&request.evidence).await?;
        Ok((package, evidence))
    }

    async fn read_evidence(&self, evidence: &[UploadedDocument]) -> Result<EvidenceText, GlrError> {
        if evidence.iter().all(UploadedDocument::is_empty) {
            return Err(GlrError::FileRead("No evidence PDFs provided".to_string()));
        }

        let docs = evidence.to_vec();
        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&docs))
            .await
            .map_err(|e| GlrError::FileRead(format!("Text extraction task failed: {}", e)))??;
        Ok(text)
    }

    async fn extract_fields(&self, evidence: &EvidenceText) -> Result<ExtractedData, GlrError> {
        if !evidence.has_content() {
            warn!(
                "No text layer in {} page(s) of evidence; skipping field extraction",
                evidence.pages
            );
            return Ok(ExtractedData::not_found());
        }

        let extractor = LlmFieldExtractor::shared(self.llm.clone(), self.config.clone());
        extractor.extract(&evidence.text, &ExtractionField::ALL).await
    }

    async fn attach_pdf(&self, report: &mut GeneratedReport) {
        if !self.converter.is_available() {
            info!("PDF conversion unavailable on this host");
            report.notices.push(ReportNotice::PdfConversionUnavailable);
            return;
        }

        let converter = self.converter.clone();
        let docx = report.docx.clone();
        let converted = tokio::task::spawn_blocking(move || converter.convert(&docx).map_err(|e| e.to_string()))
            .await
            .unwrap_or_else(|e| Err(format!("conversion task failed: {}", e)));

        match converted {
            Ok(pdf) => report.pdf = Some(pdf),
            Err(reason) => {
                warn!("PDF conversion failed: {}", reason);
                report.notices.push(ReportNotice::PdfConversionFailed(reason));
            }
        }
    }
}

fn check_grounding(data: &ExtractedData, source: &str) -> Vec<ExtractionField> {
    let unverified = unverified_fields(data, source);
    for field in &unverified {
        warn!("{} value does not appear verbatim in the evidence", field);
    }
    unverified
}
