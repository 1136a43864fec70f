//! Request and result types for the report pipeline

use glr_domain::{ExtractedData, ExtractionField, GeneratedReport, PipelineStage, RequestId, UploadedDocument};

/// Request to generate one report
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// The `.docx` template; `None` when the user supplied none
    pub template: Option<UploadedDocument>,

    /// PDF evidence, in the order it should be read
    pub evidence: Vec<UploadedDocument>,

    /// Also produce a PDF when the host can convert one
    pub want_pdf: bool,
}

impl GenerationRequest {
    /// Create a request for a template and its evidence
    pub fn new(template: UploadedDocument, evidence: Vec<UploadedDocument>) -> Self {
        Self {
            template: Some(template),
            evidence,
            want_pdf: false,
        }
    }

    /// Ask for a PDF alongside the docx
    pub fn with_pdf(mut self, want_pdf: bool) -> Self {
        self.want_pdf = want_pdf;
        self
    }
}

/// Result of a successful generation
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Correlation id used in the log for this request
    pub request_id: RequestId,

    /// The filled documents and any notices
    pub report: GeneratedReport,

    /// Values extracted from the evidence
    pub extracted: ExtractedData,

    /// Found values that do not appear verbatim in the evidence text
    pub unverified: Vec<ExtractionField>,

    /// Placeholders still present in the final report text
    pub unresolved: Vec<ExtractionField>,

    /// Every stage the request passed through, starting at `Idle`
    pub stages: Vec<PipelineStage>,
}

/// Result of running text and field extraction only
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Values extracted from the evidence
    pub extracted: ExtractedData,

    /// Found values that do not appear verbatim in the evidence text
    pub unverified: Vec<ExtractionField>,

    /// Total evidence pages read
    pub pages: usize,

    /// Evidence pages that had a text layer
    pub pages_with_text: usize,
}
