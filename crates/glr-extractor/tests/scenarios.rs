//! End-to-end request scenarios through the public API

use glr_documents::testing::sample_pdf;
use glr_documents::{assemble_docx, DocxPackage, NoPdfConversion};
use glr_domain::{ExtractionField, PipelineStage, ReportNotice, UploadedDocument};
use glr_extractor::{GenerationRequest, GlrError, Pipeline, PipelineConfig};
use glr_llm::MockProvider;

fn pdf(name: &str, text: Option<&str>) -> UploadedDocument {
    UploadedDocument::new(name, sample_pdf(&[text.unwrap_or("")]))
}

fn template() -> UploadedDocument {
    let bytes = assemble_docx(
        &DocxPackage::blank(),
        "GENERAL LOSS REPORT\nInsured: [INSURED_NAME]\nDate of loss: [DATE_LOSS]",
    )
    .unwrap();
    UploadedDocument::new("template.docx", bytes)
}

fn deterministic_llm() -> MockProvider {
    let mut llm = MockProvider::new("unexpected request");
    llm.add_response(
        "extraction engine",
        r#"{"INSURED_NAME": "Maria O'Neil", "DATE_LOSS": "03/14/2024"}"#,
    );
    llm.add_response(
        "field adjuster",
        "GENERAL LOSS REPORT\n\nInsured: Maria O'Neil\nDate of loss: 03/14/2024\n\nRoof & gutters <wind> damage.",
    );
    llm
}

fn evidence() -> Vec<UploadedDocument> {
    vec![pdf("fnol.pdf", Some("Insured Maria O'Neil, loss 03/14/2024"))]
}

#[tokio::test]
async fn no_template_fails_before_any_model_call() {
    let llm = deterministic_llm();
    let pipeline = Pipeline::new(llm.clone(), NoPdfConversion, PipelineConfig::default());

    let request = GenerationRequest {
        template: None,
        evidence: evidence(),
        want_pdf: false,
    };
    let failure = pipeline.generate(request).await.unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ExtractingText);
    assert!(matches!(failure.error, GlrError::FileRead(_)));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn no_evidence_fails_before_any_model_call() {
    let llm = deterministic_llm();
    let pipeline = Pipeline::new(llm.clone(), NoPdfConversion, PipelineConfig::default());

    let failure = pipeline
        .generate(GenerationRequest::new(template(), Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(failure.error, GlrError::FileRead(_)));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn scanned_pdf_yields_all_not_found() {
    let mut llm = MockProvider::new("unexpected request");
    llm.add_response("field adjuster", "GENERAL LOSS REPORT\n\nInsured: [INSURED_NAME]");
    let pipeline = Pipeline::new(llm.clone(), NoPdfConversion, PipelineConfig::default());

    let request = GenerationRequest::new(template(), vec![pdf("scan.pdf", None)]);
    let outcome = pipeline.generate(request).await.unwrap();

    // Only the template rewrite reaches the model
    assert_eq!(llm.call_count(), 1);
    assert_eq!(outcome.extracted.len(), ExtractionField::ALL.len());
    assert_eq!(outcome.extracted.found_count(), 0);
    assert_eq!(outcome.unresolved, vec![ExtractionField::InsuredName]);
}

#[tokio::test]
async fn identical_inputs_give_identical_docx() {
    let config = PipelineConfig::deterministic();
    let first = Pipeline::new(deterministic_llm(), NoPdfConversion, config.clone())
        .generate(GenerationRequest::new(template(), evidence()))
        .await
        .unwrap();
    let second = Pipeline::new(deterministic_llm(), NoPdfConversion, config)
        .generate(GenerationRequest::new(template(), evidence()))
        .await
        .unwrap();

    assert_eq!(first.report.docx, second.report.docx);
}

#[tokio::test]
async fn substituted_literals_survive_assembly() {
    let pipeline = Pipeline::new(deterministic_llm(), NoPdfConversion, PipelineConfig::default());
    let outcome = pipeline
        .generate(GenerationRequest::new(template(), evidence()))
        .await
        .unwrap();

    let reopened = DocxPackage::open(&UploadedDocument::new("Completed_GLR.docx", outcome.report.docx)).unwrap();
    let text = reopened.text();
    for (_, value) in outcome.extracted.found() {
        assert!(text.contains(value), "'{}' missing from report", value);
    }
    assert!(text.contains("Roof & gutters <wind> damage."));
}

#[tokio::test]
async fn pdf_unavailable_is_a_notice_not_an_error() {
    let pipeline = Pipeline::new(deterministic_llm(), NoPdfConversion, PipelineConfig::default());
    assert!(!pipeline.can_convert_pdf());

    let outcome = pipeline
        .generate(GenerationRequest::new(template(), evidence()).with_pdf(true))
        .await
        .unwrap();

    assert!(!outcome.report.docx.is_empty());
    assert!(outcome.report.pdf.is_none());
    assert_eq!(outcome.report.notices, vec![ReportNotice::PdfConversionUnavailable]);
}
