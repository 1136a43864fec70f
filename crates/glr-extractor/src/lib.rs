//! GLR Extractor
//!
//! Turns a `.docx` template and PDF evidence into a completed General Loss
//! Report using a hosted reasoning model.
//!
//! # Architecture
//!
//! ```text
//! PDFs → text → model call #1 → ExtractedData ─┐
//! template.docx → template text ───────────────┴→ model call #2 → report text → Completed_GLR.docx
//! ```
//!
//! Each request walks the stages Idle → ExtractingText → ExtractingFields →
//! FillingTemplate → Assembling → Done. An error moves it to Failed and the
//! returned [`PipelineFailure`] names the stage.
//!
//! # Example Usage
//!
//! ```no_run
//! use glr_documents::NoPdfConversion;
//! use glr_domain::UploadedDocument;
//! use glr_extractor::{GenerationRequest, Pipeline, PipelineConfig};
//! use glr_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(MockProvider::default(), NoPdfConversion, PipelineConfig::default());
//!
//! let request = GenerationRequest::new(
//!     UploadedDocument::new("template.docx", std::fs::read("template.docx")?),
//!     vec![UploadedDocument::new("inspection.pdf", std::fs::read("inspection.pdf")?)],
//! );
//!
//! let outcome = pipeline.generate(request).await?;
//! std::fs::write("Completed_GLR.docx", &outcome.report.docx)?;
//! println!("Found {} fields", outcome.extracted.found_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod filler;
mod parser;
mod pipeline;
mod prompt;
mod types;


pub use config::PipelineConfig;
pub use error::{GlrError, PipelineFailure};
pub use extractor::LlmFieldExtractor;
pub use filler::{substitute_placeholders, unresolved_placeholders, TemplateFiller};
pub use parser::{parse_extraction_response, unverified_fields};
pub use pipeline::Pipeline;
pub use prompt::{data_to_json, ExtractionPromptBuilder, ReportPromptBuilder};
pub use types::{ExtractionOutcome, GenerationOutcome, GenerationRequest};
