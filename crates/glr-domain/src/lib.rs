//! GLR Domain Layer
//!
//! Core vocabulary for the General Loss Report generator. This crate defines
//! the fixed extraction field list, the extracted-data mapping, the documents
//! that flow through a request, the per-request stage machine and the trait
//! seams behind which the hosted model and PDF conversion live.
//!
//! ## Key Concepts
//!
//! - **ExtractionField**: one named data point from the fixed field list
//! - **ExtractedData**: a complete mapping from every field to a value or `NotFound`
//! - **UploadedDocument**: an input blob (template or evidence) plus its file name
//! - **GeneratedReport**: the filled docx, an optional pdf, and user-facing notices
//! - **PipelineStage**: Idle → ExtractingText → ExtractingFields → FillingTemplate → Assembling → Done
//!
//! ## Architecture
//!
//! - No I/O and no network code
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod extracted;
pub mod field;
pub mod request;
pub mod stage;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentKind, GeneratedReport, ReportNotice, UploadedDocument};
pub use extracted::{ExtractedData, FieldValue};
pub use field::ExtractionField;
pub use request::RequestId;
pub use stage::PipelineStage;
