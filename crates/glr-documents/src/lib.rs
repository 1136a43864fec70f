//! GLR Documents
//!
//! File-format plumbing for the report generator.
//!
//! # Overview
//!
//! ```text
//! PDFs ──► pdf_text ──► combined evidence text
//! DOCX ──► docx ──────► template text + package parts
//! text + package ──► assemble ──► filled .docx ──► convert ──► .pdf (optional)
//! ```
//!
//! Only embedded text layers are read; scanned pages come back empty.

#![warn(missing_docs)]

mod assemble;
mod convert;
mod docx;
mod error;
mod pdf_text;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use assemble::{assemble_docx, layout_paragraphs};
pub use convert::{NoPdfConversion, WordAutomation};
pub use docx::DocxPackage;
pub use error::DocumentError;
pub use pdf_text::{extract_pdf_text, page_header, EvidenceText};
