//! Error types for document handling

use thiserror::Error;

/// Errors that can occur reading, writing or converting documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Blob could not be parsed as a PDF
    #[error("Could not read PDF '{name}': {reason}")]
    InvalidPdf {
        /// File name
        name: String,
        /// Parser message
        reason: String,
    },

    /// Blob could not be parsed as a DOCX package
    #[error("Could not read DOCX '{name}': {reason}")]
    InvalidDocx {
        /// File name
        name: String,
        /// Parser message
        reason: String,
    },

    /// Writing the output package failed
    #[error("Failed to write document: {0}")]
    Write(String),

    /// PDF conversion failed or is unavailable
    #[error("PDF conversion error: {0}")]
    Conversion(String),
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(e: zip::result::ZipError) -> Self {
        DocumentError::Write(e.to_string())
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Write(e.to_string())
    }
}
