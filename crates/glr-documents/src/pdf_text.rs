//! Embedded text-layer extraction from PDF evidence

use crate::error::DocumentError;
use glr_domain::UploadedDocument;
use lopdf::Document;
use tracing::{debug, info, warn};

/// Combined text of all evidence PDFs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvidenceText {
    /// Page bodies with a boundary header before each page
    pub text: String,

    /// Number of documents that were read
    pub documents: usize,

    /// Total pages across all documents
    pub pages: usize,

    /// Pages whose text layer produced anything
    pub pages_with_text: usize,
}

impl EvidenceText {
    /// Whether any page produced text; headers alone do not count
    pub fn has_content(&self) -> bool {
        self.pages_with_text > 0
    }
}

/// Boundary header placed before each page's text
pub fn page_header(document_name: &str, page_number: u32) -> String {
    format!("=== REPORT: {} | PAGE {} ===", document_name, page_number)
}

/// Extract the text layer of every page of every PDF, in order
///
/// Zero-byte uploads are skipped. A page whose text layer cannot be decoded
/// contributes an empty body.
///
/// # Errors
///
/// Returns [`DocumentError::InvalidPdf`] naming the first blob that cannot be
/// parsed as a PDF.
pub fn extract_pdf_text(pdfs: &[UploadedDocument]) -> Result<EvidenceText, DocumentError> {
    let mut chunks = Vec::new();
    let mut evidence = EvidenceText::default();

    for pdf in pdfs {
        if pdf.is_empty() {
            warn!("Skipping empty upload '{}'", pdf.name);
            continue;
        }

        let doc = Document::load_mem(&pdf.bytes).map_err(|e| DocumentError::InvalidPdf {
            name: pdf.name.clone(),
            reason: e.to_string(),
        })?;

        let pages = doc.get_pages();
        debug!("'{}' has {} pages", pdf.name, pages.len());

        for (page_number, _page_id) in pages {
            let body = match doc.extract_text(&[page_number]) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!(
                        "No readable text layer on '{}' page {}: {}",
                        pdf.name, page_number, e
                    );
                    String::new()
                }
            };

            evidence.pages += 1;
            if !body.is_empty() {
                evidence.pages_with_text += 1;
            }
            chunks.push(format!("\n\n{}\n{}", page_header(&pdf.name, page_number), body));
        }
        evidence.documents += 1;
    }

    evidence.text = chunks.join("\n").trim().to_string();

    info!(
        "Read {} document(s), {} page(s), {} with text",
        evidence.documents, evidence.pages, evidence.pages_with_text
    );

    Ok(evidence)
}

#[cfg(test)]
mod tests {
    use crate::testing::sample_pdf;
    use super::*;

    #[test]
    fn test_single_document_pages_in_order() {
        let pdf = UploadedDocument::new("field.pdf", sample_pdf(&["Insured Jane Doe", "Loss 01/02/2024"]));
        let evidence = extract_pdf_text(&[pdf]).unwrap();

        assert_eq!(evidence.documents, 1);
        assert_eq!(evidence.pages, 2);
        assert_eq!(evidence.pages_with_text, 2);

        let first = evidence.text.find("=== REPORT: field.pdf | PAGE 1 ===").unwrap();
        let second = evidence.text.find("=== REPORT: field.pdf | PAGE 2 ===").unwrap();
        let name = evidence.text.find("Jane Doe").unwrap();
        let date = evidence.text.find("01/02/2024").unwrap();
        assert!(first < name && name < second && second < date);
        assert!(evidence.text.starts_with("=== REPORT"));
    }

    #[test]
    fn test_documents_concatenated_in_order() {
        let a = UploadedDocument::new("a.pdf", sample_pdf(&["alpha"]));
        let b = UploadedDocument::new("b.pdf", sample_pdf(&["bravo"]));
        let evidence = extract_pdf_text(&[a, b]).unwrap();

        let a_pos = evidence.text.find("REPORT: a.pdf").unwrap();
        let b_pos = evidence.text.find("REPORT: b.pdf").unwrap();
        assert!(a_pos < b_pos);
        assert_eq!(evidence.documents, 2);
    }

    #[test]
    fn test_image_only_pages_have_no_content() {
        let pdf = UploadedDocument::new("scan.pdf", sample_pdf(&["", ""]));
        let evidence = extract_pdf_text(&[pdf]).unwrap();

        assert_eq!(evidence.pages, 2);
        assert_eq!(evidence.pages_with_text, 0);
        assert!(!evidence.has_content());
        assert!(evidence.text.contains("PAGE 2"));
    }

    #[test]
    fn test_empty_upload_skipped() {
        let empty = UploadedDocument::new("empty.pdf", Vec::new());
        let evidence = extract_pdf_text(&[empty]).unwrap();
        assert_eq!(evidence.documents, 0);
        assert!(evidence.text.is_empty());
    }

    #[test]
    fn test_not_a_pdf_names_file() {
        let junk = UploadedDocument::new("notes.pdf", b"definitely not a pdf".to_vec());
        let err = extract_pdf_text(&[junk]).unwrap_err();
        match err {
            DocumentError::InvalidPdf { name, .. } => assert_eq!(name, "notes.pdf"),
            other => panic!("Expected InvalidPdf, got {:?}", other),
        }
    }
}
