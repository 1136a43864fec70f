//! Documents flowing through a generation request

use std::fmt;

/// Kind of an uploaded document, judged by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// PDF evidence file
    Pdf,
    /// Word template
    Docx,
    /// Anything else
    Other,
}

impl DocumentKind {
    /// Classify a file name by its extension
    pub fn from_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Other,
        }
    }
}

/// An input blob plus the name it was supplied under
///
/// Held only for the duration of one request.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// File name as supplied by the user
    pub name: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Create a new document
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Kind inferred from the file name
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_name(&self.name)
    }

    /// Whether the blob has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Non-fatal message attached to a finished report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportNotice {
    /// PDF output was requested but this host cannot convert documents
    PdfConversionUnavailable,

    /// PDF conversion was attempted and failed; the docx is still delivered
    PdfConversionFailed(String),
}

impl fmt::Display for ReportNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportNotice::PdfConversionUnavailable => {
                write!(f, "PDF conversion is not available on this host; only the .docx was produced")
            }
            ReportNotice::PdfConversionFailed(reason) => {
                write!(f, "PDF conversion failed: {}", reason)
            }
        }
    }
}

/// The filled report handed back to the shell
#[derive(Clone, PartialEq, Eq, Default)]
pub struct GeneratedReport {
    /// Filled Word document
    pub docx: Vec<u8>,

    /// PDF rendering, when conversion ran
    pub pdf: Option<Vec<u8>>,

    /// Degraded-feature notices
    pub notices: Vec<ReportNotice>,
}

impl GeneratedReport {
    /// File name used for the Word output
    pub const DOCX_NAME: &'static str = "Completed_GLR.docx";

    /// File name used for the PDF output
    pub const PDF_NAME: &'static str = "Completed_GLR.pdf";

    /// A report holding only the docx
    pub fn new(docx: Vec<u8>) -> Self {
        Self {
            docx,
            pdf: None,
            notices: Vec::new(),
        }
    }
}

impl fmt::Debug for GeneratedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedReport")
            .field("docx_len", &self.docx.len())
            .field("pdf_len", &self.pdf.as_ref().map(Vec::len))
            .field("notices", &self.notices)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(DocumentKind::from_name("report.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_name("GLR template.docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_name("notes.txt"), DocumentKind::Other);
        assert_eq!(DocumentKind::from_name("no_extension"), DocumentKind::Other);
    }

    #[test]
    fn test_debug_hides_bytes() {
        let doc = UploadedDocument::new("a.pdf", vec![1, 2, 3]);
        let rendered = format!("{:?}", doc);
        assert!(rendered.contains("len: 3"));
        assert!(!rendered.contains("[1, 2, 3]"));
    }

    #[test]
    fn test_notice_display() {
        let notice = ReportNotice::PdfConversionFailed("Word not responding".into());
        assert_eq!(notice.to_string(), "PDF conversion failed: Word not responding");
    }
}
