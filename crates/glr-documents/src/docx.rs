//! DOCX package reading

use crate::error::DocumentError;
use glr_domain::UploadedDocument;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// Path of the main document part
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";

pub(crate) const BLANK_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const BLANK_ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const BLANK_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body><w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// An opened `.docx` package: every zip part, in archive order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxPackage {
    parts: Vec<(String, Vec<u8>)>,
    text: String,
}

impl DocxPackage {
    /// Open an uploaded blob as a docx package
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidDocx`] if the blob is not a zip archive,
    /// has no `word/document.xml`, or that part is not well-formed UTF-8 XML.
    pub fn open(doc: &UploadedDocument) -> Result<Self, DocumentError> {
        let invalid = |reason: String| DocumentError::InvalidDocx {
            name: doc.name.clone(),
            reason,
        };

        let mut archive = zip::ZipArchive::new(Cursor::new(doc.bytes.as_slice()))
            .map_err(|e| invalid(format!("not a valid .docx (zip) file: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for idx in 0..archive.len() {
            let mut entry = archive
                .by_index(idx)
                .map_err(|e| invalid(format!("unreadable zip entry {}: {}", idx, e)))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| invalid(format!("unreadable part '{}': {}", name, e)))?;
            parts.push((name, data));
        }

        let xml = match parts.iter().find(|(name, _)| name == DOCUMENT_PART) {
            None => return Err(invalid(format!("missing {}", DOCUMENT_PART))),
            Some((_, bytes)) => std::str::from_utf8(bytes)
                .map_err(|_| invalid(format!("{} is not UTF-8", DOCUMENT_PART)))?,
        };
        let text = flatten_body(xml).map_err(|e| invalid(format!("malformed {}: {}", DOCUMENT_PART, e)))?;

        Ok(Self { parts, text })
    }

    /// A minimal package with an empty body and US Letter page setup
    pub fn blank() -> Self {
        Self {
            parts: vec![
                ("[Content_Types].xml".to_string(), BLANK_CONTENT_TYPES.as_bytes().to_vec()),
                ("_rels/.rels".to_string(), BLANK_ROOT_RELS.as_bytes().to_vec()),
                (DOCUMENT_PART.to_string(), BLANK_DOCUMENT.as_bytes().to_vec()),
            ],
            text: String::new(),
        }
    }

    /// Raw bytes of a part
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, data)| data.as_slice())
    }

    /// All parts in archive order
    pub fn parts(&self) -> &[(String, Vec<u8>)] {
        &self.parts
    }

    /// The main document XML
    pub fn document_xml(&self) -> &str {
        self.part(DOCUMENT_PART)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }

    /// The document flattened into plain text
    ///
    /// Non-blank body paragraphs come first, in order, followed by the
    /// trimmed text of every non-blank table cell.
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

fn flatten_body(xml: &str) -> Result<String, quick_xml::Error> {
    let (paragraphs, cells) = read_body(xml)?;
    Ok(paragraphs.into_iter().chain(cells).collect::<Vec<_>>().join("\n"))
}

fn local_name(q: &[u8]) -> &[u8] {
    match q.iter().position(|&b| b == b':') {
        Some(i) => &q[i + 1..],
        None => q,
    }
}

fn is_run_break(e: &BytesStart<'_>) -> bool {
    matches!(local_name(e.name().as_ref()), b"br" | b"cr")
}

/// Walk document.xml collecting body paragraphs and table-cell text
fn read_body(xml: &str) -> Result<(Vec<String>, Vec<String>), quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    reader.check_end_names(true);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut cells = Vec::new();
    let mut cell_stack: Vec<Vec<String>> = Vec::new();
    let mut table_depth = 0usize;
    let mut cur_text = String::new();
    let mut in_t = false;
    let mut in_run = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"tbl" => table_depth += 1,
                b"tc" => cell_stack.push(Vec::new()),
                b"p" => cur_text.clear(),
                b"r" => in_run = true,
                b"t" => in_t = true,
                _ => {}
            },
            Event::Empty(e) => {
                if in_run {
                    if is_run_break(&e) {
                        cur_text.push('\n');
                    } else if local_name(e.name().as_ref()) == b"tab" {
                        cur_text.push('\t');
                    }
                }
            }
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"tc" => {
                    if let Some(cell) = cell_stack.pop() {
                        let text = cell.join("\n").trim().to_string();
                        if !text.is_empty() {
                            cells.push(text);
                        }
                    }
                }
                b"p" => {
                    let text = std::mem::take(&mut cur_text);
                    if table_depth == 0 {
                        if !text.trim().is_empty() {
                            paragraphs.push(text);
                        }
                    } else if let Some(cell) = cell_stack.last_mut() {
                        cell.push(text);
                    }
                }
                b"r" => in_run = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Text(t) => {
                if in_t {
                    cur_text.push_str(&t.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((paragraphs, cells))
}
