//! Serialize rewritten report text back into the template's docx package

use crate::docx::{DocxPackage, DOCUMENT_PART};
use crate::error::DocumentError;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const DEFAULT_ROOT: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#;

/// Split report text into paragraph lines
///
/// Blocks are separated by blank lines (`\n\n`). Blocks holding only
/// whitespace are dropped. Each line of a kept block becomes a paragraph and
/// every block is followed by one empty paragraph. Characters XML 1.0 cannot
/// carry (C0 controls other than tab, `U+FFFE`, `U+FFFF`) become spaces.
pub fn layout_paragraphs(text: &str) -> Vec<String> {
    let text = xml_safe(text);
    let mut paragraphs = Vec::new();
    for block in text.split("\n\n") {
        let lines: Vec<&str> = block.split('\n').collect();
        if lines.iter().all(|line| line.trim().is_empty()) {
            continue;
        }
        paragraphs.extend(lines.into_iter().map(|line| line.trim_end_matches('\r').to_string()));
        paragraphs.push(String::new());
    }
    paragraphs
}

/// Build a filled `.docx` from the template package and the report text
///
/// Every template part except `word/document.xml` is copied unchanged and in
/// the same order, so styles, numbering, headers, footers and relationships
/// survive. The body is replaced by the laid-out report paragraphs and keeps
/// the template's final section properties (page size, margins, header and
/// footer references). Zip timestamps are fixed, so equal inputs give equal
/// bytes.
///
/// # Errors
///
/// Returns [`DocumentError::Write`] if the zip stream cannot be written.
pub fn assemble_docx(template: &DocxPackage, text: &str) -> Result<Vec<u8>, DocumentError> {
    let paragraphs = layout_paragraphs(text);
    let document = render_document(template.document_xml(), &paragraphs);
    debug!("Assembling docx with {} paragraphs", paragraphs.len());

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in template.parts() {
        writer.start_file(name.as_str(), options)?;
        if name == DOCUMENT_PART {
            writer.write_all(document.as_bytes())?;
        } else {
            writer.write_all(data)?;
        }
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

fn xml_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => c,
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => ' ',
            _ => c,
        })
        .collect()
}

fn render_document(template_xml: &str, paragraphs: &[String]) -> String {
    let root = root_start_tag(template_xml).unwrap_or(DEFAULT_ROOT);
    let section = body_section_properties(template_xml).unwrap_or("");

    let mut xml = String::with_capacity(paragraphs.iter().map(|p| p.len() + 64).sum::<usize>() + 512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(root);
    xml.push_str("<w:body>");
    for paragraph in paragraphs {
        if paragraph.is_empty() {
            xml.push_str("<w:p/>");
        } else {
            xml.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
            xml.push_str(&escape(paragraph.as_str()));
            xml.push_str("</w:t></w:r></w:p>");
        }
    }
    xml.push_str(section);
    xml.push_str("</w:body></w:document>");
    xml
}

/// The template's `<w:document ...>` start tag, carrying its namespace declarations
fn root_start_tag(xml: &str) -> Option<&str> {
    let start = xml.find("<w:document")?;
    let end = xml[start..].find('>')?;
    Some(&xml[start..start + end + 1])
}

/// The `<w:sectPr>` that closes the body, if the template has one
///
/// Only a section after the last block-level element counts; a `sectPr`
/// nested in a paragraph's properties belongs to that paragraph. Other
/// markup between the last block and the section (bookmarks, comments) is
/// skipped.
fn body_section_properties(xml: &str) -> Option<&str> {
    let body_end = xml.rfind("</w:body>")?;
    let before = &xml[..body_end];

    let after_blocks = ["</w:p>", "<w:p/>", "</w:tbl>", "</w:sdt>", "<w:body>"]
        .iter()
        .filter_map(|marker| before.rfind(marker).map(|pos| pos + marker.len()))
        .max()?;

    let tail = &before[after_blocks..];
    let start = tail
        .match_indices("<w:sectPr")
        .map(|(pos, _)| pos)
        .find(|&pos| matches!(tail.as_bytes().get(pos + "<w:sectPr".len()), Some(b' ' | b'>' | b'/')))?;

    let section = &tail[start..];
    if let Some(close) = section.find("</w:sectPr>") {
        return Some(&section[..close + "</w:sectPr>".len()]);
    }
    let tag_end = section.find('>')?;
    if section[..tag_end].ends_with('/') {
        Some(&section[..=tag_end])
    } else {
        None
    }
}
