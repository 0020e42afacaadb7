//! DOCX paragraph extraction — manual ZIP + XML walk over `word/document.xml`.
//!
//! A DOCX file is a ZIP archive; the body text lives in `w:p` (paragraph) elements whose
//! runs carry `w:t` text nodes. Paragraphs are returned in document order, including
//! paragraphs inside table cells.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

const DOCUMENT_XML: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Extracts the text of every paragraph of a DOCX file, in document order.
pub fn extract_docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let xml = {
        let mut document_xml = archive.by_name(DOCUMENT_XML)?;
        let mut content = String::new();
        document_xml.read_to_string(&mut content)?;
        content
    };

    paragraphs_from_xml(&xml)
}

/// Walks `word/document.xml` content and collects paragraph texts.
///
/// `w:tab` becomes `\t`; `w:br` and `w:cr` become `\n`. Nested paragraphs (text boxes)
/// are emitted before the paragraph that contains them.
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_char(&mut open, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut open, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape()?;
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(open: &mut [String], c: char) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push(c);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Builds a minimal DOCX archive with one `w:p` per paragraph.
    pub(crate) fn make_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_XML, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_in_document_order() {
        let docx = make_docx(&["Jane Doe", "Senior Rust Engineer", "Distributed systems"]);
        let paragraphs = extract_docx_paragraphs(&docx).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Jane Doe", "Senior Rust Engineer", "Distributed systems"]
        );
    }

    #[test]
    fn test_runs_within_paragraph_are_concatenated() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Back</w:t></w:r><w:r><w:t>end</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), vec!["Backend"]);
    }

    #[test]
    fn test_empty_paragraph_is_kept() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>One</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Two</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), vec!["One", "", "Two"]);
    }

    #[test]
    fn test_tab_and_break_elements() {
        let xml = r#"<w:p><w:r><w:t>Rust</w:t><w:tab/><w:t>Go</w:t><w:br/><w:t>SQL</w:t></w:r></w:p>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), vec!["Rust\tGo\nSQL"]);
    }

    #[test]
    fn test_escaped_entities_are_decoded() {
        let xml = r#"<w:p><w:r><w:t>R&amp;D &lt;team&gt;</w:t></w:r></w:p>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), vec!["R&D <team>"]);
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let xml = r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr>  <w:r><w:t>Title</w:t></w:r></w:p>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), vec!["Title"]);
    }

    #[test]
    fn test_not_a_zip_archive_fails() {
        let err = extract_docx_paragraphs(b"plain bytes, not a zip").unwrap_err();
        assert!(matches!(err, DocxError::Archive(_)));
    }

    #[test]
    fn test_archive_without_document_xml_fails() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(extract_docx_paragraphs(&bytes).is_err());
    }
}
