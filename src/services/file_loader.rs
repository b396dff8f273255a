// File Loader Service
// Extracts plain text from .txt/.md, .docx and .pdf inputs

use regex::Regex;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

const DOCX_DOCUMENT_PART: &str = "word/document.xml";

#[derive(Error, Debug)]
pub enum FileLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8 text")]
    InvalidUtf8 { path: String },
    #[error("Failed to open docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Docx archive has no word/document.xml part")]
    MissingDocumentPart,
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

static PARAGRAPH_END_RE: OnceLock<Regex> = OnceLock::new();
static TAB_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

/// Load a file as text, choosing the extractor by extension
pub fn load_text_file(path: &Path) -> Result<String, FileLoadError> {
    let bytes = fs::read(path).map_err(|source| FileLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    debug!(path = %path.display(), ext = %ext, bytes = bytes.len(), "file_loader.read");

    match ext.as_str() {
        "docx" => extract_docx_text(&bytes),
        "pdf" => pdf_extract::extract_text_from_mem(&bytes).map_err(|e| FileLoadError::Pdf(e.to_string())),
        _ => String::from_utf8(bytes).map_err(|_| FileLoadError::InvalidUtf8 {
            path: path.display().to_string(),
        }),
    }
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, FileLoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut part = match archive.by_name(DOCX_DOCUMENT_PART) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Err(FileLoadError::MissingDocumentPart),
        Err(e) => return Err(e.into()),
    };

    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|source| FileLoadError::Io {
        path: DOCX_DOCUMENT_PART.to_string(),
        source,
    })?;
    Ok(docx_xml_to_text(&xml))
}

/// Flatten WordprocessingML to text: paragraphs become lines, tabs become spaces
pub fn docx_xml_to_text(xml: &str) -> String {
    let paragraph_end = PARAGRAPH_END_RE
        .get_or_init(|| Regex::new(r"</w:p>").expect("paragraph pattern is valid"));
    let tab = TAB_RE.get_or_init(|| Regex::new(r"<w:(tab|br)\s*/>").expect("tab pattern is valid"));
    let tag = TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

    let s = paragraph_end.replace_all(xml, "\n");
    let s = tab.replace_all(&s, " ");
    let s = tag.replace_all(&s, "");
    let text = unescape_xml(&s);

    text.lines()
        .map(str::trim)
        .filter(|ln| !ln.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_docx_xml_to_text() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Hello</w:t></w:r><w:tab/><w:r><w:t>world &amp; friends</w:t></w:r></w:p><w:p><w:r><w:t xml:space="preserve">Second line.</w:t></w:r></w:p><w:p></w:p></w:body></w:document>"#;
        assert_eq!(docx_xml_to_text(xml), "Hello world & friends\nSecond line.");
    }

    #[test]
    fn test_unescape_amp_last() {
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_load_plain_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all("Plain text input.".as_bytes()).unwrap();
        assert_eq!(load_text_file(file.path()).unwrap(), "Plain text input.");
    }

    #[test]
    fn test_rejects_binary_as_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(matches!(
            load_text_file(file.path()),
            Err(FileLoadError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_text_file(Path::new("/nonexistent/input.txt")),
            Err(FileLoadError::Io { .. })
        ));
    }

    #[test]
    fn test_corrupt_docx() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"definitely not a zip").unwrap();
        assert!(matches!(load_text_file(file.path()), Err(FileLoadError::Archive(_))));
    }
}
