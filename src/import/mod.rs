//! Loading a document into the input box.
//!
//! Plain text and PDF are accepted. The type comes from the extension, with
//! the `%PDF` magic bytes as a fallback for extensionless files.

use std::path::{Path, PathBuf};

use lopdf::Document;
use thiserror::Error;

pub const UNSUPPORTED_MESSAGE: &str = "❌ Only .txt and .pdf files are supported.";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{UNSUPPORTED_MESSAGE}")]
    Unsupported { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Pdf,
}

/// Check if bytes start with the PDF magic number
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
}

/// Decide how to read a file from its name and first bytes
pub fn detect_kind(path: &Path, head: &[u8]) -> Option<FileKind> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("txt") => Some(FileKind::Text),
        Some("pdf") => Some(FileKind::Pdf),
        None if is_pdf(head) => Some(FileKind::Pdf),
        _ => None,
    }
}

/// Read `path` and return its text
pub fn import_file(path: &Path) -> Result<String, ImportError> {
    let data = std::fs::read(path).map_err(|source| ImportError::Io { path: path.to_path_buf(), source })?;

    let text = match detect_kind(path, &data) {
        Some(FileKind::Text) => String::from_utf8_lossy(&data).into_owned(),
        Some(FileKind::Pdf) => extract_pdf_text(&data)?,
        None => return Err(ImportError::Unsupported { path: path.to_path_buf() }),
    };
    tracing::info!(path = %path.display(), chars = text.chars().count(), "Imported file");
    Ok(text)
}

/// Text of every page, words joined by spaces, one line per page
pub fn extract_pdf_text(data: &[u8]) -> Result<String, ImportError> {
    let doc = Document::load_mem(data).map_err(|e| ImportError::Pdf(e.to_string()))?;

    let mut extracted = String::new();
    for page_number in doc.get_pages().into_keys() {
        let page = doc.extract_text(&[page_number]).map_err(|e| ImportError::Pdf(e.to_string()))?;
        extracted.push_str(&page.split_whitespace().collect::<Vec<_>>().join(" "));
        extracted.push('\n');
    }
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use tempfile::TempDir;

    use super::*;

    /// Single-font PDF with one page per entry of `pages`
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(b"%PDF-1.4"));
        assert!(!is_pdf(b"Not a PDF"));
        assert!(!is_pdf(b"%PD"));
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind(Path::new("notes.txt"), b"hi"), Some(FileKind::Text));
        assert_eq!(detect_kind(Path::new("NOTES.TXT"), b"hi"), Some(FileKind::Text));
        assert_eq!(detect_kind(Path::new("paper.pdf"), b""), Some(FileKind::Pdf));
        assert_eq!(detect_kind(Path::new("scan"), b"%PDF-1.7"), Some(FileKind::Pdf));
        assert_eq!(detect_kind(Path::new("scan"), b"plain"), None);
        assert_eq!(detect_kind(Path::new("report.docx"), b"PK"), None);
        assert_eq!(detect_kind(Path::new("readme.md"), b"# hi"), None);
    }

    #[test]
    fn test_import_text_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Line one\nLine two").unwrap();

        assert_eq!(import_file(&path).unwrap(), "Line one\nLine two");
    }

    #[test]
    fn test_import_invalid_utf8_is_lossy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"caf\xe9").unwrap();

        assert_eq!(import_file(&path).unwrap(), "caf\u{FFFD}");
    }

    #[test]
    fn test_import_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let err = import_file(&path).unwrap_err();
        assert!(matches!(err, ImportError::Unsupported { .. }));
        assert_eq!(err.to_string(), UNSUPPORTED_MESSAGE);
    }

    #[test]
    fn test_import_missing_file() {
        let err = import_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }

    #[test]
    fn test_import_pdf_one_line_per_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, build_pdf(&["Hello World", "Second page"])).unwrap();

        let text = import_file(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Hello"));
        assert!(lines[1].contains("Second"));
    }

    #[test]
    fn test_corrupt_pdf() {
        let err = extract_pdf_text(b"%PDF-1.4 garbage").unwrap_err();
        assert!(matches!(err, ImportError::Pdf(_)));
    }
}
