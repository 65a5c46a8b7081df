//! Writing the transcript to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub const DOCUMENT_HEADER: &str = "Summary Document\n\n====================\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `summary.txt`, the transcript as is
    Text,
    /// `summary.docx`, the transcript under a short header
    Document,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Text => "summary.txt",
            ExportFormat::Document => "summary.docx",
        }
    }

    pub fn render(self, summary: &str) -> String {
        match self {
            ExportFormat::Text => summary.to_string(),
            ExportFormat::Document => format!("{DOCUMENT_HEADER}{summary}"),
        }
    }
}

/// Write `summary` into `dir` and return the file's path
pub fn export_summary(summary: &str, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    if summary.trim().is_empty() {
        bail!("Nothing to export");
    }
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(format.file_name());
    std::fs::write(&path, format.render(summary)).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Exported summary");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_text_export() {
        let dir = TempDir::new().unwrap();
        let path = export_summary("Hello world", ExportFormat::Text, dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "summary.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Hello world");
    }

    #[test]
    fn test_document_export_has_header() {
        let dir = TempDir::new().unwrap();
        let path = export_summary("Hello world", ExportFormat::Document, dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "summary.docx");
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Summary Document\n\n====================\n\nHello world"
        );
    }

    #[test]
    fn test_export_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        export_summary("first", ExportFormat::Text, &nested).unwrap();
        let path = export_summary("second", ExportFormat::Text, &nested).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_empty_export_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(export_summary("  \n", ExportFormat::Text, dir.path()).is_err());
        assert!(!dir.path().join("summary.txt").exists());
    }
}
