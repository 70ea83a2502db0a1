//! studybuddy-extract: Text extraction from study documents.
//!
//! Dispatches on file extension to a format decoder: plain text and source
//! code, Word documents, PDFs (with OCR for scanned pages), PowerPoint decks
//! and raster images.

pub mod document;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod plain;
pub mod slides;

#[cfg(test)]
mod fixtures;

use std::fmt;
use std::path::Path;

use anyhow::Result;

use studybuddy_core::settings::OcrSettings;

pub use error::ExtractError;
pub use ocr::OcrEngine;

/// Decoder selected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    PlainText,
    WordDocument,
    Pdf,
    SlideDeck,
    Image,
}

impl SourceFormat {
    /// Match a file's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "md" | "java" | "rs" | "py" | "js" | "ts" | "c" | "h" | "cpp" | "go" | "kt"
            | "cs" => Some(SourceFormat::PlainText),
            "docx" => Some(SourceFormat::WordDocument),
            "pdf" => Some(SourceFormat::Pdf),
            "pptx" => Some(SourceFormat::SlideDeck),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" => Some(SourceFormat::Image),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::PlainText => "plain text",
            SourceFormat::WordDocument => "docx",
            SourceFormat::Pdf => "pdf",
            SourceFormat::SlideDeck => "pptx",
            SourceFormat::Image => "image",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns study files into plain text.
#[derive(Debug, Clone)]
pub struct Extractor {
    ocr: OcrEngine,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(OcrSettings::default())
    }
}

impl Extractor {
    pub fn new(ocr: OcrSettings) -> Self {
        Self {
            ocr: OcrEngine::new(ocr),
        }
    }

    /// Extract trimmed text, reporting the first failure.
    pub async fn extract(&self, path: &Path) -> Result<String> {
        let Some(format) = SourceFormat::from_path(path) else {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(ExtractError::Unsupported(ext).into());
        };
        tracing::debug!(path = %path.display(), %format, "extracting text");

        let text = match format {
            SourceFormat::PlainText => plain::extract(path)?,
            SourceFormat::WordDocument => document::extract(path)?,
            SourceFormat::Pdf => pdf::extract(path, &self.ocr).await?,
            SourceFormat::SlideDeck => slides::extract(path)?,
            SourceFormat::Image => self.ocr.image_to_text(path).await?,
        };
        Ok(text.trim().to_string())
    }

    /// Extract trimmed text; any failure is logged and yields an empty string.
    pub async fn extract_text(&self, path: &Path) -> String {
        match self.extract(path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read text from file: {e:#}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{slide_xml, write_docx, write_pptx};

    fn extractor() -> Extractor {
        Extractor::new(OcrSettings {
            tesseract: "studybuddy-no-such-tesseract".into(),
            pdftoppm: "studybuddy-no-such-pdftoppm".into(),
            ..OcrSettings::default()
        })
    }

    #[test]
    fn dispatch_by_extension() {
        let cases = [
            ("notes.txt", Some(SourceFormat::PlainText)),
            ("Main.java", Some(SourceFormat::PlainText)),
            ("lib.rs", Some(SourceFormat::PlainText)),
            ("README.MD", Some(SourceFormat::PlainText)),
            ("essay.docx", Some(SourceFormat::WordDocument)),
            ("Paper.PDF", Some(SourceFormat::Pdf)),
            ("deck.pptx", Some(SourceFormat::SlideDeck)),
            ("scan.png", Some(SourceFormat::Image)),
            ("photo.JPG", Some(SourceFormat::Image)),
            ("photo.jpeg", Some(SourceFormat::Image)),
            ("fax.tiff", Some(SourceFormat::Image)),
            ("old.doc", None),
            ("sheet.xlsx", None),
            ("Makefile", None),
        ];
        for (name, expected) in cases {
            assert_eq!(SourceFormat::from_path(Path::new(name)), expected, "{name}");
        }
    }

    #[tokio::test]
    async fn plain_text_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "\n  Osmosis moves water.  \n\n").unwrap();
        assert_eq!(extractor().extract_text(&path).await, "Osmosis moves water.");
    }

    #[tokio::test]
    async fn each_decoder_is_reachable() {
        let dir = tempfile::tempdir().unwrap();

        let docx = dir.path().join("a.docx");
        write_docx(&docx, &[&["Photosynthesis"]]);
        assert_eq!(extractor().extract_text(&docx).await, "Photosynthesis");

        let pptx = dir.path().join("b.pptx");
        write_pptx(&pptx, &[(1, slide_xml(&[&["Chlorophyll"]]))]);
        assert_eq!(extractor().extract_text(&pptx).await, "Chlorophyll");
    }

    #[tokio::test]
    async fn failures_yield_empty_text() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.txt");
        assert_eq!(extractor().extract_text(&missing).await, "");

        let corrupt = dir.path().join("corrupt.pptx");
        std::fs::write(&corrupt, "not a zip").unwrap();
        assert_eq!(extractor().extract_text(&corrupt).await, "");

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(extractor().extract_text(&empty).await, "");

        // OCR executable is not installed under this name.
        let image = dir.path().join("scan.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(extractor().extract_text(&image).await, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn image_goes_through_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("whiteboard.jpg");
        std::fs::write(&image, [0xFF, 0xD8, 0xFF]).unwrap();
        let ocr = crate::fixtures::stub_ocr_tools(dir.path(), "Golgi apparatus");
        let extractor = Extractor::new(ocr);

        assert_eq!(extractor.extract_text(&image).await, "Golgi apparatus");
    }

    #[tokio::test]
    async fn unsupported_extension_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.xlsx");
        std::fs::write(&path, "x").unwrap();

        let err = extractor().extract(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::Unsupported(ext)) if ext == "xlsx"
        ));
        assert_eq!(extractor().extract_text(&path).await, "");
    }
}
