//! PDF documents, with OCR for pages that carry no text layer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::ocr::OcrEngine;

/// Page texts joined with `\n`.
///
/// A page whose text layer is empty or cannot be decoded is rendered and
/// OCR'd. An OCR failure fails the whole document.
pub async fn extract(path: &Path, ocr: &OcrEngine) -> Result<String> {
    let doc =
        lopdf::Document::load(path).with_context(|| format!("invalid pdf {}", path.display()))?;

    let mut pages = Vec::new();
    for &number in doc.get_pages().keys() {
        let text = match doc.extract_text(&[number]) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::debug!(page = number, "no text layer, running OCR");
                ocr.pdf_page_to_text(path, number).await?
            }
            Err(e) => {
                tracing::debug!(page = number, error = %e, "text layer unreadable, running OCR");
                ocr.pdf_page_to_text(path, number).await?
            }
        };
        pages.push(text);
    }
    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::fixtures::write_pdf;
    use studybuddy_core::settings::OcrSettings;

    fn no_ocr() -> OcrEngine {
        OcrEngine::new(OcrSettings {
            pdftoppm: "studybuddy-no-such-pdftoppm".into(),
            tesseract: "studybuddy-no-such-tesseract".into(),
            ..OcrSettings::default()
        })
    }

    #[tokio::test]
    async fn text_layer_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        write_pdf(&path, &[Some("Thermodynamics"), Some("Entropy")]);

        let text = extract(&path, &no_ocr()).await.unwrap();
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["Thermodynamics", "Entropy"]);
    }

    #[tokio::test]
    async fn blank_page_falls_back_to_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &[Some("Cover"), None]);

        let err = extract(&path, &no_ocr()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::ToolMissing(name)) if name == "studybuddy-no-such-pdftoppm"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn scanned_page_is_ocrd_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &[Some("Cover"), None, Some("Appendix")]);
        let tools = crate::fixtures::stub_ocr_tools(dir.path(), "Scanned Ribosome");
        let ocr = OcrEngine::new(tools);

        let text = extract(&path, &ocr).await.unwrap();
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["Cover", "Scanned Ribosome", "Appendix"]);
    }

    #[tokio::test]
    async fn garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, "%PDF-1.5 truncated").unwrap();
        assert!(extract(&path, &no_ocr()).await.is_err());
    }
}
