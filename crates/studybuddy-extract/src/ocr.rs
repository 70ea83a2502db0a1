//! OCR through the `tesseract` and `pdftoppm` executables.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;

use studybuddy_core::settings::OcrSettings;

use crate::error::ExtractError;

/// Runs OCR helpers as child processes with a timeout.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    settings: OcrSettings,
}

impl OcrEngine {
    pub fn new(settings: OcrSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    /// Recognize the text in a raster image.
    pub async fn image_to_text(&self, image: &Path) -> Result<String> {
        let output = self
            .run(
                &self.settings.tesseract,
                [
                    image.as_os_str(),
                    OsStr::new("stdout"),
                    OsStr::new("-l"),
                    OsStr::new(&self.settings.language),
                ],
            )
            .await
            .with_context(|| format!("OCR failed for {}", image.display()))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Rasterize one 1-based PDF page to `<out_dir>/page.png`.
    pub async fn render_pdf_page(&self, pdf: &Path, page: u32, out_dir: &Path) -> Result<PathBuf> {
        let prefix = out_dir.join("page");
        let page = page.to_string();
        let dpi = self.settings.dpi.to_string();
        self.run(
            &self.settings.pdftoppm,
            [
                OsStr::new("-f"),
                OsStr::new(&page),
                OsStr::new("-l"),
                OsStr::new(&page),
                OsStr::new("-r"),
                OsStr::new(&dpi),
                OsStr::new("-png"),
                OsStr::new("-singlefile"),
                pdf.as_os_str(),
                prefix.as_os_str(),
            ],
        )
        .await
        .with_context(|| format!("failed to render page {page} of {}", pdf.display()))?;
        Ok(prefix.with_extension("png"))
    }

    /// Render one PDF page and OCR it.
    pub async fn pdf_page_to_text(&self, pdf: &Path, page: u32) -> Result<String> {
        let scratch = tempfile::tempdir().context("failed to create temp directory")?;
        let image = self.render_pdf_page(pdf, page, scratch.path()).await?;
        self.image_to_text(&image).await
    }

    async fn run<I, S>(&self, program: &str, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                anyhow::Error::new(ExtractError::ToolMissing(program.to_string()))
            } else {
                anyhow::Error::new(e).context(format!("failed to start `{program}`"))
            }
        })?;

        let secs = self.settings.timeout_secs;
        let output = tokio::time::timeout(Duration::from_secs(secs), child.wait_with_output())
            .await
            .map_err(|_| ExtractError::Timeout {
                program: program.to_string(),
                secs,
            })?
            .with_context(|| format!("failed to wait for `{program}`"))?;

        if !output.status.success() {
            return Err(ExtractError::ToolFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        tracing::debug!(program, bytes = output.stdout.len(), "helper finished");
        Ok(output)
    }
}
