//! Extraction error types.

use thiserror::Error;

/// Failures specific to text extraction.
///
/// Decoder errors (corrupt archives, malformed XML) travel as `anyhow`
/// context chains; these variants cover dispatch and external tools.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extension maps to no decoder.
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    /// An OCR helper executable could not be started.
    #[error("`{0}` not found; install it or set its path under [ocr]")]
    ToolMissing(String),

    /// An OCR helper ran past its timeout.
    #[error("`{program}` timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// An OCR helper exited unsuccessfully.
    #[error("`{program}` failed ({status}): {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },
}
