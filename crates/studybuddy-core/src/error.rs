//! Error types.
//!
//! `ProviderError` lives in core so stages that call a generative model can
//! downcast and log a failure class without string matching.

use thiserror::Error;

/// Errors that can occur when interacting with a generative model backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if the backend will keep failing for the rest of the run.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }
}

/// Errors raised when building study material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// The text was empty or whitespace only.
    #[error("study material is empty")]
    Empty,
}

/// Errors raised while assembling a question from model output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    /// The material has no word that could serve as a distractor.
    #[error("no distractor candidates differ from answer '{0}'")]
    NoDistractorCandidates(String),
}
