//! Core trait definitions for model backends.
//!
//! `LlmProvider` is implemented by the `studybuddy-providers` crate;
//! `EntityRecognizer` implementations live in [`crate::entities`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for generative model backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "ollama").
    fn name(&self) -> &str;

    /// Generate a completion for a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// Check that the backend can be reached before the run starts.
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to generate text from a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "llama3.2").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token counts reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens (0 when unknown).
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Entity recognizer trait
// ---------------------------------------------------------------------------

/// Trait for anything that can pick notable terms out of text.
///
/// Results may contain duplicates; callers deduplicate.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Short name used in logs (e.g. "rules").
    fn name(&self) -> &str;

    /// Return candidate terms in order of appearance.
    async fn recognize(&self, text: &str) -> anyhow::Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Default system prompt
// ---------------------------------------------------------------------------

/// Default system prompt for generation backends.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a study assistant that writes multiple-choice quiz questions. Follow the requested output format exactly and keep every answer short.";
