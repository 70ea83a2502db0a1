//! studybuddy-providers: Generative model backends.
//!
//! Implements the `LlmProvider` trait for Ollama and OpenAI-compatible APIs,
//! plus a scripted mock, and loads the `studybuddy.toml` configuration.

pub mod config;
pub mod error;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, ProviderConfig, StudyBuddyConfig};
pub use error::ProviderError;
