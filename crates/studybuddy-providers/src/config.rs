//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studybuddy_core::question::GenerationOptions;
use studybuddy_core::settings::{OcrSettings, QuizSettings, RecognizerKind};
use studybuddy_core::traits::LlmProvider;

use crate::ollama::{OllamaProvider, DEFAULT_BASE_URL};
use crate::openai::OpenAiProvider;

/// File name searched for in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "studybuddy.toml";

/// Configuration for a single generative model backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Top-level studybuddy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyBuddyConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for question generation.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model passed to the default provider.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for question generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Generation length cap per question.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Entity recognizer loaded at startup.
    #[serde(default)]
    pub recognizer: RecognizerKind,
    #[serde(default)]
    pub quiz: QuizSettings,
    #[serde(default)]
    pub ocr: OcrSettings,
}

fn default_provider() -> String {
    "ollama".to_string()
}
fn default_model() -> String {
    "llama3.2".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    300
}

impl Default for StudyBuddyConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            recognizer: RecognizerKind::default(),
            quiz: QuizSettings::default(),
            ocr: OcrSettings::default(),
        }
    }
}

impl StudyBuddyConfig {
    /// Settings for the default provider.
    ///
    /// A missing `ollama` table falls back to the local default URL.
    pub fn default_provider_config(&self) -> Option<ProviderConfig> {
        match self.providers.get(&self.default_provider) {
            Some(config) => Some(config.clone()),
            None if self.default_provider == "ollama" => Some(ProviderConfig::Ollama {
                base_url: default_ollama_url(),
            }),
            None => None,
        }
    }

    /// Generation parameters for the question generator.
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.default_model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Apply `STUDYBUDDY_OPENAI_KEY` and `STUDYBUDDY_OLLAMA_URL` overrides.
fn apply_overrides(config: &mut StudyBuddyConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(key) = var("STUDYBUDDY_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Some(url) = var("STUDYBUDDY_OLLAMA_URL") {
        let entry = config
            .providers
            .entry("ollama".into())
            .or_insert(ProviderConfig::Ollama {
                base_url: String::new(),
            });
        if let ProviderConfig::Ollama { base_url } = entry {
            *base_url = url;
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `studybuddy.toml` in the current directory
/// 2. `~/.config/studybuddy/config.toml`
///
/// Environment variable overrides: `STUDYBUDDY_OPENAI_KEY`, `STUDYBUDDY_OLLAMA_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyBuddyConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => find_config_file(),
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_file(&path)?
        }
        None => StudyBuddyConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let global = dirs_path()?.join("config.toml");
    global.exists().then_some(global)
}

fn parse_config_file(path: &Path) -> Result<StudyBuddyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<StudyBuddyConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studybuddy"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let provider: Box<dyn LlmProvider> = match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?),
        ProviderConfig::Ollama { base_url } => Box::new(OllamaProvider::new(base_url)?),
    };
    tracing::debug!(name, backend = provider.name(), "created provider");
    Ok(provider)
}
