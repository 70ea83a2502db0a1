//! Tunables shared by the pipeline stages.
//!
//! These deserialize from the `[quiz]` and `[ocr]` tables of the config file
//! and every field has a default, so an empty table is valid.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Limits for term extraction, question generation and the graph sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Questions generated per run (taken from the first entities).
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    /// Below this many recognized entities, pad with sampled words.
    #[serde(default = "default_min_entities")]
    pub min_entities: usize,
    /// How many words the padding step samples.
    #[serde(default = "default_fallback_sample")]
    pub fallback_sample: usize,
    /// Related terms listed per knowledge graph entry.
    #[serde(default = "default_related_terms")]
    pub related_terms: usize,
}

fn default_max_questions() -> usize {
    10
}
fn default_min_entities() -> usize {
    5
}
fn default_fallback_sample() -> usize {
    10
}
fn default_related_terms() -> usize {
    3
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            min_entities: default_min_entities(),
            fallback_sample: default_fallback_sample(),
            related_terms: default_related_terms(),
        }
    }
}

/// Which entity recognizer to load at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    /// Capitalized-phrase rules, always available.
    #[default]
    Rules,
    /// Ask the generative model for key terms.
    Llm,
    /// No recognizer; rely on sampled words only.
    None,
}

impl FromStr for RecognizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rules" => Ok(RecognizerKind::Rules),
            "llm" => Ok(RecognizerKind::Llm),
            "none" => Ok(RecognizerKind::None),
            other => Err(format!("unknown recognizer: {other}")),
        }
    }
}

/// External OCR tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrSettings {
    /// `tesseract` executable.
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
    /// `pdftoppm` executable used to rasterize scanned PDF pages.
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: String,
    /// Tesseract language code.
    #[serde(default = "default_language")]
    pub language: String,
    /// Rasterization resolution for PDF pages.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Per-process timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_tesseract() -> String {
    "tesseract".to_string()
}
fn default_pdftoppm() -> String {
    "pdftoppm".to_string()
}
fn default_language() -> String {
    "eng".to_string()
}
fn default_dpi() -> u32 {
    200
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tesseract: default_tesseract(),
            pdftoppm: default_pdftoppm(),
            language: default_language(),
            dpi: default_dpi(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
