//! Entity extraction.
//!
//! A recognizer proposes terms; when it proposes too few, the list is padded
//! with long words sampled from the material. The result is deduplicated in
//! first-seen order.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::model::Entity;
use crate::settings::QuizSettings;
use crate::traits::{EntityRecognizer, GenerateRequest, LlmProvider};

/// Lower-case words allowed inside a capitalized phrase ("Bank of England").
const CONNECTORS: &[&str] = &["of", "the", "and", "for", "de", "von", "van", "la", "del", "da"];

/// Capitalized words that are never terms on their own.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "before", "but", "by", "chapter", "during", "each", "every", "figure", "for", "from", "he",
    "her", "here", "his", "how", "however", "i", "if", "in", "is", "it", "its", "many", "most",
    "no", "not", "of", "on", "one", "or", "our", "section", "she", "so", "some", "table", "that",
    "the", "their", "then", "there", "these", "they", "this", "those", "thus", "to", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "why", "with", "yes", "you",
];

/// Longest line accepted from a model-produced term list.
const MAX_TERM_CHARS: usize = 60;

// ---------------------------------------------------------------------------
// Rule-based recognizer
// ---------------------------------------------------------------------------

/// Finds proper-noun phrases, acronyms and years without a trained model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedRecognizer;

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Scan `text` and return every phrase occurrence in order.
    pub fn find(&self, text: &str) -> Vec<String> {
        let vocabulary = lowercase_vocabulary(text);
        let mut found = Vec::new();

        for line in text.lines() {
            let mut run = PhraseRun::default();
            let mut sentence_start = true;

            for raw in line.split_whitespace() {
                let token = Token::parse(raw);

                if token.opens_clause {
                    run.flush(&vocabulary, &mut found);
                }

                if token.core.is_empty() {
                    run.flush(&vocabulary, &mut found);
                } else if is_year(token.core) {
                    run.flush(&vocabulary, &mut found);
                    found.push(token.core.to_string());
                } else if starts_uppercase(token.core) {
                    run.push_word(token.core, sentence_start);
                } else if run.is_open() && CONNECTORS.contains(&token.core) {
                    run.push_connector(token.core);
                } else {
                    run.flush(&vocabulary, &mut found);
                }

                if token.closes_clause {
                    run.flush(&vocabulary, &mut found);
                }
                sentence_start = token.ends_sentence;
            }

            run.flush(&vocabulary, &mut found);
        }

        found
    }
}

#[async_trait]
impl EntityRecognizer for RuleBasedRecognizer {
    fn name(&self) -> &str {
        "rules"
    }

    async fn recognize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.find(text))
    }
}

/// One whitespace token split into its word and surrounding punctuation.
struct Token<'a> {
    core: &'a str,
    opens_clause: bool,
    closes_clause: bool,
    ends_sentence: bool,
}

impl<'a> Token<'a> {
    fn parse(raw: &'a str) -> Self {
        let start = raw.trim_start_matches(|c: char| !c.is_alphanumeric());
        let word = start.trim_end_matches(|c: char| !c.is_alphanumeric());
        let trail = &start[word.len()..];

        let (core, possessive) = match word
            .strip_suffix("'s")
            .or_else(|| word.strip_suffix("\u{2019}s"))
        {
            Some(stem) => (stem, true),
            None => (word, false),
        };

        Self {
            core,
            opens_clause: start.len() < raw.len(),
            closes_clause: possessive || !trail.is_empty(),
            ends_sentence: trail.chars().any(|c| matches!(c, '.' | '!' | '?' | ':')),
        }
    }
}

/// Capitalized words collected so far, plus connectors waiting for the next
/// capitalized word.
#[derive(Default)]
struct PhraseRun {
    words: Vec<String>,
    pending: Vec<String>,
    sentence_initial: bool,
}

impl PhraseRun {
    fn is_open(&self) -> bool {
        !self.words.is_empty()
    }

    fn push_word(&mut self, word: &str, sentence_start: bool) {
        if self.words.is_empty() {
            self.sentence_initial = sentence_start;
        } else {
            self.words.append(&mut self.pending);
        }
        self.words.push(word.to_string());
    }

    fn push_connector(&mut self, word: &str) {
        self.pending.push(word.to_string());
    }

    fn flush(&mut self, vocabulary: &HashSet<String>, found: &mut Vec<String>) {
        self.pending.clear();
        if self.words.is_empty() {
            return;
        }
        let words = std::mem::take(&mut self.words);
        if let Some(phrase) = finalize_phrase(words, self.sentence_initial, vocabulary) {
            found.push(phrase);
        }
    }
}

fn finalize_phrase(
    words: Vec<String>,
    sentence_initial: bool,
    vocabulary: &HashSet<String>,
) -> Option<String> {
    let leading = words
        .iter()
        .take_while(|w| is_stopword(w))
        .count();
    let words = &words[leading..];

    match words {
        [] => None,
        [single] => {
            let lower = single.to_lowercase();
            if single.chars().count() < 2 || is_stopword(single) {
                return None;
            }
            // A lone capital at sentence start is usually just grammar.
            if sentence_initial && leading == 0 && !is_acronym(single) && vocabulary.contains(&lower)
            {
                return None;
            }
            Some(single.clone())
        }
        many => Some(many.join(" ")),
    }
}

fn lowercase_vocabulary(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|raw| Token::parse(raw).core)
        .filter(|w| w.chars().next().is_some_and(|c| c.is_lowercase()))
        .map(str::to_lowercase)
        .collect()
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() >= 2
        && word.chars().any(char::is_uppercase)
        && word.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
}

fn is_year(word: &str) -> bool {
    word.len() == 4 && word.starts_with(['1', '2']) && word.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Model-backed recognizer
// ---------------------------------------------------------------------------

/// Asks the generative model to list the key terms of the material.
pub struct LlmRecognizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
}

impl LlmRecognizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }
}

#[async_trait]
impl EntityRecognizer for LlmRecognizer {
    fn name(&self) -> &str {
        "llm"
    }

    async fn recognize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: format!(
                "List the most important named entities and key concepts in the following \
                 study material. Write one term per line with no numbering or explanation.\n\n\
                 Material:\n{text}"
            ),
            system_prompt: None,
            max_tokens: self.max_tokens,
            temperature: 0.0,
        };
        let response = self.provider.generate(&request).await?;
        Ok(parse_term_list(&response.content))
    }
}

/// Parse a one-term-per-line model answer.
///
/// Bullets and `1.`/`1)` numbering are stripped; headers ending in `:` and
/// lines longer than a short phrase are dropped.
pub fn parse_term_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(strip_list_marker)
        .map(|line| line.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace()))
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .filter(|line| line.chars().count() <= MAX_TERM_CHARS)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '\u{2022}'))
        .trim_start();
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }
    line
}

// ---------------------------------------------------------------------------
// Extraction stage
// ---------------------------------------------------------------------------

/// Runs the recognizer (if any) and applies the sampling fallback.
pub struct EntityExtractor {
    recognizer: Option<Box<dyn EntityRecognizer>>,
    min_entities: usize,
    fallback_sample: usize,
}

impl EntityExtractor {
    pub fn new(recognizer: Option<Box<dyn EntityRecognizer>>, settings: &QuizSettings) -> Self {
        Self {
            recognizer,
            min_entities: settings.min_entities,
            fallback_sample: settings.fallback_sample,
        }
    }

    pub fn recognizer_name(&self) -> Option<&str> {
        self.recognizer.as_ref().map(|r| r.name())
    }

    /// Extract deduplicated entities from `text`.
    pub async fn extract<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Vec<Entity> {
        let mut candidates = match &self.recognizer {
            Some(recognizer) => match recognizer.recognize(text).await {
                Ok(found) => {
                    debug!(recognizer = recognizer.name(), count = found.len(), "recognized entities");
                    found
                }
                Err(e) => {
                    warn!(recognizer = recognizer.name(), "entity recognition failed: {e:#}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if candidates.len() < self.min_entities {
            let padding = sample_long_words(text, self.fallback_sample, rng);
            debug!(count = padding.len(), "padding entities with sampled words");
            candidates.extend(padding);
        }

        dedup_first_seen(candidates)
    }
}

/// Sample up to `count` distinct token positions whose word is longer than
/// three characters.
pub fn sample_long_words<R: Rng + ?Sized>(text: &str, count: usize, rng: &mut R) -> Vec<String> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 3)
        .collect();

    words
        .choose_multiple(rng, count.min(words.len()))
        .map(|w| w.to_string())
        .collect()
}

/// Drop repeats, keeping the first occurrence of each term.
pub fn dedup_first_seen<I>(items: I) -> Vec<Entity>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .map(Entity::from)
        .collect()
}
