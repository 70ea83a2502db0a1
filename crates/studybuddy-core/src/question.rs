//! Quiz question generation.
//!
//! The model is asked for `Question:`, `Answer:` and `Distractors:` lines.
//! Parsing is best-effort string splitting; anything that goes wrong turns
//! into the placeholder question.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::error::{ProviderError, QuestionError};
use crate::model::{Entity, OptionLabel, QuestionOrigin, QuizQuestion};
use crate::traits::{GenerateRequest, LlmProvider};

const QUESTION_MARKER: &str = "Question:";
const ANSWER_MARKER: &str = "Answer:";
const DISTRACTORS_MARKER: &str = "Distractors:";
const DISTRACTOR_COUNT: usize = 3;

/// Request parameters for question generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// The three fields pulled out of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGeneration {
    pub question: String,
    pub answer: String,
    pub distractors: Vec<String>,
}

/// Build the instruction sent to the model for one entity.
pub fn build_prompt(entity: &Entity, material: &str) -> String {
    format!(
        "Generate a meaningful multiple-choice question from this study material:\n\
         Material: {material}\n\
         Focus on this entity: {entity}\n\
         Provide one correct answer and three plausible distractors.\n\
         Format:\n\
         Question: ...\n\
         Answer: ...\n\
         Distractors: ..."
    )
}

/// Split a model response on the literal markers.
///
/// Question and answer fall back to the entity text when their marker is
/// missing or followed by nothing.
pub fn parse_generation(output: &str, entity: &Entity) -> ParsedGeneration {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let after_marker = |marker: &str| -> Option<String> {
        lines
            .iter()
            .find(|l| l.contains(marker))
            .and_then(|l| l.rsplit(marker).next())
            .map(|rest| rest.trim().to_string())
    };

    let question = after_marker(QUESTION_MARKER)
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| entity.to_string());
    let answer = after_marker(ANSWER_MARKER)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| entity.to_string());
    let distractors: Vec<String> = after_marker(DISTRACTORS_MARKER)
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    ParsedGeneration {
        question,
        answer,
        distractors,
    }
}

/// Turn parsed fields into a shuffled, labeled question.
///
/// Distractors matching the answer (case-insensitively) are dropped, then
/// random material words fill the list up to three.
pub fn assemble_question<R: Rng + ?Sized>(
    parsed: ParsedGeneration,
    material: &str,
    rng: &mut R,
) -> Result<QuizQuestion, QuestionError> {
    let answer_lower = parsed.answer.to_lowercase();

    let mut distractors: Vec<String> = parsed
        .distractors
        .into_iter()
        .filter(|d| d.to_lowercase() != answer_lower)
        .collect();

    if distractors.len() < DISTRACTOR_COUNT {
        let candidates: Vec<&str> = material
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty() && w.to_lowercase() != answer_lower)
            .collect();

        while distractors.len() < DISTRACTOR_COUNT {
            let word = candidates
                .choose(rng)
                .ok_or_else(|| QuestionError::NoDistractorCandidates(parsed.answer.clone()))?;
            distractors.push(word.to_string());
        }
    }
    distractors.truncate(DISTRACTOR_COUNT);

    let mut slots = [
        (true, parsed.answer),
        (false, String::new()),
        (false, String::new()),
        (false, String::new()),
    ];
    for (slot, distractor) in slots[1..].iter_mut().zip(distractors) {
        slot.1 = distractor;
    }
    slots.shuffle(rng);

    let answer = slots
        .iter()
        .position(|(is_answer, _)| *is_answer)
        .and_then(OptionLabel::from_index)
        .unwrap_or(OptionLabel::A);
    let texts = slots.map(|(_, text)| text);

    Ok(QuizQuestion::new(
        parsed.question,
        texts,
        answer,
        QuestionOrigin::Generated,
    ))
}

/// Generates one question per entity, falling back to the placeholder.
pub struct QuestionGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
    options: GenerationOptions,
    /// Set after a permanent backend error so later entities skip the call.
    disabled: AtomicBool,
}

impl QuestionGenerator {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, options: GenerationOptions) -> Self {
        Self {
            provider,
            options,
            disabled: AtomicBool::new(false),
        }
    }

    /// A generator that only produces placeholder questions.
    pub fn offline() -> Self {
        Self::new(None, GenerationOptions::default())
    }

    /// Whether a generative model is loaded and still usable.
    pub fn has_model(&self) -> bool {
        self.provider.is_some() && !self.disabled.load(Ordering::Relaxed)
    }

    /// Generate a question about `entity`. Never fails.
    #[instrument(skip_all, fields(entity = %entity))]
    pub async fn generate<R: Rng + ?Sized>(
        &self,
        entity: &Entity,
        material: &str,
        rng: &mut R,
    ) -> QuizQuestion {
        let Some(provider) = self.provider.as_ref().filter(|_| self.has_model()) else {
            return QuizQuestion::placeholder(entity);
        };

        let request = GenerateRequest {
            model: self.options.model.clone(),
            prompt: build_prompt(entity, material),
            system_prompt: None,
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let response = match provider.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                if e
                    .downcast_ref::<ProviderError>()
                    .is_some_and(ProviderError::is_permanent)
                {
                    self.disabled.store(true, Ordering::Relaxed);
                    warn!("disabling question generation for the rest of the run");
                }
                warn!("question generation failed: {e:#}");
                return QuizQuestion::placeholder(entity);
            }
        };
        debug!(latency_ms = response.latency_ms, "model responded");

        let parsed = parse_generation(&response.content, entity);
        match assemble_question(parsed, material, rng) {
            Ok(question) => question,
            Err(e) => {
                warn!("could not assemble question: {e}");
                QuizQuestion::placeholder(entity)
            }
        }
    }
}
