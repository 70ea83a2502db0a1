//! Core data model types for studybuddy.
//!
//! These types carry a single run from raw material to quiz: the material
//! itself, the terms pulled out of it, and the questions asked about them.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MaterialError;

/// Where a block of study material came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum MaterialSource {
    /// Typed or pasted at the prompt.
    Pasted,
    /// Decoded from a file on disk.
    File(PathBuf),
}

/// Raw text that the quiz is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMaterial {
    text: String,
    source: MaterialSource,
}

impl StudyMaterial {
    /// Wrap `text`, rejecting it when it is empty after trimming.
    pub fn new(text: impl Into<String>, source: MaterialSource) -> Result<Self, MaterialError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(MaterialError::Empty);
        }
        Ok(Self { text, source })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &MaterialSource {
        &self.source
    }
}

/// A salient term extracted from the material.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(String);

impl Entity {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Entity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Label of a multiple-choice option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// All labels in display order.
    pub const ALL: [OptionLabel; 4] = [
        OptionLabel::A,
        OptionLabel::B,
        OptionLabel::C,
        OptionLabel::D,
    ];

    /// Label for a zero-based option position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-based option position.
    pub fn index(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            other => Err(format!("unknown option label: {other}")),
        }
    }
}

/// One labeled answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: OptionLabel,
    pub text: String,
}

impl fmt::Display for QuizOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.label, self.text)
    }
}

/// How a question was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrigin {
    /// Parsed from generative model output.
    Generated,
    /// The fixed Yes/No/Maybe/N/A fallback.
    Placeholder,
}

/// A multiple-choice question about one entity.
///
/// Options are always labeled A through D in order, so the answer label
/// identifies exactly one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    options: [QuizOption; 4],
    answer: OptionLabel,
    pub origin: QuestionOrigin,
}

impl QuizQuestion {
    /// Build a question from four option texts in display order.
    pub fn new(
        question: impl Into<String>,
        option_texts: [String; 4],
        answer: OptionLabel,
        origin: QuestionOrigin,
    ) -> Self {
        let [a, b, c, d] = option_texts;
        Self {
            question: question.into(),
            options: [
                QuizOption {
                    label: OptionLabel::A,
                    text: a,
                },
                QuizOption {
                    label: OptionLabel::B,
                    text: b,
                },
                QuizOption {
                    label: OptionLabel::C,
                    text: c,
                },
                QuizOption {
                    label: OptionLabel::D,
                    text: d,
                },
            ],
            answer,
            origin,
        }
    }

    /// The fixed fallback question used when generation is unavailable.
    pub fn placeholder(entity: &Entity) -> Self {
        Self::new(
            entity.as_str(),
            [
                "Yes".to_string(),
                "No".to_string(),
                "Maybe".to_string(),
                "N/A".to_string(),
            ],
            OptionLabel::A,
            QuestionOrigin::Placeholder,
        )
    }

    pub fn options(&self) -> &[QuizOption; 4] {
        &self.options
    }

    pub fn answer(&self) -> OptionLabel {
        self.answer
    }

    pub fn correct_option(&self) -> &QuizOption {
        &self.options[self.answer.index()]
    }

    /// Case-insensitive exact match of a typed response against the answer label.
    pub fn is_correct(&self, response: &str) -> bool {
        response.trim().eq_ignore_ascii_case(self.answer.as_str())
    }
}

/// One row of the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEntry {
    pub entity: Entity,
    pub related: Vec<Entity>,
}

/// Each entity paired with a random sample of other entities.
///
/// This is sampled co-occurrence, not derived relationships: the pairing
/// carries no meaning beyond both terms appearing in the same material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeGraph {
    entries: Vec<GraphEntry>,
}

impl KnowledgeGraph {
    pub fn new(entries: Vec<GraphEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GraphEntry] {
        &self.entries
    }

    pub fn related(&self, entity: &Entity) -> Option<&[Entity]> {
        self.entries
            .iter()
            .find(|e| &e.entity == entity)
            .map(|e| e.related.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
