//! Core types for word drilling.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Card handed out by the scheduler.
///
/// Only `word` takes part in correctness checks; every other field is
/// display material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub meta: Option<String>,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub example_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Card {
    /// Create a card with only the id and the word set.
    pub fn new(id: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            translation: None,
            definition: None,
            meta: None,
            pronunciation: None,
            example: None,
            example_translation: None,
            created_at: None,
        }
    }
}

/// One rendered character of answer feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharMark {
    pub character: char,
    pub is_match: bool,
    /// Synthesized position: a missing character in the typed line, or the
    /// character that should have been typed in the target line.
    pub is_gap_fill: bool,
}

impl CharMark {
    pub fn matched(character: char) -> Self {
        Self {
            character,
            is_match: true,
            is_gap_fill: false,
        }
    }

    pub fn mismatched(character: char) -> Self {
        Self {
            character,
            is_match: false,
            is_gap_fill: false,
        }
    }

    pub fn gap_fill(character: char) -> Self {
        Self {
            character,
            is_match: false,
            is_gap_fill: true,
        }
    }
}

/// Both feedback lines shown after a wrong answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// What the learner typed, with errors and omissions marked.
    pub input_marks: Vec<CharMark>,
    /// The target word, with replaced characters marked.
    pub target_marks: Vec<CharMark>,
}

/// Disclosure stage of a single card presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Definition,
    WithTranslation,
    Incorrect,
    MustType,
    Final,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Definition
    }
}

/// Classification of one submitted answer against the card's word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Empty,
    Wrong,
    Exact,
}

/// Result of applying an [`Answer`] to a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub stage: Stage,
    /// New verdict, if the transition sets one.
    pub verdict: Option<bool>,
    pub reveal_translation: bool,
}
