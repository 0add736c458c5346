//! Per-card session state.

use drill_core::{Card, Feedback, Stage};
use serde::Serialize;

/// Everything the front-end needs to render the current presentation.
///
/// Reset in full whenever a new card is loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub card: Option<Card>,
    pub stage: Stage,
    /// Text typed but not yet submitted.
    pub raw_input: String,
    /// Last trimmed, non-empty answer.
    pub last_user_answer: String,
    pub translation_revealed: bool,
    pub was_correct: bool,
    /// Present only in `Incorrect`.
    pub feedback: Option<Feedback>,
    pub loading: bool,
    pub submission_in_flight: bool,
    pub submitting_card_id: Option<String>,
}

impl SessionState {
    /// Fresh state for a newly loaded card (or an empty queue).
    pub fn for_card(card: Option<Card>) -> Self {
        Self {
            card,
            ..Self::default()
        }
    }

    pub fn current_card_id(&self) -> Option<&str> {
        self.card.as_ref().map(|c| c.id.as_str())
    }

    pub fn is_empty_queue(&self) -> bool {
        self.card.is_none() && !self.loading
    }
}
