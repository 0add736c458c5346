//! Study session: drives one card at a time through its disclosure stages
//! and hands the verdict to the scheduler.

use std::sync::{Arc, Mutex, MutexGuard};

use drill_core::{alignment, Answer, Card, Stage};

use crate::guard::{GuardTiming, SubmissionGuard, SubmissionTicket};
use crate::scheduler::Scheduler;
use crate::state::SessionState;

/// Outcome of an operation that moves to another card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Dropped: wrong stage, no card, or a submission already in flight.
    Skipped,
    /// A new card is on screen.
    NextCard,
    /// The queue is empty, or the scheduler kept returning the answered card.
    Exhausted,
    /// The scheduler call failed; the session shows no card.
    Failed,
    /// A newer load started before this one finished; its result was dropped.
    Superseded,
}

struct Inner {
    state: SessionState,
    /// Bumped on every load so that late results can be recognised.
    generation: u64,
}

/// A study session over a scheduler.
///
/// All methods take `&self`; the state lock is never held across an await.
pub struct StudySession<S: Scheduler + ?Sized> {
    scheduler: Arc<S>,
    guard: SubmissionGuard,
    timing: GuardTiming,
    inner: Mutex<Inner>,
}

impl<S: Scheduler + ?Sized> StudySession<S> {
    pub fn new(scheduler: Arc<S>, timing: GuardTiming) -> Self {
        Self {
            scheduler,
            guard: SubmissionGuard::new(),
            timing,
            inner: Mutex::new(Inner {
                state: SessionState::default(),
                generation: 0,
            }),
        }
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> SessionState {
        let mut state = self.lock().state.clone();
        state.submission_in_flight = self.guard.is_in_flight();
        state.submitting_card_id = self.guard.submitting_card_id();
        state
    }

    pub fn stage(&self) -> Stage {
        self.lock().state.stage
    }

    /// Replace the pending, not yet submitted, input.
    pub fn set_input(&self, text: &str) {
        self.lock().state.raw_input = text.to_string();
    }

    /// Fetch a card without any stale-card filtering.
    ///
    /// Dropped while a submission is in flight: that submission owns the next
    /// load and keeps the answered card off screen.
    pub async fn load_next_card(&self) -> Advance {
        let generation = {
            let mut inner = self.lock();
            if self.guard.is_in_flight() {
                tracing::debug!("Reload dropped, submission in flight");
                return Advance::Skipped;
            }
            Self::next_generation(&mut inner)
        };
        self.fetch_into(generation).await
    }

    /// Submit the pending input.
    pub fn submit_input(&self) -> Stage {
        let input = std::mem::take(&mut self.lock().state.raw_input);
        self.handle_answer(&input)
    }

    /// Judge `input` against the current card and move to the next stage.
    pub fn handle_answer(&self, input: &str) -> Stage {
        let mut inner = self.lock();
        let state = &mut inner.state;
        state.raw_input.clear();

        let Some(card) = state.card.as_ref() else {
            return state.stage;
        };
        if !state.stage.accepts_input() {
            return state.stage;
        }

        let trimmed = input.trim();
        let answer = alignment::classify(trimmed, &card.word);
        let from = state.stage;
        let transition = from.on_answer(answer);

        if answer != Answer::Empty {
            state.last_user_answer = trimmed.to_string();
        }
        if transition.reveal_translation {
            state.translation_revealed = true;
        }
        if let Some(correct) = transition.verdict {
            state.was_correct = correct;
        }

        state.feedback = if transition.stage == Stage::Incorrect && answer == Answer::Wrong {
            Some(alignment::feedback(trimmed, &card.word))
        } else if transition.stage == Stage::Incorrect {
            state.feedback.take()
        } else {
            None
        };

        tracing::debug!(
            card_id = %card.id,
            ?from,
            to = ?transition.stage,
            ?answer,
            "Stage transition"
        );
        state.stage = transition.stage;
        state.stage
    }

    /// Record the verdict of a finished card and move on. Only valid in `Final`.
    pub async fn continue_study(&self) -> Advance {
        let pending = {
            let inner = self.lock();
            match (&inner.state.card, inner.state.stage) {
                (Some(card), Stage::Final) => Some((card.id.clone(), inner.state.was_correct)),
                _ => None,
            }
        };

        match pending {
            Some((card_id, correct)) => self.submit_and_advance(card_id, correct).await,
            None => Advance::Skipped,
        }
    }

    /// Set the verdict by hand and move on. Only valid in `Incorrect`.
    pub async fn override_verdict(&self, correct: bool) -> Advance {
        let card_id = {
            let inner = self.lock();
            if !inner.state.stage.allows_override() {
                return Advance::Skipped;
            }
            inner.state.current_card_id().map(str::to_string)
        };

        match card_id {
            Some(card_id) => {
                tracing::info!(%card_id, correct, "Verdict overridden");
                self.submit_and_advance(card_id, correct).await
            }
            None => Advance::Skipped,
        }
    }

    /// Remove the current card from the collection and move on without a
    /// verdict.
    pub async fn delete_card(&self) -> Advance {
        let Some(card_id) = self.lock().state.current_card_id().map(str::to_string) else {
            return Advance::Skipped;
        };
        let Some((_ticket, generation)) = self.claim(&card_id) else {
            tracing::debug!(%card_id, "Delete dropped, submission in flight");
            return Advance::Skipped;
        };

        match self.scheduler.delete_card(&card_id).await {
            Ok(()) => {
                tracing::info!(%card_id, "Card deleted");
                self.advance_past(&card_id, generation).await
            }
            Err(e) => {
                tracing::warn!(%card_id, "Failed to delete card: {}", e);
                self.fetch_into(generation).await
            }
        }
    }

    /// Send a verdict once and load the following card.
    ///
    /// The guard is claimed and the card cleared before the first await, so a
    /// second trigger for the same card is a no-op.
    pub async fn submit_and_advance(&self, card_id: String, correct: bool) -> Advance {
        let Some((_ticket, generation)) = self.claim(&card_id) else {
            tracing::debug!(%card_id, "Submission dropped, one already in flight");
            return Advance::Skipped;
        };

        match self.scheduler.submit_verdict(&card_id, correct).await {
            Ok(()) => {
                tracing::info!(%card_id, correct, "Verdict recorded");
                self.advance_past(&card_id, generation).await
            }
            Err(e) => {
                // Unanswered, so seeing this card again is legitimate.
                tracing::warn!(%card_id, "Failed to send answer: {}", e);
                self.fetch_into(generation).await
            }
        }
    }

    /// Fetch until a card other than `answered` shows up, within the retry
    /// bound.
    async fn advance_past(&self, answered: &str, generation: u64) -> Advance {
        tokio::time::sleep(self.timing.first_fetch_delay).await;

        for attempt in 1..=self.timing.max_fetch_attempts {
            match self.scheduler.fetch_next_card().await {
                Ok(Some(card)) if card.id != answered => {
                    return self.apply_card(Some(card), generation);
                }
                Ok(Some(_)) => {
                    tracing::debug!(
                        card_id = %answered,
                        attempt,
                        "Scheduler returned the answered card"
                    );
                    if attempt < self.timing.max_fetch_attempts {
                        tokio::time::sleep(self.timing.retry_delay).await;
                    }
                }
                Ok(None) => return self.apply_card(None, generation),
                Err(e) => {
                    tracing::warn!("Failed to load card: {}", e);
                    return self.apply_failure(generation);
                }
            }
        }

        tracing::info!(
            card_id = %answered,
            attempts = self.timing.max_fetch_attempts,
            "Answered card kept coming back, treating queue as empty"
        );
        self.apply_card(None, generation)
    }

    async fn fetch_into(&self, generation: u64) -> Advance {
        match self.scheduler.fetch_next_card().await {
            Ok(card) => self.apply_card(card, generation),
            Err(e) => {
                tracing::warn!("Failed to load card: {}", e);
                self.apply_failure(generation)
            }
        }
    }

    /// Claim the guard for `card_id` and start a new load generation.
    ///
    /// Both happen under the state lock, so a plain reload cannot slip in
    /// between them.
    fn claim(&self, card_id: &str) -> Option<(SubmissionTicket, u64)> {
        let mut inner = self.lock();
        let ticket = self.guard.try_begin(card_id)?;
        Some((ticket, Self::next_generation(&mut inner)))
    }

    /// Clear the displayed card and start a new load generation.
    fn next_generation(inner: &mut Inner) -> u64 {
        inner.generation += 1;
        inner.state = SessionState {
            loading: true,
            ..SessionState::default()
        };
        inner.generation
    }

    fn apply_card(&self, card: Option<Card>, generation: u64) -> Advance {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Dropping result of superseded load");
            return Advance::Superseded;
        }

        let advance = match &card {
            Some(card) => {
                tracing::info!(card_id = %card.id, "Loaded card");
                Advance::NextCard
            }
            None => {
                tracing::info!("No cards available");
                Advance::Exhausted
            }
        };
        inner.state = SessionState::for_card(card);
        advance
    }

    fn apply_failure(&self, generation: u64) -> Advance {
        let mut inner = self.lock();
        if inner.generation != generation {
            return Advance::Superseded;
        }
        inner.state = SessionState::default();
        Advance::Failed
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
