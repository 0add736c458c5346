//! Single-flight guard for verdict submission.
//!
//! A learner can fire the same action twice (double click, click plus
//! Enter) before the first submission finishes. The guard is claimed
//! synchronously, before the first await, so the second trigger always sees
//! it taken.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Delays and retry bound used while advancing to the next card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardTiming {
    /// Pause before the first fetch so the scheduler can apply the verdict.
    pub first_fetch_delay: Duration,
    /// Pause between fetches that returned the card just answered.
    pub retry_delay: Duration,
    pub max_fetch_attempts: u32,
}

impl Default for GuardTiming {
    fn default() -> Self {
        Self {
            first_fetch_delay: Duration::from_millis(100),
            retry_delay: Duration::from_millis(200),
            max_fetch_attempts: 5,
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    active: bool,
    card_id: Option<String>,
}

/// Tracks whether a submission is in flight, and for which card.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    inner: Arc<Mutex<InFlight>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard for `card_id`.
    ///
    /// Returns `None` if any submission is in flight. The returned ticket
    /// releases the guard when dropped, on every exit path.
    pub fn try_begin(&self, card_id: &str) -> Option<SubmissionTicket> {
        let mut in_flight = self.lock();
        if in_flight.active || in_flight.card_id.as_deref() == Some(card_id) {
            return None;
        }
        in_flight.active = true;
        in_flight.card_id = Some(card_id.to_string());

        Some(SubmissionTicket {
            guard: self.clone(),
            card_id: card_id.to_string(),
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().active
    }

    /// Card currently being submitted, if any.
    pub fn submitting_card_id(&self) -> Option<String> {
        self.lock().card_id.clone()
    }

    fn release(&self) {
        let mut in_flight = self.lock();
        in_flight.active = false;
        in_flight.card_id = None;
    }

    fn lock(&self) -> MutexGuard<'_, InFlight> {
        // The state is two plain fields; a poisoned lock still holds valid data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Proof that the holder owns the in-flight slot.
#[derive(Debug)]
pub struct SubmissionTicket {
    guard: SubmissionGuard,
    card_id: String,
}

impl SubmissionTicket {
    pub fn card_id(&self) -> &str {
        &self.card_id
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.guard.release();
    }
}
