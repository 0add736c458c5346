//! Contract with the remote card scheduler.

mod http;

pub use http::{HttpScheduler, LimitKind};

use async_trait::async_trait;
use drill_core::Card;

/// Scheduler errors.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Not authenticated - please log in first")]
    NotAuthenticated,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// The remote side of a study session.
///
/// `fetch_next_card` may hand back a card that was just answered while the
/// scheduler catches up; callers must tolerate that. `submit_verdict` is not
/// idempotent.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Next due card, or `None` when the queue is empty.
    async fn fetch_next_card(&self) -> Result<Option<Card>, SchedulerError>;

    async fn submit_verdict(&self, card_id: &str, correct: bool) -> Result<(), SchedulerError>;

    async fn delete_card(&self, card_id: &str) -> Result<(), SchedulerError>;
}
