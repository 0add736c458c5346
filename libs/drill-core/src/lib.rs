//! Core word-drilling library.
//!
//! Provides:
//! - Edit-distance character alignment and feedback rendering
//! - The disclosure stage machine for a single card presentation
//! - Shared types (Card, Stage, CharMark, etc.)

pub mod alignment;
pub mod stage;
pub mod types;

pub use alignment::{
    align, classify, feedback, is_exact_match, render_input_marks,
    render_target_with_gaps_filled, AlignmentResult, GAP_MARKER,
};
pub use types::{Answer, Card, CharMark, Feedback, Stage, Transition};
