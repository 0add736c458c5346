//! Disclosure stages of a card presentation and their transitions.

use crate::types::{Answer, Stage, Transition};

impl Stage {
    /// Apply one submitted answer.
    ///
    /// Reaching `Final` from `MustType` always records `false`: the word was
    /// already shown, so typing it back is not recall.
    pub fn on_answer(self, answer: Answer) -> Transition {
        use Answer::*;
        use Stage::*;

        match (self, answer) {
            (Definition, Empty) => Transition::reveal(WithTranslation),
            (WithTranslation, Empty) => Transition::reveal(MustType),
            (Incorrect | MustType | Final, Empty) => Transition::stay(self),

            (Definition | WithTranslation | Incorrect | MustType, Wrong) => {
                Transition::verdict(Incorrect, false)
            }

            (Definition | WithTranslation | Incorrect, Exact) => Transition::verdict(Final, true),
            (MustType, Exact) => Transition::verdict(Final, false),

            (Final, _) => Transition::stay(Final),
        }
    }

    /// Whether the translation is on screen in this stage.
    pub fn reveals_translation(self) -> bool {
        !matches!(self, Self::Definition)
    }

    /// Whether the target word is on screen in this stage.
    pub fn reveals_word(self) -> bool {
        matches!(self, Self::MustType | Self::Final)
    }

    /// Whether the typed-vs-target feedback lines are on screen.
    pub fn shows_feedback(self) -> bool {
        matches!(self, Self::Incorrect)
    }

    pub fn accepts_input(self) -> bool {
        !matches!(self, Self::Final)
    }

    /// Whether the learner may set the verdict by hand.
    pub fn allows_override(self) -> bool {
        matches!(self, Self::Incorrect)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Final)
    }
}

impl Transition {
    fn stay(stage: Stage) -> Self {
        Self {
            stage,
            verdict: None,
            reveal_translation: false,
        }
    }

    fn reveal(stage: Stage) -> Self {
        Self {
            stage,
            verdict: None,
            reveal_translation: true,
        }
    }

    fn verdict(stage: Stage, correct: bool) -> Self {
        Self {
            stage,
            verdict: Some(correct),
            reveal_translation: true,
        }
    }
}
