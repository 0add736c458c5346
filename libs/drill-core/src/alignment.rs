//! Character alignment between a typed answer and the target word.
//!
//! The alignment only drives feedback rendering. Correctness is decided by
//! [`is_exact_match`] alone.

use crate::types::{Answer, CharMark, Feedback};
use serde::{Deserialize, Serialize};

/// Glyph shown in place of a character the learner left out.
pub const GAP_MARKER: char = '-';

/// Optimal alignment of two strings. `None` is a gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub input_aligned: Vec<Option<char>>,
    pub target_aligned: Vec<Option<char>>,
}

impl AlignmentResult {
    /// Number of aligned columns.
    pub fn len(&self) -> usize {
        self.input_aligned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_aligned.is_empty()
    }

    /// Iterate over `(input, target)` columns.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<char>, Option<char>)> + '_ {
        self.input_aligned
            .iter()
            .copied()
            .zip(self.target_aligned.iter().copied())
    }

    /// Edit distance realised by this alignment (columns that are not a match).
    pub fn distance(&self) -> usize {
        self.pairs()
            .filter(|(input, target)| input.is_none() || input != target)
            .count()
    }
}

/// Align `input` against `target` with unit-cost substitution, insertion and
/// deletion.
///
/// Backtracking prefers, in order: match, substitution, deletion (extra input
/// character), insertion (missing input character). The same inputs always
/// give the same alignment.
pub fn align(input: &str, target: &str) -> AlignmentResult {
    let a: Vec<char> = input.chars().collect();
    let b: Vec<char> = target.chars().collect();

    let m = a.len();
    let n = b.len();

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                (dp[i - 1][j] + 1) // deletion
                    .min(dp[i][j - 1] + 1) // insertion
                    .min(dp[i - 1][j - 1] + 1) // substitution
            };
        }
    }

    let capacity = m.max(n);
    let mut input_aligned = Vec::with_capacity(capacity);
    let mut target_aligned = Vec::with_capacity(capacity);

    // Walks right to left, so both sequences are reversed at the end.
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            input_aligned.push(Some(a[i - 1]));
            target_aligned.push(Some(b[j - 1]));
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && dp[i][j] == dp[i - 1][j - 1] + 1 {
            input_aligned.push(Some(a[i - 1]));
            target_aligned.push(Some(b[j - 1]));
            i -= 1;
            j -= 1;
        } else if i > 0 && dp[i][j] == dp[i - 1][j] + 1 {
            input_aligned.push(Some(a[i - 1]));
            target_aligned.push(None);
            i -= 1;
        } else {
            // j > 0 here: with j == 0 the deletion branch always holds.
            input_aligned.push(None);
            target_aligned.push(Some(b[j - 1]));
            j -= 1;
        }
    }

    input_aligned.reverse();
    target_aligned.reverse();

    AlignmentResult {
        input_aligned,
        target_aligned,
    }
}

/// Render the typed line: matches, wrong characters, and a gap marker
/// wherever a character is missing.
pub fn render_input_marks(alignment: &AlignmentResult) -> Vec<CharMark> {
    alignment
        .pairs()
        .map(|(input, target)| match input {
            None => CharMark::gap_fill(GAP_MARKER),
            Some(c) if Some(c) == target => CharMark::matched(c),
            Some(c) => CharMark::mismatched(c),
        })
        .collect()
}

/// Render the target line. Extra typed characters are dropped, omitted
/// characters count as filled in, and substituted ones are gap fills.
pub fn render_target_with_gaps_filled(alignment: &AlignmentResult) -> Vec<CharMark> {
    alignment
        .pairs()
        .filter_map(|(input, target)| {
            let t = target?;
            Some(match input {
                Some(c) if c == t => CharMark::matched(t),
                None => CharMark::matched(t),
                Some(_) => CharMark::gap_fill(t),
            })
        })
        .collect()
}

/// Build both feedback lines for a wrong answer.
pub fn feedback(input: &str, target: &str) -> Feedback {
    let alignment = align(input, target);
    Feedback {
        input_marks: render_input_marks(&alignment),
        target_marks: render_target_with_gaps_filled(&alignment),
    }
}

/// Strict character equality. This is the only correctness predicate.
pub fn is_exact_match(input: &str, target: &str) -> bool {
    input == target
}

/// Classify a raw answer. Surrounding whitespace is ignored.
pub fn classify(input: &str, target: &str) -> Answer {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Answer::Empty
    } else if is_exact_match(trimmed, target) {
        Answer::Exact
    } else {
        Answer::Wrong
    }
}
