//! Line-oriented terminal front-end.

use std::fmt::Write as _;
use std::io::Write as _;

use drill_core::{CharMark, Stage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::scheduler::{HttpScheduler, LimitKind};
use crate::session::{Advance, StudySession};
use crate::state::SessionState;

/// A parsed line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Answer(String),
    Continue,
    Override,
    Delete,
    More(LimitKind, u32),
    Quit,
    Unknown(String),
}

/// Interpret one input line for the given stage.
pub fn parse_command(line: &str, stage: Stage) -> Command {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix(':') {
        let mut parts = rest.split_whitespace();
        return match (parts.next(), parts.next(), parts.next()) {
            (Some("ok"), None, None) => Command::Override,
            (Some("delete"), None, None) => Command::Delete,
            (Some("quit" | "q"), None, None) => Command::Quit,
            (Some("more"), Some(kind), Some(amount)) => {
                let kind = match kind {
                    "new" => Some(LimitKind::New),
                    "due" => Some(LimitKind::Due),
                    _ => None,
                };
                match (kind, amount.parse::<u32>()) {
                    (Some(kind), Ok(amount)) if amount > 0 => Command::More(kind, amount),
                    _ => Command::Unknown(trimmed.to_string()),
                }
            }
            _ => Command::Unknown(trimmed.to_string()),
        };
    }

    if stage.is_terminal() {
        Command::Continue
    } else {
        Command::Answer(line.to_string())
    }
}

/// Whether a reply to a yes/no prompt means yes. Anything else is no.
pub fn is_confirmation(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Render feedback marks: matches as-is, wrong characters in `[ ]`, gap fills
/// in `( )`.
pub fn render_marks(marks: &[CharMark]) -> String {
    let mut out = String::new();
    for mark in marks {
        if mark.is_match {
            out.push(mark.character);
        } else if mark.is_gap_fill {
            let _ = write!(out, "({})", mark.character);
        } else {
            let _ = write!(out, "[{}]", mark.character);
        }
    }
    out
}

/// Render the whole screen for a session state.
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();

    let Some(card) = state.card.as_ref() else {
        if state.loading {
            out.push_str("Loading...\n");
        } else {
            out.push_str("No cards available\n");
            out.push_str("You've completed all cards for today! (:more new N to add more)\n");
        }
        return out;
    };

    if let Some(meta) = &card.meta {
        let _ = writeln!(out, "{}", meta);
    }
    let _ = writeln!(out, "{}", card.definition.as_deref().unwrap_or("No definition"));

    if state.translation_revealed {
        if let Some(translation) = &card.translation {
            let _ = writeln!(out, "{}", translation);
        }
    }

    if let (true, Some(feedback)) = (state.stage.shows_feedback(), &state.feedback) {
        let _ = writeln!(out, "{}", render_marks(&feedback.input_marks));
        let _ = writeln!(out, "{}", render_marks(&feedback.target_marks));
    }

    if state.stage.reveals_word() {
        let check = if state.stage == Stage::Final && state.was_correct { " ✓" } else { "" };
        let _ = writeln!(out, "{}{}", card.word, check);
    }

    if state.stage.shows_feedback() || state.stage.reveals_word() {
        for extra in [&card.pronunciation, &card.example, &card.example_translation]
            .into_iter()
            .flatten()
        {
            let _ = writeln!(out, "{}", extra);
        }
    }

    out.push_str(match state.stage {
        Stage::Final => "[Enter] continue   :delete remove card\n",
        Stage::Incorrect => "Type the word   :ok actually correct   :delete remove card\n",
        _ => "Type the word (empty line for a hint)\n",
    });
    out
}

/// Drive a session from line input until EOF or `:quit`.
pub async fn run_loop<R>(
    session: &StudySession<HttpScheduler>,
    scheduler: &HttpScheduler,
    input: R,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut stdout = std::io::stdout();

    session.load_next_card().await;

    loop {
        write!(stdout, "\n{}> ", render(&session.snapshot()))?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = parse_command(&line, session.stage());
        if session.snapshot().card.is_none()
            && matches!(command, Command::Answer(_) | Command::Continue)
        {
            session.load_next_card().await;
            continue;
        }

        let advance = match command {
            Command::Answer(text) => {
                session.handle_answer(&text);
                None
            }
            Command::Continue => Some(session.continue_study().await),
            Command::Override => Some(session.override_verdict(true).await),
            Command::Delete => {
                write!(stdout, "Delete card? Are you sure you want to delete this card? [y/N] ")?;
                stdout.flush()?;
                match lines.next_line().await? {
                    Some(reply) if is_confirmation(&reply) => Some(session.delete_card().await),
                    Some(_) => None,
                    None => break,
                }
            }
            Command::More(kind, amount) => {
                if let Err(e) = scheduler.increase_limit(kind, amount).await {
                    tracing::warn!("Failed to increase limit: {}", e);
                }
                Some(session.load_next_card().await)
            }
            Command::Quit => break,
            Command::Unknown(text) => {
                writeln!(stdout, "Unknown command: {}", text)?;
                None
            }
        };

        if advance == Some(Advance::Failed) {
            writeln!(stdout, "Could not reach the server; press Enter to retry")?;
        }
    }

    Ok(())
}
