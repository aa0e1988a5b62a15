//! Study session management for self-quiz practice.
//! Cards are shuffled once at the start and drawn one at a time until the queue runs out.

use super::Flashcard;
use chrono::{DateTime, Local};
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// A flashcard is waiting for an answer.
    Active,
    /// Every card has been answered.
    Exhausted,
}

/// Result of checking a single answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { expected: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub correct: usize,
    pub incorrect: usize,
}

/// A single pass over one group's flashcards in random order.
/// Every submitted answer is counted exactly once; there is no retry.
pub struct StudySession {
    pub group_name: String,
    queue: Vec<Flashcard>,
    current: Option<Flashcard>,
    stats: SessionStats,
    started_at: DateTime<Local>,
}

impl StudySession {
    /// Starts a session with the thread-local RNG.
    pub fn start(group_name: impl Into<String>, flashcards: &[Flashcard]) -> Self {
        Self::start_with_rng(group_name, flashcards, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        group_name: impl Into<String>,
        flashcards: &[Flashcard],
        rng: &mut R,
    ) -> Self {
        let mut queue = flashcards.to_vec();
        queue.shuffle(rng);
        let current = queue.pop();

        Self {
            group_name: group_name.into(),
            queue,
            current,
            stats: SessionStats::default(),
            started_at: Local::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::Active
        } else {
            SessionState::Exhausted
        }
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.current.as_ref()
    }

    /// Checks the answer for the current card and moves on to the next one.
    /// Returns `None` when the session is already exhausted.
    pub fn submit_answer(&mut self, attempt: &str) -> Option<AnswerOutcome> {
        let card = self.current.take()?;

        let outcome = if card.is_correct(attempt) {
            self.stats.correct += 1;
            AnswerOutcome::Correct
        } else {
            self.stats.incorrect += 1;
            AnswerOutcome::Incorrect {
                expected: card.answer,
            }
        };

        self.current = self.queue.pop();
        Some(outcome)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Cards not yet answered, including the current one.
    pub fn remaining(&self) -> usize {
        self.queue.len() + usize::from(self.current.is_some())
    }

    pub fn answered(&self) -> usize {
        self.stats.correct + self.stats.incorrect
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> chrono::Duration {
        Local::now() - self.started_at
    }

    pub fn progress_message(&self) -> String {
        format!(
            "{}: {} answered, {} remaining",
            self.group_name,
            self.answered(),
            self.remaining()
        )
    }
}

/// Formats a duration as `1m 05s` for the stats dialog
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}m {:02}s", secs / 60, secs % 60)
}
