use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::grader::{self, Grade};
use crate::model::{DailyResult, DailyResultError, QuizDay, VocabEntry};

/// Number of words in each day's quiz.
pub const DAILY_QUIZ_SIZE: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("session has no entries")]
    Empty,

    #[error("entry {index} is out of range (session has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("entry {index} was already graded")]
    AlreadyGraded { index: usize },

    #[error("{ungraded} entries are still ungraded")]
    Incomplete { ungraded: usize },

    #[error("expected {expected} answers, got {got}")]
    AnswerCount { expected: usize, got: usize },

    #[error(transparent)]
    Result(#[from] DailyResultError),
}

/// Grading state of one entry in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
    #[default]
    Ungraded,
    Correct,
    Incorrect,
}

/// Per-entry feedback produced on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFeedback {
    pub word: String,
    pub answer: String,
    pub is_correct: bool,
    pub expected_word: &'static str,
}

/// A graded, finished quiz: the persisted result plus what to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub day: QuizDay,
    pub result: DailyResult,
    pub feedback: Vec<EntryFeedback>,
}

/// One day's quiz in progress.
///
/// Each entry can be graded exactly once. `finish` consumes the session, so
/// a submitted quiz cannot be graded again.
#[derive(Debug, Clone)]
pub struct QuizSession {
    day: QuizDay,
    entries: Vec<VocabEntry>,
    states: Vec<EntryState>,
    answers: Vec<String>,
    started_at: DateTime<FixedOffset>,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if no entries are provided.
    pub fn new(
        day: QuizDay,
        entries: Vec<VocabEntry>,
        started_at: DateTime<FixedOffset>,
    ) -> Result<Self, QuizSessionError> {
        if entries.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        let len = entries.len();
        Ok(Self {
            day,
            entries,
            states: vec![EntryState::Ungraded; len],
            answers: vec![String::new(); len],
            started_at,
        })
    }

    #[must_use]
    pub fn day(&self) -> QuizDay {
        self.day
    }

    #[must_use]
    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    #[must_use]
    pub fn states(&self) -> &[EntryState] {
        &self.states
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<FixedOffset> {
        self.started_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn ungraded(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == EntryState::Ungraded)
            .count()
    }

    #[must_use]
    pub fn is_fully_graded(&self) -> bool {
        self.ungraded() == 0
    }

    #[must_use]
    pub fn elapsed_seconds(&self, at: DateTime<FixedOffset>) -> u64 {
        elapsed_seconds(self.started_at, at)
    }

    /// Grade the entry at `index` against `raw` and lock it.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for a bad index and `AlreadyGraded` if the entry
    /// already has a grade.
    pub fn grade_entry(&mut self, index: usize, raw: &str) -> Result<Grade, QuizSessionError> {
        let len = self.entries.len();
        let Some(entry) = self.entries.get(index) else {
            return Err(QuizSessionError::OutOfRange { index, len });
        };
        if self.states[index] != EntryState::Ungraded {
            return Err(QuizSessionError::AlreadyGraded { index });
        }

        let grade = grader::grade(raw, entry.expected());
        self.states[index] = if grade.is_correct {
            EntryState::Correct
        } else {
            EntryState::Incorrect
        };
        raw.clone_into(&mut self.answers[index]);
        Ok(grade)
    }

    /// Grade every entry in order. Answers must line up with entries.
    ///
    /// # Errors
    ///
    /// Returns `AnswerCount` on a length mismatch, or any `grade_entry` error.
    pub fn grade_all<S: AsRef<str>>(&mut self, answers: &[S]) -> Result<(), QuizSessionError> {
        if answers.len() != self.entries.len() {
            return Err(QuizSessionError::AnswerCount {
                expected: self.entries.len(),
                got: answers.len(),
            });
        }
        for (index, answer) in answers.iter().enumerate() {
            self.grade_entry(index, answer.as_ref())?;
        }
        Ok(())
    }

    /// Close the session and compute the day's result.
    ///
    /// # Errors
    ///
    /// Returns `Incomplete` if any entry is still ungraded.
    pub fn finish(
        self,
        submitted_at: DateTime<FixedOffset>,
    ) -> Result<Submission, QuizSessionError> {
        let ungraded = self.ungraded();
        if ungraded > 0 {
            return Err(QuizSessionError::Incomplete { ungraded });
        }

        let elapsed = self.elapsed_seconds(submitted_at);
        let mut score = 0_u32;
        let mut feedback = Vec::with_capacity(self.entries.len());
        for ((entry, state), answer) in self.entries.into_iter().zip(self.states).zip(self.answers)
        {
            let is_correct = state == EntryState::Correct;
            if is_correct {
                score = score.saturating_add(1);
            }
            feedback.push(EntryFeedback {
                word: entry.word().to_owned(),
                answer,
                is_correct,
                expected_word: entry.expected().article(),
            });
        }

        let total = u32::try_from(feedback.len()).unwrap_or(u32::MAX);
        Ok(Submission {
            day: self.day,
            result: DailyResult::new(score, total, elapsed)?,
            feedback,
        })
    }
}

/// Whole seconds between two instants, truncated. Never negative.
#[must_use]
pub fn elapsed_seconds(started_at: DateTime<FixedOffset>, at: DateTime<FixedOffset>) -> u64 {
    u64::try_from((at - started_at).num_seconds()).unwrap_or(0)
}
