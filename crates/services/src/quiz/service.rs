use std::fmt;
use std::sync::Arc;

use chrono::Days;
use quiz_core::countdown::Countdown;
use quiz_core::model::{DAILY_QUIZ_SIZE, DailyResult, QuizDay, QuizSession, Submission, VocabEntry};
use quiz_core::sampler;
use storage::repository::{DailyResultRepository, StorageError, StoredResult};
use tracing::{debug, info, warn};

use super::state::QuizState;
use crate::Clock;
use crate::error::QuizError;

/// Once-per-day quiz gate.
///
/// Owns the word list, the result repository and the clock. Today's quiz is
/// available until a result is stored under today's key; after that the
/// stored result is returned instead, until the date rolls over.
#[derive(Clone)]
pub struct DailyQuizService {
    clock: Clock,
    entries: Arc<[VocabEntry]>,
    results: Arc<dyn DailyResultRepository>,
}

impl DailyQuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        entries: Vec<VocabEntry>,
        results: Arc<dyn DailyResultRepository>,
    ) -> Self {
        Self {
            clock,
            entries: entries.into(),
            results,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    #[must_use]
    pub fn today(&self) -> QuizDay {
        QuizDay::of(&self.clock.now())
    }

    /// The entries quizzed on `day`, in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Sampler` if the word list is too short.
    pub fn entries_for(&self, day: QuizDay) -> Result<Vec<VocabEntry>, QuizError> {
        let indices = sampler::sample(self.entries.len(), DAILY_QUIZ_SIZE, day.seed())?;
        Ok(indices
            .into_iter()
            .map(|i| self.entries[i].clone())
            .collect())
    }

    /// Result already recorded for today, if any.
    ///
    /// A stored value that cannot be decoded counts as "not completed".
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the repository cannot be read.
    pub async fn has_completed_today(&self) -> Result<Option<DailyResult>, QuizError> {
        let day = self.today();
        match self.results.get_result(day).await {
            Ok(result) => Ok(result),
            Err(StorageError::Serialization(reason)) => {
                warn!(%day, %reason, "ignoring unreadable quiz result");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// `NotStarted` or `Completed`, without starting anything.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the repository cannot be read.
    pub async fn state(&self) -> Result<QuizState, QuizError> {
        Ok(match self.has_completed_today().await? {
            Some(result) => self.completed(result),
            None => QuizState::NotStarted,
        })
    }

    /// Move out of `NotStarted`: start today's session, or report the
    /// completed result if there already is one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` for storage or sampling failures.
    pub async fn open(&self) -> Result<QuizState, QuizError> {
        match self.start_session().await {
            Ok(session) => Ok(QuizState::InProgress(session)),
            Err(QuizError::AlreadyCompleted(result)) => Ok(self.completed(result)),
            Err(err) => Err(err),
        }
    }

    /// Build today's session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` if today's result exists, or
    /// `QuizError::Sampler` if there are too few entries.
    pub async fn start_session(&self) -> Result<QuizSession, QuizError> {
        if let Some(result) = self.has_completed_today().await? {
            return Err(QuizError::AlreadyCompleted(result));
        }

        let started_at = self.clock.now();
        let day = QuizDay::of(&started_at);
        let entries = self.entries_for(day)?;
        debug!(%day, seed = day.seed(), "starting daily quiz");
        Ok(QuizSession::new(day, entries, started_at)?)
    }

    /// Grade every answer, close the session and record the result under the
    /// session's day.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the answers do not match the session,
    /// `QuizError::AlreadyCompleted` if the day was recorded in the meantime,
    /// or `QuizError::Storage` if the result cannot be written.
    pub async fn submit_answers<S: AsRef<str>>(
        &self,
        mut session: QuizSession,
        answers: &[S],
    ) -> Result<Submission, QuizError> {
        session.grade_all(answers)?;
        let submission = session.finish(self.clock.now())?;
        self.record(submission.day, &submission.result).await?;

        info!(
            day = %submission.day,
            score = submission.result.score(),
            total = submission.result.total(),
            elapsed_seconds = submission.result.elapsed_seconds(),
            "daily quiz submitted"
        );
        Ok(submission)
    }

    async fn record(&self, day: QuizDay, result: &DailyResult) -> Result<(), QuizError> {
        match self.results.insert_result(day, result).await {
            Ok(()) => Ok(()),
            Err(StorageError::Conflict) => match self.results.get_result(day).await {
                Ok(Some(existing)) => {
                    warn!(%day, "daily quiz was already recorded; keeping the first result");
                    Err(QuizError::AlreadyCompleted(existing))
                }
                Ok(None) | Err(StorageError::Serialization(_)) => {
                    warn!(%day, "replacing unreadable quiz result");
                    Ok(self.results.replace_result(day, result).await?)
                }
                Err(err) => Err(err.into()),
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Stored results, newest day first.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the repository cannot be read.
    pub async fn history(&self, limit: u32) -> Result<Vec<StoredResult>, QuizError> {
        Ok(self.results.list_results(limit).await?)
    }

    /// Delete results older than `keep_days` days before today.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the repository cannot be written.
    pub async fn prune_stale_results(&self, keep_days: u32) -> Result<u64, QuizError> {
        let today = self.today().date();
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(keep_days)))
            .map_or(self.today(), QuizDay::new);
        let removed = self.results.prune_before(cutoff).await?;
        info!(%cutoff, removed, "pruned stale quiz results");
        Ok(removed)
    }

    fn completed(&self, result: DailyResult) -> QuizState {
        QuizState::Completed {
            result,
            countdown: Countdown::until_next_midnight(self.clock.now()),
        }
    }
}

impl fmt::Debug for DailyQuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyQuizService")
            .field("clock", &self.clock)
            .field("entries_len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
