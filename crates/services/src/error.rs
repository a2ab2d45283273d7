//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{DailyResult, QuizSessionError};
use quiz_core::sampler::SamplerError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use storage::vocab::VocabError;

/// Errors emitted by `DailyQuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// Today's result is already recorded; carries the stored result.
    #[error("today's quiz is already completed")]
    AlreadyCompleted(DailyResult),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    #[error(transparent)]
    Session(#[from] QuizSessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Vocab(#[from] VocabError),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}
