use thiserror::Error;

use crate::model::{DailyResultError, EntryError, GenderCodeError, QuizSessionError};
use crate::sampler::SamplerError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    #[error(transparent)]
    Session(#[from] QuizSessionError),
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    GenderCode(#[from] GenderCodeError),
    #[error(transparent)]
    Result(#[from] DailyResultError),
}
