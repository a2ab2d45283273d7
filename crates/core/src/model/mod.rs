mod day;
mod result;
mod session;
mod vocab;

pub use day::QuizDay;
pub use result::{DailyResult, DailyResultError};
pub use session::{
    DAILY_QUIZ_SIZE, EntryFeedback, EntryState, QuizSession, QuizSessionError, Submission,
    elapsed_seconds,
};
pub use vocab::{EntryError, GenderCode, GenderCodeError, VocabEntry};
