use quiz_core::countdown::Countdown;
use quiz_core::model::{DailyResult, QuizSession};

/// Where today's quiz stands.
///
/// `NotStarted` -> `InProgress` -> `Completed`. `Completed` is terminal for
/// the calendar day; the next day has a different storage key and starts
/// over at `NotStarted`.
#[derive(Debug, Clone)]
pub enum QuizState {
    NotStarted,
    InProgress(QuizSession),
    Completed {
        result: DailyResult,
        countdown: Countdown,
    },
}

impl QuizState {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, QuizState::Completed { .. })
    }

    #[must_use]
    pub fn result(&self) -> Option<&DailyResult> {
        match self {
            QuizState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }
}
