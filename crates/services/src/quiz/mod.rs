mod service;
mod state;

// Public API of the daily quiz subsystem.
pub use crate::error::QuizError;
pub use service::DailyQuizService;
pub use state::QuizState;
