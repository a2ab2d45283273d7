#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod quiz;
pub mod ticker;

pub use quiz_core::Clock;
pub use storage::repository::StoredResult;

pub use app_services::AppServices;
pub use error::{AppServicesError, QuizError};
pub use quiz::{DailyQuizService, QuizState};
pub use ticker::{TickControl, Ticker, countdown_ticker, elapsed_ticker};
