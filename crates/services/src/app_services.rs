use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{DAILY_QUIZ_SIZE, VocabEntry};
use quiz_core::sampler::SamplerError;
use storage::repository::Storage;
use storage::vocab::load_entries;
use tracing::info;

use crate::Clock;
use crate::error::AppServicesError;
use crate::quiz::DailyQuizService;

/// Assembles app-facing services from storage and the word list.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    quiz: Arc<DailyQuizService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the word list at `words_path`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the word list is unusable or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        words_path: &Path,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let entries = load_entries(words_path)?;
        let storage = Storage::sqlite(db_url).await?;
        info!(words = entries.len(), path = %words_path.display(), "word list ready");
        Self::from_parts(storage, entries, clock)
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sampler` if there are too few entries for a quiz.
    pub fn in_memory(entries: Vec<VocabEntry>, clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_parts(Storage::in_memory(), entries, clock)
    }

    fn from_parts(
        storage: Storage,
        entries: Vec<VocabEntry>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        if entries.len() < DAILY_QUIZ_SIZE {
            return Err(SamplerError::NotEnoughEntries {
                available: entries.len(),
                count: DAILY_QUIZ_SIZE,
            }
            .into());
        }
        let quiz = Arc::new(DailyQuizService::new(
            clock,
            entries,
            Arc::clone(&storage.results),
        ));
        Ok(Self { storage, quiz })
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<DailyQuizService> {
        Arc::clone(&self.quiz)
    }
}
