use async_trait::async_trait;
use quiz_core::model::{DailyResult, QuizDay};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a day's result: `{"score":3,"total":5,"time":42}`.
/// `time` is whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyResultRecord {
    pub score: u32,
    pub total: u32,
    pub time: u64,
}

impl DailyResultRecord {
    #[must_use]
    pub fn from_result(result: &DailyResult) -> Self {
        Self {
            score: result.score(),
            total: result.total(),
            time: result.elapsed_seconds(),
        }
    }

    /// Convert the record back into a domain `DailyResult`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored score exceeds the total.
    pub fn into_result(self) -> Result<DailyResult, StorageError> {
        DailyResult::new(self.score, self.total, self.time)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Decode a raw stored value into a domain result.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed or inconsistent values.
pub fn decode_result(raw: &str) -> Result<DailyResult, StorageError> {
    DailyResultRecord::from_json(raw)?.into_result()
}

/// A stored result together with the day it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredResult {
    pub day: QuizDay,
    pub result: DailyResult,
}

/// Repository contract for per-day quiz results.
///
/// Results are keyed by `QuizDay::storage_key`. A day's result is written
/// once: the first writer wins.
#[async_trait]
pub trait DailyResultRepository: Send + Sync {
    /// Fetch the result stored for `day`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if a value exists but cannot be
    /// decoded, or other storage errors.
    async fn get_result(&self, day: QuizDay) -> Result<Option<DailyResult>, StorageError>;

    /// Store the result for `day`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the day already has a value.
    async fn insert_result(&self, day: QuizDay, result: &DailyResult) -> Result<(), StorageError>;

    /// Store the result for `day`, overwriting whatever value is there.
    ///
    /// Only meant for replacing a value that can no longer be decoded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn replace_result(
        &self,
        day: QuizDay,
        result: &DailyResult,
    ) -> Result<(), StorageError>;

    /// List decodable results, newest day first. Undecodable values are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn list_results(&self, limit: u32) -> Result<Vec<StoredResult>, StorageError>;

    /// Delete every stored result for days strictly before `day`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn prune_before(&self, day: QuizDay) -> Result<u64, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Values are kept serialized, exactly as a durable key/value store would
/// hold them.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under `key`, replacing anything already there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.into(), value.into());
        Ok(())
    }

    /// Number of stored keys, decodable or not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn key_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl DailyResultRepository for InMemoryRepository {
    async fn get_result(&self, day: QuizDay) -> Result<Option<DailyResult>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&day.storage_key())
            .map(String::as_str)
            .map(decode_result)
            .transpose()
    }

    async fn insert_result(&self, day: QuizDay, result: &DailyResult) -> Result<(), StorageError> {
        let value = DailyResultRecord::from_result(result).to_json()?;
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let key = day.storage_key();
        if guard.contains_key(&key) {
            return Err(StorageError::Conflict);
        }
        guard.insert(key, value);
        Ok(())
    }

    async fn replace_result(
        &self,
        day: QuizDay,
        result: &DailyResult,
    ) -> Result<(), StorageError> {
        let value = DailyResultRecord::from_result(result).to_json()?;
        self.insert_raw(day.storage_key(), value)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<StoredResult>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for (key, raw) in guard.iter().rev() {
            if out.len() >= limit {
                break;
            }
            let Some(day) = QuizDay::from_storage_key(key) else {
                continue;
            };
            match decode_result(raw) {
                Ok(result) => out.push(StoredResult { day, result }),
                Err(err) => warn!(%key, error = %err, "skipping undecodable quiz result"),
            }
        }
        Ok(out)
    }

    async fn prune_before(&self, day: QuizDay) -> Result<u64, StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|key, _| QuizDay::from_storage_key(key).is_none_or(|stored| stored >= day));
        Ok(u64::try_from(before - guard.len()).unwrap_or(u64::MAX))
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub results: Arc<dyn DailyResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let results: Arc<dyn DailyResultRepository> = Arc::new(InMemoryRepository::new());
        Self { results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> QuizDay {
        QuizDay::new(NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
    }

    #[test]
    fn record_uses_wire_field_names() {
        let result = DailyResult::new(3, 5, 42).unwrap();
        let json = DailyResultRecord::from_result(&result).to_json().unwrap();
        assert_eq!(json, r#"{"score":3,"total":5,"time":42}"#);
        assert_eq!(decode_result(&json).unwrap(), result);
    }

    #[test]
    fn inconsistent_record_is_a_serialization_error() {
        let err = decode_result(r#"{"score":9,"total":5,"time":1}"#).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        let err = decode_result("not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn first_write_wins() {
        let repo = InMemoryRepository::new();
        let first = DailyResult::new(4, 5, 30).unwrap();
        repo.insert_result(day(1), &first).await.unwrap();

        let second = DailyResult::new(5, 5, 10).unwrap();
        let err = repo.insert_result(day(1), &second).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
        assert_eq!(repo.get_result(day(1)).await.unwrap(), Some(first));
        assert_eq!(repo.get_result(day(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lists_newest_first_and_skips_garbage() {
        let repo = InMemoryRepository::new();
        for d in 1..=3 {
            let result = DailyResult::new(d, 5, u64::from(d)).unwrap();
            repo.insert_result(day(d), &result).await.unwrap();
        }
        repo.insert_raw(day(4).storage_key(), "{broken").unwrap();
        repo.insert_raw("theme", "dark").unwrap();

        let listed = repo.list_results(10).await.unwrap();
        let days: Vec<_> = listed.iter().map(|r| r.day).collect();
        assert_eq!(days, vec![day(3), day(2), day(1)]);

        let limited = repo.list_results(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].day, day(3));
    }

    #[tokio::test]
    async fn prune_drops_only_older_days() {
        let repo = InMemoryRepository::new();
        let result = DailyResult::new(1, 5, 9).unwrap();
        for d in 1..=4 {
            repo.insert_result(day(d), &result).await.unwrap();
        }
        repo.insert_raw("theme", "dark").unwrap();

        let removed = repo.prune_before(day(3)).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(repo.key_count().unwrap(), 3);
        assert!(repo.get_result(day(2)).await.unwrap().is_none());
        assert!(repo.get_result(day(3)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn replace_overwrites_corrupted_value() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(day(9).storage_key(), "{broken").unwrap();
        assert!(repo.get_result(day(9)).await.is_err());

        let result = DailyResult::new(2, 5, 40).unwrap();
        repo.replace_result(day(9), &result).await.unwrap();
        assert_eq!(repo.get_result(day(9)).await.unwrap(), Some(result));
    }
}
