use async_trait::async_trait;
use quiz_core::model::{DailyResult, QuizDay};
use sqlx::Row;
use tracing::warn;

use super::SqliteRepository;
use crate::repository::{
    DailyResultRecord, DailyResultRepository, StorageError, StoredResult, decode_result,
};

const KEY_PATTERN: &str = "quiz-done-%";

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

impl SqliteRepository {
    /// Store a raw value under `key`, replacing anything already there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    pub async fn insert_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO quiz_results (key, value)
                VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}

#[async_trait]
impl DailyResultRepository for SqliteRepository {
    async fn get_result(&self, day: QuizDay) -> Result<Option<DailyResult>, StorageError> {
        let row = sqlx::query("SELECT value FROM quiz_results WHERE key = ?1")
            .bind(day.storage_key())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("value").map_err(ser)?;
        decode_result(&raw).map(Some)
    }

    async fn insert_result(&self, day: QuizDay, result: &DailyResult) -> Result<(), StorageError> {
        let value = DailyResultRecord::from_result(result).to_json()?;
        let res = sqlx::query(
            r"
                INSERT INTO quiz_results (key, value)
                VALUES (?1, ?2)
                ON CONFLICT(key) DO NOTHING
            ",
        )
        .bind(day.storage_key())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn replace_result(
        &self,
        day: QuizDay,
        result: &DailyResult,
    ) -> Result<(), StorageError> {
        let value = DailyResultRecord::from_result(result).to_json()?;
        self.insert_raw(&day.storage_key(), &value).await
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<StoredResult>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT key, value
                FROM quiz_results
                WHERE key LIKE ?1
                ORDER BY key DESC
            ",
        )
        .bind(KEY_PATTERN)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for row in rows {
            if out.len() >= limit {
                break;
            }
            let key: String = row.try_get("key").map_err(ser)?;
            let raw: String = row.try_get("value").map_err(ser)?;
            let Some(day) = QuizDay::from_storage_key(&key) else {
                continue;
            };
            match decode_result(&raw) {
                Ok(result) => out.push(StoredResult { day, result }),
                Err(err) => warn!(%key, error = %err, "skipping undecodable quiz result"),
            }
        }
        Ok(out)
    }

    async fn prune_before(&self, day: QuizDay) -> Result<u64, StorageError> {
        // Zero-padded keys sort in date order.
        let res = sqlx::query("DELETE FROM quiz_results WHERE key LIKE ?1 AND key < ?2")
            .bind(KEY_PATTERN)
            .bind(day.storage_key())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(res.rows_affected())
    }
}
