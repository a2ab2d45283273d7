use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DailyResultError {
    #[error("score ({score}) exceeds total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Outcome of one day's quiz. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyResult {
    score: u32,
    total: u32,
    elapsed_seconds: u64,
}

impl DailyResult {
    /// # Errors
    ///
    /// Returns `DailyResultError::ScoreExceedsTotal` if `score > total`.
    pub fn new(score: u32, total: u32, elapsed_seconds: u64) -> Result<Self, DailyResultError> {
        if score > total {
            return Err(DailyResultError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            score,
            total,
            elapsed_seconds,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_score_above_total() {
        assert_eq!(
            DailyResult::new(6, 5, 10),
            Err(DailyResultError::ScoreExceedsTotal { score: 6, total: 5 })
        );
        assert!(DailyResult::new(5, 5, 0).unwrap().is_perfect());
    }
}
