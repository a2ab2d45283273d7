use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use std::fmt;

const KEY_PREFIX: &str = "quiz-done-";

/// A local calendar day: the unit the quiz is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuizDay(NaiveDate);

impl QuizDay {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Day containing the given instant, in the instant's own timezone.
    #[must_use]
    pub fn of<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self(at.date_naive())
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Sampler seed: `year * 10000 + month * 100 + day`.
    #[must_use]
    pub fn seed(&self) -> i64 {
        i64::from(self.0.year()) * 10_000 + i64::from(self.0.month()) * 100 + i64::from(self.0.day())
    }

    /// Key the day's result is persisted under, e.g. `quiz-done-2024-01-05`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.0.format("%Y-%m-%d"))
    }

    /// Inverse of [`QuizDay::storage_key`].
    #[must_use]
    pub fn from_storage_key(key: &str) -> Option<Self> {
        let date = key.strip_prefix(KEY_PREFIX)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().map(Self)
    }

    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Display for QuizDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn day(y: i32, m: u32, d: u32) -> QuizDay {
        QuizDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn seed_concatenates_date_parts() {
        assert_eq!(day(2024, 1, 1).seed(), 20_240_101);
        assert_eq!(day(2025, 12, 31).seed(), 20_251_231);
    }

    #[test]
    fn seeds_order_like_dates() {
        assert!(day(2024, 1, 31).seed() < day(2024, 2, 1).seed());
        assert!(day(2024, 12, 31).seed() < day(2025, 1, 1).seed());
    }

    #[test]
    fn storage_key_is_zero_padded() {
        assert_eq!(day(2024, 3, 7).storage_key(), "quiz-done-2024-03-07");
        assert_eq!(
            QuizDay::from_storage_key("quiz-done-2024-03-07"),
            Some(day(2024, 3, 7))
        );
        assert_eq!(QuizDay::from_storage_key("quiz-done-garbage"), None);
        assert_eq!(QuizDay::from_storage_key("other-2024-03-07"), None);
    }

    #[test]
    fn day_follows_local_offset() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let at = west.with_ymd_and_hms(2024, 6, 30, 22, 0, 0).unwrap();
        assert_eq!(QuizDay::of(&at), day(2024, 6, 30));
        assert_eq!(QuizDay::of(&at).next(), Some(day(2024, 7, 1)));
    }
}
