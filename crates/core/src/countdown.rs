use chrono::{DateTime, FixedOffset, TimeZone};
use std::fmt;

/// Time left until the next local midnight, when a new quiz unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    total_seconds: u64,
}

impl Countdown {
    pub const ZERO: Countdown = Countdown { total_seconds: 0 };

    #[must_use]
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self { total_seconds }
    }

    /// Whole seconds from `now` to the following midnight in `now`'s offset.
    #[must_use]
    pub fn until_next_midnight(now: DateTime<FixedOffset>) -> Self {
        let Some(tomorrow) = now.date_naive().succ_opt() else {
            return Self::ZERO;
        };
        let Some(midnight) = tomorrow.and_hms_opt(0, 0, 0) else {
            return Self::ZERO;
        };
        let Some(midnight) = now.offset().from_local_datetime(&midnight).single() else {
            return Self::ZERO;
        };
        let secs = (midnight - now).num_seconds();
        Self::from_seconds(u64::try_from(secs).unwrap_or(0))
    }

    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    #[must_use]
    pub fn hours(&self) -> u64 {
        self.total_seconds / 3600
    }

    #[must_use]
    pub fn minutes(&self) -> u64 {
        (self.total_seconds % 3600) / 60
    }

    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.total_seconds % 60
    }

    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.total_seconds == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours(), self.minutes(), self.seconds())
    }
}

/// Formats a duration in seconds as `m:ss`.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 28, h, m, s)
            .unwrap()
    }

    #[test]
    fn decomposes_remaining_time() {
        let countdown = Countdown::until_next_midnight(at(21, 15, 30));
        assert_eq!(countdown.total_seconds(), 2 * 3600 + 44 * 60 + 30);
        assert_eq!(countdown.hours(), 2);
        assert_eq!(countdown.minutes(), 44);
        assert_eq!(countdown.seconds(), 30);
        assert_eq!(countdown.to_string(), "2h 44m 30s");
    }

    #[test]
    fn full_day_at_midnight() {
        assert_eq!(
            Countdown::until_next_midnight(at(0, 0, 0)).total_seconds(),
            86_400
        );
        assert_eq!(
            Countdown::until_next_midnight(at(23, 59, 59)).to_string(),
            "0h 0m 1s"
        );
    }

    #[test]
    fn sub_second_remainder_is_truncated() {
        let now = at(23, 59, 58) + chrono::Duration::milliseconds(400);
        assert_eq!(Countdown::until_next_midnight(now).total_seconds(), 1);
    }

    #[test]
    fn formats_elapsed_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(600), "10:00");
    }
}
