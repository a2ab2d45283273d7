use crate::model::GenderCode;

/// Result of grading one typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub is_correct: bool,
    /// Answer to show when the input was wrong (`der`, `die`, `das`, `Plural`).
    pub expected_word: &'static str,
}

/// Maps a typed article onto its code. Unrecognized input yields `None`.
#[must_use]
pub fn parse_answer(raw: &str) -> Option<GenderCode> {
    match raw.trim().to_lowercase().as_str() {
        "der" => Some(GenderCode::Masculine),
        "die" => Some(GenderCode::Feminine),
        "das" => Some(GenderCode::Neuter),
        "plural" => Some(GenderCode::Plural),
        _ => None,
    }
}

/// Grades a raw answer against the expected code. Exact match only.
#[must_use]
pub fn grade(raw: &str, expected: GenderCode) -> Grade {
    Grade {
        is_correct: parse_answer(raw) == Some(expected),
        expected_word: expected.article(),
    }
}
