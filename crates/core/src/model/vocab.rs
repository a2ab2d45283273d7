use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown gender code: {0:?}")]
pub struct GenderCodeError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("word cannot be empty")]
    EmptyWord,
}

//
// ─── GENDER CODE ──────────────────────────────────────────────────────────────
//

/// Grammatical gender (or plural) a noun is quizzed on.
///
/// The canonical storage form is a one-letter code (`m`, `f`, `n`, `p`); the
/// quiz itself is answered with the matching article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderCode {
    #[serde(rename = "m")]
    Masculine,
    #[serde(rename = "f")]
    Feminine,
    #[serde(rename = "n")]
    Neuter,
    #[serde(rename = "p")]
    Plural,
}

impl GenderCode {
    pub const ALL: [GenderCode; 4] = [
        GenderCode::Masculine,
        GenderCode::Feminine,
        GenderCode::Neuter,
        GenderCode::Plural,
    ];

    /// Canonical one-letter code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            GenderCode::Masculine => "m",
            GenderCode::Feminine => "f",
            GenderCode::Neuter => "n",
            GenderCode::Plural => "p",
        }
    }

    /// Human-readable answer shown in feedback.
    #[must_use]
    pub fn article(self) -> &'static str {
        match self {
            GenderCode::Masculine => "der",
            GenderCode::Feminine => "die",
            GenderCode::Neuter => "das",
            GenderCode::Plural => "Plural",
        }
    }

    /// Parses a one-letter code, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `GenderCodeError` for anything other than `m`, `f`, `n` or `p`.
    pub fn from_code(raw: &str) -> Result<Self, GenderCodeError> {
        match raw.trim().to_lowercase().as_str() {
            "m" => Ok(GenderCode::Masculine),
            "f" => Ok(GenderCode::Feminine),
            "n" => Ok(GenderCode::Neuter),
            "p" => Ok(GenderCode::Plural),
            _ => Err(GenderCodeError(raw.to_owned())),
        }
    }
}

impl FromStr for GenderCode {
    type Err = GenderCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for GenderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

//
// ─── VOCAB ENTRY ──────────────────────────────────────────────────────────────
//

/// A single quizzable noun and the answer expected for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabEntry {
    word: String,
    expected: GenderCode,
}

impl VocabEntry {
    /// Creates an entry, trimming the word.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptyWord` if the word is blank.
    pub fn new(word: impl Into<String>, expected: GenderCode) -> Result<Self, EntryError> {
        let word = word.into();
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return Err(EntryError::EmptyWord);
        }
        Ok(Self {
            word: trimmed.to_owned(),
            expected,
        })
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn expected(&self) -> GenderCode {
        self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_parsing_is_case_insensitive() {
        assert_eq!(GenderCode::from_code(" M "), Ok(GenderCode::Masculine));
        assert_eq!("p".parse::<GenderCode>(), Ok(GenderCode::Plural));
        assert!(GenderCode::from_code("x").is_err());
        assert!(GenderCode::from_code("").is_err());
    }

    #[test]
    fn codes_round_trip_through_display() {
        for code in GenderCode::ALL {
            assert_eq!(GenderCode::from_code(&code.to_string()), Ok(code));
        }
    }

    #[test]
    fn entry_rejects_blank_word() {
        assert_eq!(
            VocabEntry::new("   ", GenderCode::Neuter),
            Err(EntryError::EmptyWord)
        );
        let entry = VocabEntry::new(" Haus ", GenderCode::Neuter).unwrap();
        assert_eq!(entry.word(), "Haus");
    }
}
