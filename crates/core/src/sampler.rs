//! Date-seeded sampling without replacement.
//!
//! The generator is the classic `(x * 9301 + 49297) mod 233280` LCG. Its
//! output is mapped onto `[0, entry_count)` by scaling, and duplicates are
//! skipped until enough distinct indices have been drawn. The same
//! `(entry_count, count, seed)` always yields the same indices in the same
//! order.

use thiserror::Error;

pub const LCG_MULTIPLIER: i64 = 9_301;
pub const LCG_INCREMENT: i64 = 49_297;
pub const LCG_MODULUS: i64 = 233_280;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SamplerError {
    #[error("not enough entries to sample from (need {count}, have {available})")]
    NotEnoughEntries { available: usize, count: usize },

    #[error("generator cycled after {found} of {count} distinct indices")]
    Exhausted { found: usize, count: usize },
}

/// Linear-congruential generator yielding values in `[0, LCG_MODULUS)`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: i64,
}

impl Lcg {
    #[must_use]
    pub fn new(seed: i64) -> Self {
        // Reducing first keeps the multiply in range; the sequence is unchanged.
        Self {
            state: seed.rem_euclid(LCG_MODULUS),
        }
    }
}

impl Iterator for Lcg {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT).rem_euclid(LCG_MODULUS);
        Some(self.state)
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(value: i64, entry_count: usize) -> usize {
    let fraction = value as f64 / LCG_MODULUS as f64;
    let index = (fraction * entry_count as f64).floor() as usize;
    index.min(entry_count - 1)
}

/// Draw `count` distinct indices into a list of `entry_count` items.
///
/// # Errors
///
/// Returns `SamplerError::NotEnoughEntries` if `entry_count < count`, and
/// `SamplerError::Exhausted` if a full generator period passes without
/// finding `count` distinct indices.
pub fn sample(entry_count: usize, count: usize, seed: i64) -> Result<Vec<usize>, SamplerError> {
    if entry_count < count {
        return Err(SamplerError::NotEnoughEntries {
            available: entry_count,
            count,
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let period = usize::try_from(LCG_MODULUS).unwrap_or(usize::MAX);
    let mut picked = Vec::with_capacity(count);
    for value in Lcg::new(seed).take(period) {
        let index = scale(value, entry_count);
        if !picked.contains(&index) {
            picked.push(index);
            if picked.len() == count {
                return Ok(picked);
            }
        }
    }

    Err(SamplerError::Exhausted {
        found: picked.len(),
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_seed_yields_known_indices() {
        assert_eq!(sample(10, 5, 20_240_101).unwrap(), vec![0, 1, 4, 6, 5]);
        assert_eq!(sample(10, 5, 20_240_102).unwrap(), vec![0, 2, 8, 9, 5]);
        assert_eq!(sample(30, 5, 20_241_231).unwrap(), vec![1, 22, 10, 19, 8]);
        assert_eq!(sample(100, 5, 20_260_101).unwrap(), vec![41, 37, 99, 17, 2]);
    }

    #[test]
    fn sampling_is_deterministic() {
        let first = sample(10, 5, 20_240_101).unwrap();
        for _ in 0..10 {
            assert_eq!(sample(10, 5, 20_240_101).unwrap(), first);
        }
    }

    #[test]
    fn indices_are_distinct_and_in_range() {
        for seed in 20_240_101..20_240_160 {
            for entry_count in [5_usize, 6, 17, 250] {
                let picked = sample(entry_count, 5, seed).unwrap();
                assert_eq!(picked.len(), 5);
                let unique: HashSet<_> = picked.iter().copied().collect();
                assert_eq!(unique.len(), 5);
                assert!(picked.iter().all(|&i| i < entry_count));
            }
        }
    }

    #[test]
    fn exact_fit_uses_every_entry() {
        let mut picked = sample(5, 5, 20_240_101).unwrap();
        assert_eq!(picked, vec![0, 2, 3, 1, 4]);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn too_few_entries_is_an_error() {
        assert_eq!(
            sample(4, 5, 20_240_101),
            Err(SamplerError::NotEnoughEntries {
                available: 4,
                count: 5
            })
        );
        assert!(sample(0, 1, 1).is_err());
    }

    #[test]
    fn zero_count_is_empty() {
        assert_eq!(sample(0, 0, 42).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn negative_seeds_are_reduced() {
        assert_eq!(
            sample(10, 5, 20_240_101 - LCG_MODULUS * 1_000).unwrap(),
            sample(10, 5, 20_240_101).unwrap()
        );
        assert_eq!(sample(10, 3, -1).unwrap().len(), 3);
    }
}
