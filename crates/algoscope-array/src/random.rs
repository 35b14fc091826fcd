//! Random permutations and arrays.

use std::ops::RangeInclusive;

use rand::Rng;

/// Length and value ranges for [`random_array`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomConfig {
    pub len: RangeInclusive<usize>,
    pub values: RangeInclusive<i64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            len: 5..=10,
            values: 0..=99,
        }
    }
}

impl RandomConfig {
    #[must_use]
    pub fn with_len(mut self, min: usize, max: usize) -> Self {
        self.len = min.min(max)..=max.max(min);
        self
    }

    #[must_use]
    pub fn with_values(mut self, min: i64, max: i64) -> Self {
        self.values = min.min(max)..=max.max(min);
        self
    }
}

/// Fisher–Yates shuffle: for each `i` from the last index down to 1, swap
/// position `i` with a uniformly chosen `j` in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(values: &mut [T], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.gen_range(0..=i);
        values.swap(i, j);
    }
}

/// A fresh array with length and values drawn uniformly from `config`.
pub fn random_array<R: Rng + ?Sized>(config: &RandomConfig, rng: &mut R) -> Vec<i64> {
    let len = rng.gen_range(ordered(&config.len));
    let values = ordered(&config.values);
    (0..len).map(|_| rng.gen_range(values.clone())).collect()
}

fn ordered<T: Ord + Copy>(range: &RangeInclusive<T>) -> RangeInclusive<T> {
    let (start, end) = (*range.start(), *range.end());
    start.min(end)..=start.max(end)
}
