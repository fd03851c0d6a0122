use super::histogram::DuplexHistogram;
use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Points earned by one maximal run of length `length`:
/// `sum_{i = min_length}^{length} base^i * (length - i + 1)`.
pub fn points(length: usize, min_length: usize, base: u64) -> BigInt {
    let base = BigInt::from(base);
    let mut total = BigInt::zero();
    let mut power = BigInt::one();
    for i in 1..=length {
        power *= &base;
        if i >= min_length {
            total += &power * BigInt::from(length - i + 1);
        }
    }
    total
}

/// Per-length point values, computed once up to the longest possible run.
#[derive(Debug, Clone)]
pub struct PointTable {
    min_length: usize,
    base: u64,
    values: Vec<BigInt>,
}

impl PointTable {
    pub fn new(max_length: usize, min_length: usize, base: u64) -> Self {
        let values = (0..=max_length)
            .map(|length| points(length, min_length, base))
            .collect();
        Self {
            min_length,
            base,
            values,
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn get(&self, length: usize) -> BigInt {
        match self.values.get(length) {
            Some(value) => value.clone(),
            None => points(length, self.min_length, self.base),
        }
    }

    /// Converts a histogram of maximal run lengths to points.
    pub fn total(&self, histogram: &DuplexHistogram) -> BigInt {
        histogram
            .iter()
            .fold(BigInt::zero(), |mut acc, (length, count)| {
                match self.values.get(length) {
                    Some(value) => acc += value * BigInt::from(count),
                    None => acc += points(length, self.min_length, self.base) * BigInt::from(count),
                }
                acc
            })
    }
}
