//! Synthetic instance generation for benchmarking

use crate::instance::GROUP_SIZE;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Errors from instance generation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    /// Requested size cannot be split into triples.
    #[error("cannot generate {0} values; the size must be a positive multiple of three")]
    InvalidSize(usize),
    /// The value range contains no values.
    #[error("empty value range: {lo}..={hi}")]
    EmptyRange { lo: u64, hi: u64 },
}

/// Inclusive range generated values are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    /// Smallest value that may be generated.
    pub lo: u64,
    /// Largest value that may be generated.
    pub hi: u64,
}

impl ValueRange {
    pub fn new(lo: u64, hi: u64) -> Self {
        ValueRange { lo, hi }
    }

    fn validate(&self) -> Result<(), GenerateError> {
        if self.lo > self.hi {
            return Err(GenerateError::EmptyRange {
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(())
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        ValueRange { lo: 1, hi: 100 }
    }
}

/// Produces multisets for benchmarking, either guaranteed satisfiable or
/// drawn uniformly with no satisfiability contract.
///
/// Stateless apart from its random source; a fixed seed reproduces the
/// generated sequence exactly.
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    range: ValueRange,
    rng: ChaCha8Rng,
}

impl InstanceGenerator {
    /// Generator seeded from OS entropy.
    pub fn new(range: ValueRange) -> Self {
        InstanceGenerator {
            range,
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Generator with a fixed seed for reproducible benchmarks.
    pub fn with_seed(range: ValueRange, seed: u64) -> Self {
        InstanceGenerator {
            range,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(range: ValueRange, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(range, seed),
            None => Self::new(range),
        }
    }

    /// Generate `size` values that admit a 3-partition by construction.
    ///
    /// One target sum is drawn per call, then triples summing exactly to it
    /// are emitted in insertion order. The first two draws of each triple use
    /// sub-ranges clamped so the remaining elements always fit the value
    /// range, so no draw is ever rejected.
    pub fn satisfiable(&mut self, size: usize) -> Result<Vec<u64>, GenerateError> {
        check_size(size)?;
        self.range.validate()?;
        let ValueRange { lo, hi } = self.range;

        let target = self.rng.random_range(3 * lo..=3 * hi);
        debug!("generating {size} values as triples summing to {target}");

        let mut values = Vec::with_capacity(size);
        while values.len() < size {
            let first = self
                .rng
                .random_range(lo.max(target.saturating_sub(2 * hi))..=hi.min(target - 2 * lo));
            let rest = target - first;
            let second = self
                .rng
                .random_range(lo.max(rest.saturating_sub(hi))..=hi.min(rest - lo));
            values.extend([first, second, rest - second]);
        }
        Ok(values)
    }

    /// Generate `size` independent uniform values.
    ///
    /// Satisfiability of the resulting instance is neither guaranteed nor
    /// checked.
    pub fn uniform(&mut self, size: usize) -> Result<Vec<u64>, GenerateError> {
        check_size(size)?;
        self.range.validate()?;
        let ValueRange { lo, hi } = self.range;

        Ok((0..size).map(|_| self.rng.random_range(lo..=hi)).collect())
    }
}

fn check_size(size: usize) -> Result<(), GenerateError> {
    if size == 0 || size % GROUP_SIZE != 0 {
        return Err(GenerateError::InvalidSize(size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_size_not_divisible_by_three() {
        let mut generator = InstanceGenerator::with_seed(ValueRange::default(), 1);
        assert_eq!(
            generator.satisfiable(10),
            Err(GenerateError::InvalidSize(10))
        );
        assert_eq!(generator.uniform(4), Err(GenerateError::InvalidSize(4)));
    }

    #[test]
    fn test_rejects_zero_size() {
        let mut generator = InstanceGenerator::with_seed(ValueRange::default(), 1);
        assert_eq!(generator.satisfiable(0), Err(GenerateError::InvalidSize(0)));
    }

    #[test]
    fn test_rejects_empty_range() {
        let mut generator = InstanceGenerator::with_seed(ValueRange::new(10, 5), 1);
        assert_eq!(
            generator.satisfiable(9),
            Err(GenerateError::EmptyRange { lo: 10, hi: 5 })
        );
    }

    #[test]
    fn test_satisfiable_triples_share_one_sum() {
        let mut generator = InstanceGenerator::with_seed(ValueRange::new(1, 50), 42);
        let values = generator.satisfiable(30).unwrap();

        assert_eq!(values.len(), 30);
        let sums: Vec<u64> = values.chunks(3).map(|triple| triple.iter().sum()).collect();
        assert!(sums.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_satisfiable_values_stay_in_range() {
        let range = ValueRange::new(5, 20);
        let mut generator = InstanceGenerator::with_seed(range, 7);
        let values = generator.satisfiable(300).unwrap();

        assert!(values.iter().all(|&v| v >= range.lo && v <= range.hi));
    }

    #[test]
    fn test_satisfiable_with_degenerate_range() {
        let mut generator = InstanceGenerator::with_seed(ValueRange::new(4, 4), 0);
        let values = generator.satisfiable(9).unwrap();
        assert_eq!(values, vec![4; 9]);
    }

    #[test]
    fn test_satisfiable_allows_zero_values() {
        let mut generator = InstanceGenerator::with_seed(ValueRange::new(0, 3), 11);
        let values = generator.satisfiable(60).unwrap();

        assert!(values.iter().all(|&v| v <= 3));
        let sums: Vec<u64> = values.chunks(3).map(|triple| triple.iter().sum()).collect();
        assert!(sums.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_uniform_respects_size_and_range() {
        let range = ValueRange::new(10, 30);
        let mut generator = InstanceGenerator::with_seed(range, 3);
        let values = generator.uniform(12).unwrap();

        assert_eq!(values.len(), 12);
        assert!(values.iter().all(|&v| v >= range.lo && v <= range.hi));
    }

    #[test]
    fn test_same_seed_reproduces_instance() {
        let range = ValueRange::new(1, 100);
        let mut first = InstanceGenerator::with_seed(range, 99);
        let mut second = InstanceGenerator::with_seed(range, 99);

        assert_eq!(first.satisfiable(15).unwrap(), second.satisfiable(15).unwrap());
        assert_eq!(first.uniform(15).unwrap(), second.uniform(15).unwrap());
    }

    #[test]
    fn test_different_seeds_vary() {
        let range = ValueRange::new(1, 1000);
        let mut first = InstanceGenerator::with_seed(range, 1);
        let mut second = InstanceGenerator::with_seed(range, 2);

        assert_ne!(first.uniform(30).unwrap(), second.uniform(30).unwrap());
    }
}
