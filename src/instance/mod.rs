//! Problem instances: validated multisets and their target-sum arithmetic

pub mod generator;

pub use generator::{GenerateError, InstanceGenerator, ValueRange};

use thiserror::Error;

/// Number of elements in every partition group.
pub const GROUP_SIZE: usize = 3;

/// The input shape cannot be partitioned into triples at all.
///
/// Distinct from infeasibility: a well-shaped instance may still admit no
/// equal-sum partition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{count} values cannot be split into groups of three; the count must be a positive multiple of three")]
pub struct InvalidInstance {
    /// Number of values supplied.
    pub count: usize,
}

/// A validated multiset of values to partition.
///
/// Order is a stable index reference for the encoder, not semantic content.
/// Duplicates are allowed and preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    values: Vec<u64>,
}

impl Instance {
    /// Validate the shape invariant before any encoding happens.
    pub fn new(values: Vec<u64>) -> Result<Self, InvalidInstance> {
        if values.len() < GROUP_SIZE || values.len() % GROUP_SIZE != 0 {
            return Err(InvalidInstance {
                count: values.len(),
            });
        }
        Ok(Instance { values })
    }

    /// The values in input order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Number of values.
    pub fn element_count(&self) -> usize {
        self.values.len()
    }

    /// Number of groups a partition will have.
    pub fn group_count(&self) -> usize {
        self.values.len() / GROUP_SIZE
    }

    /// Sum of all values.
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }

    /// The shared group sum, when one can exist.
    ///
    /// Every group must sum to `total / group_count`; an inexact division
    /// means no equal-sum partition is possible.
    pub fn target(&self) -> Option<u64> {
        let groups = self.group_count() as u64;
        let total = self.total();
        (total % groups == 0).then_some(total / groups)
    }
}
