//! 3-partition solving: encode, consult the oracle, decode
//!
//! [`ThreePartition`] turns a validated instance into the exact-cover
//! constraint system, submits it to an [`Oracle`], captures the satisfying
//! assignment when one exists, and decodes it into equal-sum groups. Each
//! solve call owns a fresh decision matrix; nothing is shared across calls.

use crate::encoding::{encode, VarId};
use crate::instance::{Instance, GROUP_SIZE};
use crate::oracle::{Oracle, Verdict};
use log::debug;
use std::fmt;
use thiserror::Error;

/// Terminal outcomes and faults surfaced when solving.
///
/// `Infeasible` and `Unknown` are distinct by contract: the first is a
/// definite negative answer, the second means the oracle ran out of
/// resources before reaching any verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The constraints admit no assignment: no equal-sum partition exists.
    #[error("no 3-partition with equal group sums exists")]
    Infeasible,
    /// The oracle gave up before reaching a verdict.
    #[error("solver could not decide the instance: {0}")]
    Unknown(String),
    /// Decoding was requested without a prior satisfying solve.
    #[error("no satisfying assignment available; solve the instance first")]
    NoSolutionAvailable,
}

/// Satisfying assignment captured from the oracle.
///
/// The evaluated truth matrix of the decision variables: one row per group,
/// one column per element. Valid only for the solve call that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    cells: Vec<Vec<bool>>,
}

impl Assignment {
    /// Whether element `col` was assigned to group `row`.
    pub fn is_assigned(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Number of groups (matrix rows).
    pub fn group_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of elements (matrix columns).
    pub fn element_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }
}

/// A decoded 3-partition: groups of three values sharing one sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<Vec<u64>>,
}

impl Partition {
    /// The groups in matrix-row order, members in ascending input order.
    pub fn groups(&self) -> &[Vec<u64>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{group:?}")?;
        }
        Ok(())
    }
}

/// Decides one 3-partition instance and decodes the oracle's answer.
pub struct ThreePartition {
    instance: Instance,
    assignment: Option<Assignment>,
}

impl ThreePartition {
    pub fn new(instance: Instance) -> Self {
        ThreePartition {
            instance,
            assignment: None,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Encode the instance, submit it to `oracle`, and capture the
    /// satisfying assignment if one exists.
    ///
    /// An inexact target division already rules out any equal-sum partition,
    /// so the oracle is not consulted in that case. A failed solve leaves no
    /// assignment behind.
    pub fn solve<O: Oracle>(&mut self, oracle: &mut O) -> Result<&Assignment, SolveError> {
        self.assignment = None;

        let Some(target) = self.instance.target() else {
            debug!(
                "total {} does not divide into {} groups; infeasible without solving",
                self.instance.total(),
                self.instance.group_count()
            );
            return Err(SolveError::Infeasible);
        };

        let encoding = encode(&self.instance, target);
        debug!(
            "encoded {} variables, {} constraints, target sum {}",
            encoding.rows * encoding.cols,
            encoding.constraints.len(),
            target
        );

        oracle.load(&encoding);
        match oracle.check() {
            Verdict::Satisfiable => {}
            Verdict::Unsatisfiable => return Err(SolveError::Infeasible),
            Verdict::Unknown(reason) => return Err(SolveError::Unknown(reason)),
        }

        let mut cells = vec![vec![false; encoding.cols]; encoding.rows];
        for (row, row_cells) in cells.iter_mut().enumerate() {
            for (col, cell) in row_cells.iter_mut().enumerate() {
                *cell = oracle.value(VarId { row, col }).ok_or_else(|| {
                    SolveError::Unknown(
                        "oracle reported satisfiable but offered no assignment".to_string(),
                    )
                })?;
            }
        }

        Ok(self.assignment.insert(Assignment { cells }))
    }

    /// Decode the captured assignment into groups: row by row, members in
    /// ascending column order.
    ///
    /// Trusts the oracle's assignment; cardinality and sums are guaranteed by
    /// the constraints and only re-checked in debug builds.
    pub fn partition(&self) -> Result<Partition, SolveError> {
        let assignment = self
            .assignment
            .as_ref()
            .ok_or(SolveError::NoSolutionAvailable)?;
        let values = self.instance.values();

        let mut groups = Vec::with_capacity(assignment.group_count());
        for row in 0..assignment.group_count() {
            let group: Vec<u64> = (0..assignment.element_count())
                .filter(|&col| assignment.is_assigned(row, col))
                .map(|col| values[col])
                .collect();
            debug_assert_eq!(group.len(), GROUP_SIZE);
            groups.push(group);
        }
        debug_assert!(self
            .instance
            .target()
            .is_some_and(|target| groups.iter().all(|g| g.iter().sum::<u64>() == target)));

        Ok(Partition { groups })
    }
}
