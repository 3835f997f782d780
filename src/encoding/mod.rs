//! Exact-cover constraint encoding of the 3-partition problem
//!
//! The encoding is plain data over indexed variable handles, with no
//! knowledge of any solving engine. A decision matrix of `group_count` rows
//! by `element_count` columns is constrained so that every row picks exactly
//! three elements, every column is picked exactly once, and every row's
//! picked values sum to the shared target.

use crate::instance::{Instance, GROUP_SIZE};

/// Handle of one boolean decision variable: cell `(row, col)` of the matrix.
///
/// `row` is the group, `col` the index of the element assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId {
    pub row: usize,
    pub col: usize,
}

/// Linear equality over boolean variables.
///
/// Each variable contributes its coefficient when true and zero when false;
/// the weighted sum must equal `rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearEq {
    pub terms: Vec<(VarId, u64)>,
    pub rhs: u64,
}

/// Complete constraint system for one solve call.
///
/// Built fresh per call and consumed only by the oracle; never shared.
#[derive(Debug, Clone)]
pub struct Encoding {
    /// Number of matrix rows (partition groups).
    pub rows: usize,
    /// Number of matrix columns (instance elements).
    pub cols: usize,
    /// The conjunction of all constraints.
    pub constraints: Vec<LinearEq>,
}

/// Build the constraint system for `instance` at the given target sum.
///
/// The caller has already established that `target` is the exact per-group
/// sum; an instance whose total does not divide evenly never reaches here.
pub fn encode(instance: &Instance, target: u64) -> Encoding {
    let rows = instance.group_count();
    let cols = instance.element_count();
    let mut constraints = Vec::with_capacity(2 * rows + cols);

    // Every group has exactly three members.
    for row in 0..rows {
        constraints.push(LinearEq {
            terms: (0..cols).map(|col| (VarId { row, col }, 1)).collect(),
            rhs: GROUP_SIZE as u64,
        });
    }

    // Every element belongs to exactly one group: the exact-cover condition
    // that makes the matrix a partition rather than a relaxation.
    for col in 0..cols {
        constraints.push(LinearEq {
            terms: (0..rows).map(|row| (VarId { row, col }, 1)).collect(),
            rhs: 1,
        });
    }

    // Every group's members sum to the shared target.
    for row in 0..rows {
        constraints.push(LinearEq {
            terms: instance
                .values()
                .iter()
                .enumerate()
                .map(|(col, &value)| (VarId { row, col }, value))
                .collect(),
            rhs: target,
        });
    }

    Encoding {
        rows,
        cols,
        constraints,
    }
}
