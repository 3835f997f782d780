//! Oracle boundary for satisfiability checking
//!
//! The constraint system is plain data; an [`Oracle`] session consumes it,
//! decides satisfiability, and on a positive verdict answers point queries
//! for individual decision variables. Keeping the boundary this narrow lets
//! the backend be swapped without touching the encoding or the decoder.

pub mod smt;

pub use smt::{SolverConfig, Z3Oracle};

use crate::encoding::{Encoding, VarId};

/// Outcome of a satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A satisfying assignment exists and can be queried per variable.
    Satisfiable,
    /// No assignment satisfies the constraints.
    Unsatisfiable,
    /// The engine gave up within its resource limits.
    Unknown(String),
}

/// External decision procedure consulted by the solver.
///
/// Implementations hold a single session: `load` replaces all prior state,
/// `check` decides the loaded system, and `value` reads one variable of the
/// satisfying assignment. A session is not assumed thread-safe; concurrent
/// solves need independent sessions.
pub trait Oracle {
    /// Install a fresh constraint system, discarding any previous one.
    fn load(&mut self, encoding: &Encoding);

    /// Decide satisfiability of the loaded system.
    ///
    /// Potentially long-running; the underlying problem is NP-complete and
    /// implementations should honor a configured timeout.
    fn check(&mut self) -> Verdict;

    /// Value of `var` in the satisfying assignment, or `None` when the last
    /// check did not produce one.
    fn value(&self, var: VarId) -> Option<bool>;
}
