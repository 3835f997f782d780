//! Z3-backed satisfiability oracle

use crate::encoding::{Encoding, LinearEq, VarId};
use crate::oracle::{Oracle, Verdict};
use std::time::Duration;
use z3::ast::{Bool, Int};
use z3::{Model, Params, SatResult, Solver};

/// Configuration for the SMT solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Timeout for SMT solving (None means no timeout)
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl SolverConfig {
    /// Create a config with no timeout
    pub fn no_timeout() -> Self {
        Self { timeout: None }
    }

    /// Create a config with a specific timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Create a config with a specific timeout in seconds
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self::with_timeout(Duration::from_secs(secs))
    }
}

/// One Z3 solver session.
///
/// Holds the decision variables of the currently loaded encoding in a grid
/// indexed by `(row, col)`, and the model of the last satisfiable check.
pub struct Z3Oracle {
    solver: Solver,
    vars: Vec<Vec<Bool>>,
    model: Option<Model>,
}

impl Z3Oracle {
    pub fn new() -> Self {
        Self::with_config(&SolverConfig::default())
    }

    pub fn with_config(config: &SolverConfig) -> Self {
        let solver = Solver::new();
        if let Some(timeout) = config.timeout {
            let mut params = Params::new();
            params.set_u32("timeout", timeout.as_millis() as u32);
            solver.set_params(&params);
        }
        Z3Oracle {
            solver,
            vars: Vec::new(),
            model: None,
        }
    }

    /// Translate one linear equality into a Z3 assertion: the sum of
    /// `ite(var, coeff, 0)` terms equals the right-hand side.
    fn assert_linear_eq(&self, eq: &LinearEq) {
        let zero = Int::from_u64(0);
        let terms: Vec<Int> = eq
            .terms
            .iter()
            .map(|&(var, coeff)| self.vars[var.row][var.col].ite(&Int::from_u64(coeff), &zero))
            .collect();
        let term_refs: Vec<&Int> = terms.iter().collect();
        self.solver
            .assert(&Int::add(&term_refs).eq(&Int::from_u64(eq.rhs)));
    }
}

impl Oracle for Z3Oracle {
    fn load(&mut self, encoding: &Encoding) {
        self.solver.reset();
        self.model = None;
        self.vars = (0..encoding.rows)
            .map(|row| {
                (0..encoding.cols)
                    .map(|col| Bool::new_const(format!("x_{row}_{col}")))
                    .collect()
            })
            .collect();
        for eq in &encoding.constraints {
            self.assert_linear_eq(eq);
        }
    }

    fn check(&mut self) -> Verdict {
        match self.solver.check() {
            SatResult::Sat => match self.solver.get_model() {
                Some(model) => {
                    self.model = Some(model);
                    Verdict::Satisfiable
                }
                None => {
                    self.model = None;
                    Verdict::Unknown("solver reported sat but produced no model".to_string())
                }
            },
            SatResult::Unsat => {
                self.model = None;
                Verdict::Unsatisfiable
            }
            SatResult::Unknown => {
                self.model = None;
                Verdict::Unknown(
                    self.solver
                        .get_reason_unknown()
                        .unwrap_or_else(|| "SMT solver returned unknown".to_string()),
                )
            }
        }
    }

    fn value(&self, var: VarId) -> Option<bool> {
        let model = self.model.as_ref()?;
        let cell = self.vars.get(var.row)?.get(var.col)?;
        model.eval(cell, true).and_then(|b| b.as_bool())
    }
}

impl Default for Z3Oracle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_true_encoding() -> Encoding {
        // one row of three variables, all forced true
        Encoding {
            rows: 1,
            cols: 3,
            constraints: vec![LinearEq {
                terms: (0..3).map(|col| (VarId { row: 0, col }, 1)).collect(),
                rhs: 3,
            }],
        }
    }

    #[test]
    fn test_forced_assignment_is_satisfiable() {
        let mut oracle = Z3Oracle::new();
        oracle.load(&all_true_encoding());

        assert_eq!(oracle.check(), Verdict::Satisfiable);
        for col in 0..3 {
            assert_eq!(oracle.value(VarId { row: 0, col }), Some(true));
        }
    }

    #[test]
    fn test_overconstrained_system_is_unsatisfiable() {
        // three boolean variables cannot sum to four
        let encoding = Encoding {
            rows: 1,
            cols: 3,
            constraints: vec![LinearEq {
                terms: (0..3).map(|col| (VarId { row: 0, col }, 1)).collect(),
                rhs: 4,
            }],
        };

        let mut oracle = Z3Oracle::new();
        oracle.load(&encoding);
        assert_eq!(oracle.check(), Verdict::Unsatisfiable);
        assert_eq!(oracle.value(VarId { row: 0, col: 0 }), None);
    }

    #[test]
    fn test_conflicting_cardinalities_are_unsatisfiable() {
        let terms: Vec<(VarId, u64)> = (0..3).map(|col| (VarId { row: 0, col }, 1)).collect();
        let encoding = Encoding {
            rows: 1,
            cols: 3,
            constraints: vec![
                LinearEq {
                    terms: terms.clone(),
                    rhs: 1,
                },
                LinearEq { terms, rhs: 2 },
            ],
        };

        let mut oracle = Z3Oracle::new();
        oracle.load(&encoding);
        assert_eq!(oracle.check(), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_weighted_sum_picks_matching_subset() {
        // exactly one of two variables, and the picked weight must be 5
        let encoding = Encoding {
            rows: 1,
            cols: 2,
            constraints: vec![
                LinearEq {
                    terms: vec![
                        (VarId { row: 0, col: 0 }, 1),
                        (VarId { row: 0, col: 1 }, 1),
                    ],
                    rhs: 1,
                },
                LinearEq {
                    terms: vec![
                        (VarId { row: 0, col: 0 }, 7),
                        (VarId { row: 0, col: 1 }, 5),
                    ],
                    rhs: 5,
                },
            ],
        };

        let mut oracle = Z3Oracle::new();
        oracle.load(&encoding);
        assert_eq!(oracle.check(), Verdict::Satisfiable);
        assert_eq!(oracle.value(VarId { row: 0, col: 0 }), Some(false));
        assert_eq!(oracle.value(VarId { row: 0, col: 1 }), Some(true));
    }

    #[test]
    fn test_load_discards_previous_session() {
        let mut oracle = Z3Oracle::new();
        oracle.load(&all_true_encoding());
        assert_eq!(oracle.check(), Verdict::Satisfiable);

        // reload with an unsatisfiable system: old assertions and model gone
        let encoding = Encoding {
            rows: 1,
            cols: 3,
            constraints: vec![LinearEq {
                terms: (0..3).map(|col| (VarId { row: 0, col }, 1)).collect(),
                rhs: 4,
            }],
        };
        oracle.load(&encoding);
        assert_eq!(oracle.value(VarId { row: 0, col: 0 }), None);
        assert_eq!(oracle.check(), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_value_out_of_bounds_is_none() {
        let mut oracle = Z3Oracle::new();
        oracle.load(&all_true_encoding());
        assert_eq!(oracle.check(), Verdict::Satisfiable);
        assert_eq!(oracle.value(VarId { row: 1, col: 0 }), None);
        assert_eq!(oracle.value(VarId { row: 0, col: 9 }), None);
    }
}
