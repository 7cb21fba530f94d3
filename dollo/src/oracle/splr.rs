//! [`Oracle`] backend on top of the `splr` solver.
use splr::Certificate;

use crate::{
    lit::{Lit, Var},
    oracle::{ModelValue, Oracle, OracleError, SolveResult},
};

/// SAT oracle backed by the `splr` crate.
///
/// `splr` consumes a complete formula per invocation, so the backend keeps
/// the cumulative clause store itself (as DIMACS integer clauses) and hands
/// the whole store to the solver on every [`solve`][Oracle::solve] call. The
/// model of the most recent satisfiable solve is cached for
/// [`model_value`][Oracle::model_value] queries.
///
/// Variables the solver does not mention in its certificate, and every
/// variable of a clause-free formula (which is satisfiable without invoking
/// the solver at all), are completed to false. This keeps repeated runs on
/// the same input deterministic.
#[derive(Default, Debug)]
pub struct SplrOracle {
    var_count: usize,
    threads: u32,
    clauses: Vec<Vec<i32>>,
    model: Vec<ModelValue>,
}

impl Oracle for SplrOracle {
    fn allocate_variables(&mut self, count: usize) {
        self.var_count = count;
        self.model.clear();
    }

    fn set_parallelism(&mut self, threads: u32) {
        // splr searches sequentially; the hint is recorded but has no effect.
        self.threads = threads;
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        debug_assert!(!clause.is_empty());
        self.clauses.push(clause.iter().map(|lit| lit.dimacs()).collect());
    }

    fn solve(&mut self) -> Result<SolveResult, OracleError> {
        self.model = vec![ModelValue::False; self.var_count];

        if self.clauses.is_empty() {
            return Ok(SolveResult::Satisfiable);
        }

        match Certificate::try_from(self.clauses.clone()) {
            Ok(Certificate::SAT(assignment)) => {
                for lit in assignment {
                    debug_assert!(lit != 0);
                    let index = lit.unsigned_abs() as usize - 1;
                    if index < self.var_count {
                        self.model[index] = if lit > 0 {
                            ModelValue::True
                        } else {
                            ModelValue::False
                        };
                    }
                }
                Ok(SolveResult::Satisfiable)
            }
            Ok(Certificate::UNSAT) => {
                self.model.clear();
                Ok(SolveResult::Unsatisfiable)
            }
            Err(err) => {
                self.model.clear();
                Err(OracleError::backend(err))
            }
        }
    }

    fn model_value(&self, var: Var) -> ModelValue {
        self.model
            .get(var.index())
            .copied()
            .unwrap_or(ModelValue::Unassigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_clauses_fix_the_model() {
        let mut oracle = SplrOracle::default();
        oracle.allocate_variables(2);
        oracle.add_clause(&[Lit::from_index(0, true)]);
        oracle.add_clause(&[Lit::from_index(1, false)]);

        assert_eq!(oracle.solve().unwrap(), SolveResult::Satisfiable);
        assert_eq!(oracle.model_value(Var::from_index(0)), ModelValue::True);
        assert_eq!(oracle.model_value(Var::from_index(1)), ModelValue::False);
    }

    #[test]
    fn contradictory_units_are_unsatisfiable() {
        let mut oracle = SplrOracle::default();
        oracle.allocate_variables(1);
        oracle.add_clause(&[Lit::from_index(0, true)]);
        oracle.add_clause(&[Lit::from_index(0, false)]);

        assert_eq!(oracle.solve().unwrap(), SolveResult::Unsatisfiable);
    }

    #[test]
    fn unconstrained_variables_default_to_false() {
        let mut oracle = SplrOracle::default();
        oracle.allocate_variables(3);
        oracle.add_clause(&[Lit::from_index(1, true)]);

        assert_eq!(oracle.solve().unwrap(), SolveResult::Satisfiable);
        assert_eq!(oracle.model_value(Var::from_index(0)), ModelValue::False);
        assert_eq!(oracle.model_value(Var::from_index(2)), ModelValue::False);
    }

    #[test]
    fn empty_formula_is_satisfiable() {
        let mut oracle = SplrOracle::default();
        oracle.allocate_variables(2);

        assert_eq!(oracle.solve().unwrap(), SolveResult::Satisfiable);
        assert_eq!(oracle.model_value(Var::from_index(1)), ModelValue::False);
    }

    #[test]
    fn model_is_unassigned_before_any_solve() {
        let mut oracle = SplrOracle::default();
        oracle.allocate_variables(1);
        assert_eq!(
            oracle.model_value(Var::from_index(0)),
            ModelValue::Unassigned
        );
    }
}
