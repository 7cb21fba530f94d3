//! The cutting-plane driver loop.
//!
//! The engine owns one oracle for one run and proceeds strictly
//! sequentially: allocate variables, then solve, read the model, separate
//! violations, submit their blocking clauses and solve again. The loop ends
//! when a solve turns up no violation (the completion is extracted) or the
//! oracle proves the clause store unsatisfiable (no completion exists).
//! Every round strictly grows the monotonic clause store, and the space of
//! possible blocking clauses is finite, so the loop terminates.
use thiserror::Error;

use crate::{
    context::Ctx,
    index::VarIndex,
    lit::{Lit, Var},
    log::{info, verbose, HasLogger, Logger},
    matrix::Matrix,
    oracle::{splr::SplrOracle, ModelValue, Oracle, OracleError, SolveResult},
    separate::{violations, Violation},
};

/// Fatal failure of an engine run.
///
/// Infeasibility is *not* an error; it is reported as
/// [`Outcome::Infeasible`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// The oracle reported a satisfying solve but left an active cell's
    /// variable unassigned. This is a contract violation of the backend; the
    /// engine aborts rather than guessing a value.
    #[error("solver reported a model but left variable {0} unassigned")]
    IncompleteModel(Var),
    /// The solver backend itself failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Terminal result of a run.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// A completion avoiding all forbidden sub-patterns was found.
    Completed(Matrix),
    /// No completion of the input exists for the given loss bound.
    Infeasible,
}

/// Cutting-plane engine completing one matrix against one oracle.
///
/// The input matrix and the variable index are immutable once constructed;
/// the oracle's clause store is the only state that grows between rounds.
pub struct Engine<'a, O> {
    /// Logger and statistics for this run.
    pub ctx: Ctx,
    matrix: &'a Matrix,
    k: u8,
    index: VarIndex,
    oracle: O,
}

impl<'a, O: Oracle> Engine<'a, O> {
    /// Prepares a run: indexes the unresolved cells of `matrix` under loss
    /// bound `k`.
    pub fn new(matrix: &'a Matrix, k: u8, oracle: O) -> Engine<'a, O> {
        Engine {
            ctx: Ctx::default(),
            matrix,
            k,
            index: VarIndex::new(matrix),
            oracle,
        }
    }

    /// Number of unresolved cells, equal to the number of oracle variables.
    pub fn var_count(&self) -> usize {
        self.index.var_count()
    }

    /// Runs the solve/separate loop to completion.
    ///
    /// `threads` is passed through to the oracle as an advisory parallelism
    /// hint before the first solve.
    pub fn run(&mut self, threads: u32) -> Result<Outcome, EngineError> {
        self.oracle.allocate_variables(self.index.var_count());
        self.oracle.set_parallelism(threads);
        verbose!(self.ctx, unresolved = self.index.var_count());

        loop {
            self.ctx.stats.rounds += 1;
            verbose!(
                self.ctx,
                round = self.ctx.stats.rounds,
                constraints = self.ctx.stats.constraints,
            );

            match self.oracle.solve()? {
                SolveResult::Unsatisfiable => {
                    info!(self.ctx, "no completion exists");
                    return Ok(Outcome::Infeasible);
                }
                SolveResult::Satisfiable => {}
            }

            let completion = self.extract()?;
            let found = violations(&completion, self.k);
            if found.is_empty() {
                info!(
                    self.ctx,
                    "completion found",
                    rounds = self.ctx.stats.rounds,
                    constraints = self.ctx.stats.constraints,
                );
                return Ok(Outcome::Completed(completion));
            }

            let mut added = 0u64;
            for violation in &found {
                let clause = self.blocking_clause(violation);
                if clause.is_empty() {
                    // Every cell of this instance is fixed by the input, so
                    // no assignment of the decision variables can avoid it.
                    info!(
                        self.ctx,
                        "input already contains a forbidden pattern",
                        shape = violation.shape,
                    );
                    return Ok(Outcome::Infeasible);
                }
                self.oracle.add_clause(&clause);
                added += 1;
            }
            self.ctx.stats.constraints += added;
            verbose!(self.ctx, separated = added);
        }
    }

    /// Copies the current effective assignment into a fresh matrix.
    ///
    /// Fixed cells keep their input value; active cells take the value of
    /// their variable in the oracle's current model. Only meaningful after a
    /// satisfiable solve, and idempotent until the next one.
    pub fn extract(&self) -> Result<Matrix, EngineError> {
        let mut completion = Matrix::new(self.matrix.taxa(), self.matrix.characters());
        for taxon in 0..self.matrix.taxa() {
            for character in 0..self.matrix.characters() {
                completion.set(taxon, character, self.effective_value(taxon, character)?);
            }
        }
        Ok(completion)
    }

    /// The value a cell holds under the input overlaid with the current
    /// model.
    fn effective_value(&self, taxon: usize, character: usize) -> Result<u8, EngineError> {
        match self.index.var(taxon, character) {
            None => Ok(self.matrix.get(taxon, character)),
            Some(var) => match self.oracle.model_value(var) {
                ModelValue::True => Ok(Matrix::PRESENT),
                ModelValue::False => Ok(Matrix::ABSENT),
                ModelValue::Unassigned => Err(EngineError::IncompleteModel(var)),
            },
        }
    }

    /// Turns a violation into the clause blocking exactly this instance.
    ///
    /// Only active cells contribute literals; fixed cells cannot change and
    /// are omitted to keep the clause minimal. The literal of an active cell
    /// negates its current polarity, so the clause states that not all
    /// participating cells keep their current values.
    fn blocking_clause(&self, violation: &Violation) -> Vec<Lit> {
        violation
            .facts
            .iter()
            .filter_map(|fact| {
                self.index
                    .var(fact.taxon, fact.character)
                    .map(|var| Lit::from_var(var, fact.value == Matrix::ABSENT))
            })
            .collect()
    }
}

impl<O> HasLogger for Engine<'_, O> {
    fn logger(&self) -> &Logger {
        &self.ctx.logger
    }
}

/// Completes `matrix` under loss bound `k` with the default `splr` oracle.
///
/// This is the single entry point the engine exposes outward; `threads` is
/// an advisory hint for the oracle.
pub fn run(matrix: &Matrix, k: u8, threads: u32) -> Result<Outcome, EngineError> {
    Engine::new(matrix, k, SplrOracle::default()).run(threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(outcome: Outcome) -> Matrix {
        match outcome {
            Outcome::Completed(matrix) => matrix,
            Outcome::Infeasible => panic!("expected a completion"),
        }
    }

    #[test]
    fn complete_input_finishes_in_one_round() {
        let matrix = Matrix::from_rows(&[&[2, 0], &[0, 2]]);
        let mut engine = Engine::new(&matrix, 1, SplrOracle::default());

        let solution = completed(engine.run(1).unwrap());
        assert_eq!(solution, matrix);
        assert_eq!(engine.ctx.stats.rounds, 1);
        assert_eq!(engine.ctx.stats.constraints, 0);
    }

    #[test]
    fn unique_completion_is_found() {
        // The unresolved cell must stay absent: making it present would
        // recreate the forbidden pattern with the first two taxa.
        let matrix = Matrix::from_rows(&[&[2, 0], &[0, 2], &[2, 1]]);

        let solution = completed(run(&matrix, 1, 1).unwrap());
        assert_eq!(solution, Matrix::from_rows(&[&[2, 0], &[0, 2], &[2, 0]]));
    }

    #[test]
    fn blocked_assignment_is_repaired_in_a_second_round() {
        // The first model leaves the unresolved cell absent, which realizes
        // a forbidden pattern; the blocking clause then forces it present.
        let matrix = Matrix::from_rows(&[&[0, 2], &[2, 2], &[2, 1]]);
        let mut engine = Engine::new(&matrix, 1, SplrOracle::default());

        let solution = completed(engine.run(1).unwrap());
        assert_eq!(solution, Matrix::from_rows(&[&[0, 2], &[2, 2], &[2, 2]]));
        assert_eq!(engine.ctx.stats.rounds, 2);
        assert_eq!(engine.ctx.stats.constraints, 1);
    }

    #[test]
    fn fixed_forbidden_pattern_is_infeasible() {
        let matrix = Matrix::from_rows(&[&[2, 0], &[0, 2], &[2, 2]]);
        assert_eq!(run(&matrix, 1, 1).unwrap(), Outcome::Infeasible);
    }

    #[test]
    fn fixed_forbidden_pattern_is_infeasible_despite_unresolved_cells() {
        let matrix = Matrix::from_rows(&[&[2, 0], &[0, 2], &[2, 2], &[1, 1]]);
        assert_eq!(run(&matrix, 1, 1).unwrap(), Outcome::Infeasible);
    }

    #[test]
    fn fixed_cells_are_never_altered() {
        let matrix = Matrix::from_rows(&[&[0, 2], &[2, 2], &[2, 1]]);
        let solution = completed(run(&matrix, 1, 1).unwrap());

        for taxon in 0..matrix.taxa() {
            for character in 0..matrix.characters() {
                let input = matrix.get(taxon, character);
                if input != Matrix::UNRESOLVED {
                    assert_eq!(solution.get(taxon, character), input);
                }
            }
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let matrix = Matrix::from_rows(&[&[0, 2], &[2, 2], &[2, 1]]);
        let mut engine = Engine::new(&matrix, 1, SplrOracle::default());

        let solution = completed(engine.run(1).unwrap());
        assert_eq!(engine.extract().unwrap(), solution);
        assert_eq!(engine.extract().unwrap(), solution);
    }

    /// Oracle that claims satisfiability but assigns nothing, violating the
    /// model contract.
    struct StuckOracle;

    impl Oracle for StuckOracle {
        fn allocate_variables(&mut self, _count: usize) {}
        fn set_parallelism(&mut self, _threads: u32) {}
        fn add_clause(&mut self, _clause: &[Lit]) {}

        fn solve(&mut self) -> Result<SolveResult, OracleError> {
            Ok(SolveResult::Satisfiable)
        }

        fn model_value(&self, _var: Var) -> ModelValue {
            ModelValue::Unassigned
        }
    }

    #[test]
    fn unassigned_model_value_is_an_error() {
        let matrix = Matrix::from_rows(&[&[1, 0], &[0, 2]]);
        let mut engine = Engine::new(&matrix, 1, StuckOracle);

        match engine.run(1) {
            Err(EngineError::IncompleteModel(var)) => assert_eq!(var.index(), 0),
            other => panic!("expected an incomplete model error, got {other:?}"),
        }
    }
}
