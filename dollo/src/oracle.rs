//! The SAT oracle abstraction used by the cutting-plane engine.
//!
//! The engine treats satisfiability solving as a black box behind the
//! [`Oracle`] trait: it allocates variables once, appends blocking clauses
//! between solves and reads the model back after a satisfiable verdict. The
//! clause store is cumulative; clauses are never retracted.
use std::fmt;

use thiserror::Error;

use crate::lit::{Lit, Var};

pub mod splr;

/// Verdict of a blocking [`Oracle::solve`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SolveResult {
    /// The current clause store has a model.
    Satisfiable,
    /// The current clause store has no model.
    Unsatisfiable,
}

/// Value of a variable in the oracle's current model.
///
/// Model queries are three-valued on purpose: a backend leaving a decision
/// variable unassigned after a satisfiable solve is a contract violation that
/// the engine checks for explicitly instead of defaulting it away.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ModelValue {
    /// The variable is true in the model.
    True,
    /// The variable is false in the model.
    False,
    /// The backend did not assign the variable.
    Unassigned,
}

/// Unrecoverable failure inside the solver backend.
///
/// The engine never retries a solve; a backend failure aborts the run.
#[derive(Error, Debug)]
#[error("sat backend failure: {message}")]
pub struct OracleError {
    message: String,
}

impl OracleError {
    /// Wraps a backend specific error value.
    pub fn backend(detail: impl fmt::Debug) -> OracleError {
        OracleError {
            message: format!("{detail:?}"),
        }
    }
}

/// Incremental SAT solving interface required by the engine.
pub trait Oracle {
    /// Reserves `count` fresh decision variables with indices `0..count`.
    fn allocate_variables(&mut self, count: usize);

    /// Advisory parallelism hint; never changes solving semantics.
    fn set_parallelism(&mut self, threads: u32);

    /// Appends a disjunctive clause, affecting all subsequent solves.
    fn add_clause(&mut self, clause: &[Lit]);

    /// Solves the current clause store to completion.
    fn solve(&mut self) -> Result<SolveResult, OracleError>;

    /// Value of a variable in the current model.
    ///
    /// Only meaningful directly after a [`SolveResult::Satisfiable`] verdict.
    fn model_value(&self, var: Var) -> ModelValue;
}
