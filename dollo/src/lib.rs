//! SAT-based completion of partially-specified taxa-by-character matrices
//! under the k-Dollo evolutionary model.
//!
//! The input matrix marks each entry as absent, present or unresolved. Every
//! unresolved entry becomes a Boolean decision variable and a cutting-plane
//! loop repeatedly asks a SAT oracle for a tentative completion, searches it
//! for forbidden three-taxa/two-character sub-patterns and blocks each one
//! found with a new clause, until the oracle either produces a pattern-free
//! completion or proves that none exists.
#![warn(missing_docs)]

pub mod context;
pub mod engine;
pub mod index;
pub mod lit;
pub mod log;
pub mod matrix;
pub mod oracle;
pub mod separate;
pub mod stats;
