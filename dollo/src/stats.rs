//! Run statistics.

/// Counters describing one cutting-plane run.
#[derive(Default, Debug)]
pub struct Stats {
    /// Completed solve/separate rounds.
    pub rounds: u64,
    /// Blocking clauses submitted to the oracle so far.
    pub constraints: u64,
}
