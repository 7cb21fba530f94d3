//! Engine context (logging and statistics).
use crate::{
    log::{HasLogger, Logger},
    stats::Stats,
};

/// Engine context.
///
/// Stores everything that accompanies a run of the
/// [`Engine`][crate::engine::Engine] without being part of the encoding
/// itself.
#[derive(Default)]
#[allow(missing_docs)]
pub struct Ctx {
    pub logger: Logger,
    pub stats: Stats,
}

impl HasLogger for Ctx {
    #[inline(always)]
    fn logger(&self) -> &Logger {
        &self.logger
    }
}
