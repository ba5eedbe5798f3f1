use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A process-wide "please stop" flag.
///
/// Signal handlers cannot carry context, so this has to be a single atomic cell rather than
/// something owned by the [`crate::Simulation`] it guards. The simulation driver only polls
/// `check()` between cycles; registering a handler is a separate, explicit step so that tests
/// and embedders that don't want a global `SIGINT`/`SIGTERM` hook can skip it.
#[derive(Clone)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        CancellationFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn check(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Registers a `SIGINT`/`SIGTERM` handler that raises this flag. The handler lives for the
    /// rest of the process; there is no matching deregistration call because `ctrlc` does not
    /// offer one.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.raise())
    }
}

impl Default for CancellationFlag {
    fn default() -> Self {
        CancellationFlag::new()
    }
}
