use thiserror::Error;

/// A cross-thread touch of the same neighbour-grid cell was detected by the debug-only race
/// condition sanitiser.
///
/// Terminal: this always signals a bug in the active-region/ghost-layer guarantee a
/// `DomainDecomposition` is supposed to provide, not a recoverable condition.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "race condition in {method}: cell {cell_no} (coords {coords:?}, rel. bounds {bounds:?}) \
     was first claimed by thread {first_thread} and then touched by thread {offending_thread}"
)]
pub struct RaceConditionError {
    pub method: &'static str,
    pub cell_no: usize,
    pub coords: [usize; 3],
    pub bounds: [(f64, f64); 3],
    pub first_thread: usize,
    pub offending_thread: usize,
}

impl RaceConditionError {
    pub fn terminate(self) -> ! {
        panic!("{}", self)
    }
}
