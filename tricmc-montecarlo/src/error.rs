use thiserror::Error;
use tricmc_domain::TooNarrowDomainError;

/// Raised when [`crate::Simulation`] cannot start or continue a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("environment is incomplete: temperature, pressure, movers and a box scaler must all be set")]
    IncompleteEnvironment,

    #[error("packing already contains overlaps before integration started")]
    PreexistingOverlaps,

    #[error("{num_domains} requested domains exceeds the packing's {move_threads} move threads")]
    TooManyDomains { num_domains: usize, move_threads: usize },

    #[error(transparent)]
    TooNarrowDomain(#[from] TooNarrowDomainError),
}
