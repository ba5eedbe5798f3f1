//! The Monte Carlo cycle driver: Metropolis acceptance, adaptive step sizes, box scaling,
//! rotation-matrix renormalisation and the domain-decomposed parallel moves phase.
//!
//! [`Simulation`] is the only public entry point; everything it needs from the system under
//! simulation comes through the `Packing`/`Interaction`/`Environment` contracts in
//! `tricmc-core`, so this crate knows nothing about any concrete shape or potential.

mod cancellation;
mod error;
mod observer;
mod simulation;

pub use cancellation::CancellationFlag;
pub use error::SimulationError;
pub use observer::{NullObserver, SimulationObserver};
pub use simulation::Simulation;
