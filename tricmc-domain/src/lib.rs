//! Splits a [`tricmc_geometry::Box`] into ghost-separated subdomains so that a simulation driver
//! can mutate disjoint [`ActiveDomain`]s from multiple threads without racing on shared state.
//!
//! A fresh [`DomainDecomposition`] is built once per moves phase from a randomly drawn origin
//! (see the simulation driver), assigning every particle to exactly one subdomain or marking it
//! a ghost that no thread may touch this phase.

mod active_domain;
mod arranging_model;
mod decomposition;
mod error;

pub use active_domain::{ActiveDomain, RegionBounds};
pub use arranging_model::OrthorhombicArrangingModel;
pub use decomposition::DomainDecomposition;
pub use error::TooNarrowDomainError;
