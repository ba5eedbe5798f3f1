//! Collaborator contracts and small value types the `tricmc` simulation driver is built from.
//!
//! This crate defines *traits*, not implementations: `Shape`, `Interaction`, `Packing`,
//! `MoveSampler` and `TriclinicBoxScaler` are all collaborator contracts that a concrete
//! packing simulation (spheres, polyspheres, XenoCollide primitives, ...) satisfies. What
//! lives here as concrete types are the pieces the driver owns directly: `Counter`,
//! `DynamicParameter`, `Environment`.

mod active_region;
mod counter;
mod dynamic_parameter;
mod environment;
mod interaction;
mod move_sampler;
mod packing;
mod shape;

pub use active_region::{ActiveRegion, UnboundedRegion};
pub use counter::Counter;
pub use dynamic_parameter::DynamicParameter;
pub use environment::Environment;
pub use interaction::Interaction;
pub use move_sampler::{MoveData, MoveSampler, MoveType, TriclinicBoxScaler};
pub use packing::Packing;
pub use shape::{orthogonality_deviation, Shape};
