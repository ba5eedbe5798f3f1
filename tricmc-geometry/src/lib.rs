//! Triclinic periodic box and periodic-boundary-condition machinery.
//!
//! This is the geometric invariant layer the rest of the `tricmc` workspace is built on: the
//! [`Box`] owns the side-vector matrix and its cached inverse, [`PeriodicBoundaryConditions`]
//! resolves minimum-image translations against it, and [`Matrix3x3`]/[`Vec3`] are the small
//! linear-algebra building blocks both rest on.

mod euler_angles;
mod matrix3x3;
mod pbc;
mod testing_macros;
mod tri_box;
mod vec3;

pub use euler_angles::EulerAngles;
pub use matrix3x3::Matrix3x3;
pub use pbc::PeriodicBoundaryConditions;
pub use tri_box::Box;
pub use vec3::Vec3;
