use std::any::Any;
use tricmc_geometry::{Matrix3x3, Vec3};

/// A rigid body placed in the packing: a position, an orientation, and optional opaque
/// per-particle data (e.g. a patch pattern or a polysphere template index).
///
/// `Shape` itself carries no overlap logic — shape-specific overlap algorithms are a
/// collaborator's concern (a `Sphere`, a `Polysphere`, an XenoCollide primitive, ...). What
/// this system needs from a shape is just enough to place it in the box, sample moves for it,
/// and renormalise its orientation.
pub trait Shape: Send + Sync {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);

    /// The proper rotation matrix describing this shape's orientation.
    /// Invariant: `R . R^T = I` to within a drift tolerance of about `1e-14`.
    fn orientation(&self) -> &Matrix3x3;
    fn set_orientation(&mut self, orientation: Matrix3x3);

    /// Opaque per-particle data, if this shape carries any. Downcast with `data().downcast_ref`.
    fn data(&self) -> Option<&dyn Any> {
        None
    }
}

/// How far `R . R^T - I` has drifted from zero, squared-Frobenius-norm style.
///
/// Used by the simulation driver's rotation-matrix-fix pass to decide which orientations
/// need re-orthonormalising.
pub fn orthogonality_deviation(r: &Matrix3x3) -> f64 {
    let rt = r.transpose();
    let drift = r.mul_mat(&rt) - Matrix3x3::identity();
    drift.frobenius_norm_squared()
}

