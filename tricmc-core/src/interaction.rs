use crate::shape::Shape;
use tricmc_geometry::Vec3;

/// An opaque pair potential.
///
/// `Interaction` is a collaborator contract: this system only needs to know the range over
/// which two shapes can possibly interact, whether the potential has a continuous ("soft")
/// part beyond pure hard-core overlap, and how to query energy/overlap for a pair of shapes
/// whose relative placement is already known.
///
/// Positions handed to [`Interaction::overlap`] and [`Interaction::energy`] are *not*
/// periodic-image-corrected by the interaction itself: the caller (typically a `Packing`
/// implementation walking a `NeighbourGrid`) supplies the `translation` that must be added to
/// `shape2`'s position before comparing it with `shape1`'s, exactly as the neighbour grid hands
/// back `(cell, translation)` pairs rather than mutating positions in place.
pub trait Interaction: Send + Sync {
    /// The radius within which two shapes of this interaction can overlap (hard-core range).
    fn range_radius(&self) -> f64;

    /// The radius within which two shapes can have any non-zero interaction energy at all,
    /// hard-core or soft. Always `>= range_radius()`.
    fn total_range_radius(&self) -> f64;

    /// Whether this interaction has a continuous ("soft") part beyond hard overlap.
    /// A pure hard-particle interaction answers `false`, which lets the box-scaling move
    /// short-circuit around expensive overlap scans (see the simulation driver).
    fn has_soft_part(&self) -> bool;

    /// The (soft) energy contribution for two centres separated by `distance`. Interactions
    /// without a soft part may simply return `0.0`.
    fn energy_for_distance(&self, distance: f64) -> f64;

    /// Whether `shape1` and `shape2` overlap, with `shape2` first translated by `translation`
    /// (the periodic image offset supplied by the caller) and the whole pair optionally scaled
    /// by `scale_factor` (used to probe a trial box before it is committed).
    fn overlap(&self, shape1: &dyn Shape, shape2: &dyn Shape, scale_factor: f64, translation: Vec3) -> bool;

    /// The pairwise energy between `shape1` and `shape2`, under the same translation/scaling
    /// convention as [`Interaction::overlap`].
    fn energy(&self, shape1: &dyn Shape, shape2: &dyn Shape, scale_factor: f64, translation: Vec3) -> f64;
}
