use tricmc_geometry::Vec3;

/// Membership test for a point against some region of the box.
///
/// `Packing::try_translation`/`try_move` accept an optional `&dyn ActiveRegion` so that, under
/// domain-decomposed parallel moves, a trial that would carry a particle out of its
/// subdomain's active region can be rejected before it ever touches shared state. Defined here
/// (rather than alongside `DomainDecomposition`, which implements it) so that `Packing` does
/// not need to depend on the domain-decomposition crate to state its own contract.
pub trait ActiveRegion: Send + Sync {
    fn contains(&self, position: Vec3) -> bool;
}

/// The trivial region: everything is active. Used for the single-domain move path, where no
/// decomposition is in play and every trial is unconditionally in-bounds.
pub struct UnboundedRegion;

impl ActiveRegion for UnboundedRegion {
    fn contains(&self, _position: Vec3) -> bool {
        true
    }
}
