use rand::RngCore;
use tricmc_geometry::{Matrix3x3, Vec3};

/// The closed set of elementary move shapes a [`MoveSampler`] can propose.
///
/// Unlike the shape/interaction/packing contracts, which stay open for collaborators to
/// extend, the move kinds themselves are a fixed, well-known vocabulary: the simulation
/// driver needs to know which `Packing::try_*` method to dispatch a given [`MoveData`] to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveType {
    Translation,
    Rotation,
    Rototranslation,
    /// A reflection of the particle's orientation, used for shapes without a definite
    /// chirality (e.g. read off a mirror-symmetric potential).
    Flip,
}

/// A single proposed perturbation of one particle, as produced by [`MoveSampler::sample_move`].
///
/// `translation` and `rotation` are read according to `move_type`: a `Rotation` move leaves
/// `translation` at zero, a `Translation` move leaves `rotation` at the identity, and so on.
/// Carrying both fields unconditionally (rather than an enum-per-variant) keeps dispatch in
/// the simulation driver a single `match` on `move_type` instead of a second enum walk.
#[derive(Clone, Copy, Debug)]
pub struct MoveData {
    pub move_type: MoveType,
    pub particle_idx: usize,
    pub translation: Vec3,
    pub rotation: Matrix3x3,
}

impl MoveData {
    pub fn translation(particle_idx: usize, translation: Vec3) -> Self {
        MoveData { move_type: MoveType::Translation, particle_idx, translation, rotation: Matrix3x3::identity() }
    }

    pub fn rotation(particle_idx: usize, rotation: Matrix3x3) -> Self {
        MoveData { move_type: MoveType::Rotation, particle_idx, translation: Vec3::ZERO, rotation }
    }

    pub fn rototranslation(particle_idx: usize, translation: Vec3, rotation: Matrix3x3) -> Self {
        MoveData { move_type: MoveType::Rototranslation, particle_idx, translation, rotation }
    }

    pub fn flip(particle_idx: usize, rotation: Matrix3x3) -> Self {
        MoveData { move_type: MoveType::Flip, particle_idx, translation: Vec3::ZERO, rotation }
    }
}

/// Proposes translation / rotation / rototranslation / flip moves for particles of the
/// packing, and adapts its own step size(s) as instructed by the simulation driver.
///
/// A single sampler may expose more than one named step size (e.g. a rototranslation sampler
/// tracks a translation step and a rotation step separately); [`MoveSampler::step_sizes`]
/// reports all of them so the driver can log or checkpoint them uniformly.
pub trait MoveSampler: Send + Sync {
    fn name(&self) -> &str;

    /// How many moves this sampler would like to make per pass over `n` particles. The driver
    /// samples `sum(requested)` total moves per cycle, picking a sampler for each one with
    /// probability proportional to its share of that sum.
    fn num_of_requested_moves(&self, n: usize) -> usize;

    /// Proposes one move, choosing among `particle_idxs` (the subdomain's active particles, or
    /// all particles on the single-domain path).
    fn sample_move(&self, particle_idxs: &[usize], rng: &mut dyn RngCore) -> MoveData;

    /// Requests a step-size increase. Returns `false` if the sampler refused (e.g. a
    /// translation step already at half the box height); the driver logs a refusal once and
    /// falls silent about it until the step size actually changes again.
    fn increase_step_size(&mut self) -> bool;

    /// Requests a step-size decrease. Same refusal contract as `increase_step_size`.
    fn decrease_step_size(&mut self) -> bool;

    /// The named step sizes this sampler currently uses.
    fn step_sizes(&self) -> Vec<(String, f64)>;

    /// Overwrites a named step size directly (used when restoring a checkpoint).
    fn set_step_size(&mut self, name: &str, value: f64);
}

/// Proposes a trial box for the box-scaling move and adapts its own step size.
pub trait TriclinicBoxScaler: Send + Sync {
    fn propose_box(&self, old_box: &tricmc_geometry::Box, rng: &mut dyn RngCore) -> tricmc_geometry::Box;

    fn step_size(&self) -> f64;
    fn increase_step_size(&mut self) -> bool;
    fn decrease_step_size(&mut self) -> bool;
}
