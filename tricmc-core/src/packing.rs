use crate::active_region::ActiveRegion;
use crate::interaction::Interaction;
use tricmc_geometry::{Box, Matrix3x3, Vec3};

/// A container of shapes plus the neighbour-grid index over them.
///
/// `Packing` is the single piece of shared mutable state in this system: every worker thread
/// in a domain-decomposed cycle mutates it (through `try_*`/`accept_move`), and the
/// concurrency model (see the simulation driver's module docs) depends entirely on the
/// disjointness of the active regions passed to `try_translation`/`try_move` to make that
/// safe. A `Packing` implementation owns its shapes, its `Box`, and a `NeighbourGrid` keyed to
/// them; this crate only states the contract the simulation driver needs, not how shapes are
/// stored or how overlap is actually tested (that is `Interaction`'s and the shapes' concern).
pub trait Packing: Send + Sync {
    fn size(&self) -> usize;
    fn get_box(&self) -> &Box;

    /// The absolute position of particle `i`. `DomainDecomposition` reads this to assign
    /// particles to subdomains; it does not otherwise need access to a shape's full state.
    fn position(&self, i: usize) -> Vec3;

    /// The orientation matrix of particle `i`. Read by the simulation driver's rotation-matrix
    /// renormalisation pass, which does not otherwise need access to a shape's full state.
    fn orientation(&self, i: usize) -> Matrix3x3;

    /// Overwrites the orientation of particle `i` directly, bypassing the trial/accept
    /// machinery. Used only by the rotation-matrix renormalisation pass, which corrects
    /// floating-point drift rather than proposing a physical move.
    fn set_orientation(&mut self, i: usize, orientation: Matrix3x3);

    /// The hard-core interaction range currently configured (see `Interaction::range_radius`).
    fn range_radius(&self) -> f64;
    /// The total (hard + soft) interaction range currently configured.
    fn total_range_radius(&self) -> f64;

    /// Interior cell-division counts of the owned neighbour grid, per axis. Consumed by
    /// `DomainDecomposition` to snap ghost-layer boundaries to cell boundaries.
    fn neighbour_grid_cell_divisions(&self) -> [usize; 3];

    /// How many worker threads this packing can be mutated from concurrently (one per active
    /// subdomain, bounded by hardware/caller configuration).
    fn move_threads(&self) -> usize;

    /// Attempts translating particle `i` by `delta`. Returns `Some(delta_energy)` if the trial
    /// is energetically/geometrically legal (no created overlap, and — if `active_region` is
    /// given — the new position stays inside it); `None` rejects the trial outright without
    /// mutating any shared state. On `Some`, the packing is left in the *trial* state; the
    /// caller must follow up with `accept_move` or `revert_move`.
    fn try_translation(
        &mut self,
        i: usize,
        delta: Vec3,
        interaction: &dyn Interaction,
        active_region: Option<&dyn ActiveRegion>,
    ) -> Option<f64>;

    fn try_rotation(&mut self, i: usize, rotation: &Matrix3x3, interaction: &dyn Interaction) -> Option<f64>;

    /// A combined translation + rotation ("rototranslation"), tried atomically.
    fn try_move(
        &mut self,
        i: usize,
        delta: Vec3,
        rotation: &Matrix3x3,
        interaction: &dyn Interaction,
        active_region: Option<&dyn ActiveRegion>,
    ) -> Option<f64>;

    /// Commits the most recently tried single-particle move.
    fn accept_move(&mut self);

    /// Discards the most recently tried single-particle move, restoring prior state.
    fn revert_move(&mut self);

    /// Attempts replacing the box with `new_box`, rescaling (or not, per implementation) the
    /// particle positions along with it. Returns `Some(delta_energy)` on a legal trial,
    /// `None` if it would create an overlap that cannot be tolerated.
    fn try_scaling(&mut self, new_box: Box, interaction: &dyn Interaction) -> Option<f64>;

    /// Commits the most recently tried box scaling.
    fn accept_scaling(&mut self);

    /// Discards the most recently tried box scaling, restoring the previous box and positions.
    fn revert_scaling(&mut self);

    /// Counts the total number of overlapping pairs. If `early_exit` is set, implementations
    /// may stop as soon as the first overlap is found and report a lower bound (used by the
    /// hot "is this already overlapping" check, not by overlap-relaxation's termination test).
    fn count_total_overlaps(&self, interaction: &dyn Interaction, early_exit: bool) -> usize;

    /// Turns the (expensive) cached-overlap-count bookkeeping on or off. The overlap-relaxation
    /// mode needs it on; plain integration leaves it off once the packing is known overlap-free.
    fn toggle_overlap_counting(&mut self, enabled: bool, interaction: &dyn Interaction);

    /// The overlap count cached by `toggle_overlap_counting(true, ..)`, updated incrementally as
    /// moves are accepted/reverted rather than recomputed from scratch.
    fn cached_number_of_overlaps(&self) -> usize;

    /// Reconfigures any interaction-range-dependent internals (neighbour grid cell size, say)
    /// for a (possibly new) interaction.
    fn setup_for_interaction(&mut self, interaction: &dyn Interaction);

    /// Clears move/acceptance counters owned by the packing itself (if any).
    fn reset_counters(&mut self);

    /// Resets the debug-only neighbour-grid race-condition sanitiser ahead of a new parallel
    /// moves phase.
    fn reset_ng_race_condition_sanitizer(&mut self);
}
