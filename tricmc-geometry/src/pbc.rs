use crate::tri_box::Box;
use crate::vec3::Vec3;

/// Periodic boundary conditions with respect to a [`Box`].
///
/// `PeriodicBoundaryConditions` is a thin, cheaply-copied wrapper: it holds the box by value
/// (a `Box` is just two 3x3 matrices) rather than by reference, so it can be handed to worker
/// threads without fighting the borrow checker, and rebuilt whenever the box changes (e.g.
/// after a scaling move is accepted).
///
/// Every correction here is a small per-axis loop, not a single `%` or `round()` call: a point
/// that is only an epsilon outside `[0, 1)` must come back with the same epsilon-sized
/// intact, rather than being thrown to the opposite tolerance by floating-point rounding.
#[derive(Clone, Copy, Debug)]
pub struct PeriodicBoundaryConditions {
    the_box: Box,
}

impl PeriodicBoundaryConditions {
    pub fn new(the_box: Box) -> Self {
        PeriodicBoundaryConditions { the_box }
    }

    pub fn get_box(&self) -> &Box {
        &self.the_box
    }

    /// The absolute correction `c` such that every relative coordinate of `p + c` lies in
    /// `[0, 1)`.
    pub fn get_correction(&self, p: Vec3) -> Vec3 {
        let mut rel = self.the_box.absolute_to_relative(p);
        let mut correction_rel = Vec3::ZERO;
        for axis in 0..3 {
            while rel[axis] < 0.0 {
                rel[axis] += 1.0;
                correction_rel[axis] += 1.0;
            }
            while rel[axis] >= 1.0 {
                rel[axis] -= 1.0;
                correction_rel[axis] -= 1.0;
            }
        }
        self.the_box.relative_to_absolute(correction_rel)
    }

    /// Returns `p` translated by [`Self::get_correction`], i.e. brought back into the box.
    pub fn corrected_position(&self, p: Vec3) -> Vec3 {
        p + self.get_correction(p)
    }

    /// The minimum-image translation that brings `p2` into the image nearest `p1`: every
    /// relative component of the result lies in `(-0.5, 0.5]`.
    pub fn get_translation(&self, p1: Vec3, p2: Vec3) -> Vec3 {
        let rel1 = self.the_box.absolute_to_relative(p1);
        let rel2 = self.the_box.absolute_to_relative(p2);
        let mut delta_rel = rel2 - rel1;
        for axis in 0..3 {
            while delta_rel[axis] > 0.5 {
                delta_rel[axis] -= 1.0;
            }
            while delta_rel[axis] <= -0.5 {
                delta_rel[axis] += 1.0;
            }
        }
        self.the_box.relative_to_absolute(delta_rel)
    }

    /// Squared minimum-image distance between `p1` and `p2`.
    pub fn get_distance2(&self, p1: Vec3, p2: Vec3) -> f64 {
        self.get_translation(p1, p2).length_squared()
    }
}

