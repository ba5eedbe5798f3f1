use tricmc_core::ActiveRegion;
use tricmc_geometry::{Box as TriBox, Vec3};

/// The bounds of one subdomain along a single axis, in relative (fractional) coordinates.
///
/// `beg < end` is the ordinary case. When the subdomain wraps across the periodic boundary
/// (e.g. `beg = 0.9, end = 0.1`), `beg > end` instead, and membership is inverted: a point is
/// inside iff it is *outside* `(end, beg)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionBounds {
    pub beg: f64,
    pub end: f64,
}

impl RegionBounds {
    pub fn unbounded() -> Self {
        RegionBounds { beg: f64::NEG_INFINITY, end: f64::INFINITY }
    }

    fn contains(&self, coord: f64) -> bool {
        if self.beg < self.end {
            coord > self.beg && coord < self.end
        } else {
            coord > self.beg || coord < self.end
        }
    }
}

/// One subdomain of a [`crate::DomainDecomposition`]: a per-axis triple of [`RegionBounds`]
/// plus the box they are relative to.
#[derive(Clone, Copy, Debug)]
pub struct ActiveDomain {
    bounds: [RegionBounds; 3],
    the_box: TriBox,
}

impl ActiveDomain {
    pub fn new(the_box: TriBox, bounds: [RegionBounds; 3]) -> Self {
        ActiveDomain { bounds, the_box }
    }

    pub fn bounds_for_axis(&self, axis: usize) -> RegionBounds {
        self.bounds[axis]
    }

    fn is_inside_relative(&self, relative: Vec3) -> bool {
        (0..3).all(|i| self.bounds[i].contains(relative[i]))
    }
}

impl ActiveRegion for ActiveDomain {
    fn contains(&self, position: Vec3) -> bool {
        self.is_inside_relative(self.the_box.absolute_to_relative(position))
    }
}
