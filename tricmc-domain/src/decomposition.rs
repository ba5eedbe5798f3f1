use crate::active_domain::{ActiveDomain, RegionBounds};
use crate::error::TooNarrowDomainError;
use rayon::prelude::*;
use tricmc_core::Packing;
use tricmc_error::AssertionError;
use tricmc_geometry::{Box as TriBox, Vec3};

const GHOST: usize = usize::MAX;

/// Carves a [`tricmc_geometry::Box`] into `∏ domain_divisions` rectangular subdomains separated
/// by ghost layers wide enough that no two subdomains can ever touch the same particle or the
/// same neighbour-grid cell in the same cycle.
///
/// Built fresh once per moves phase from a freshly drawn `origin`, so that successive cycles do
/// not keep the same particles pinned at subdomain boundaries.
pub struct DomainDecomposition {
    the_box: TriBox,
    domain_divisions: [usize; 3],
    region_bounds: [Vec<RegionBounds>; 3],
    particles_in_regions: Vec<Vec<usize>>,
}

impl DomainDecomposition {
    pub fn new(
        packing: &dyn Packing,
        domain_divisions: [usize; 3],
        origin: Vec3,
    ) -> Result<Self, TooNarrowDomainError> {
        let the_box = *packing.get_box();
        let range = packing.range_radius();
        let total_range = packing.total_range_radius();
        let ng_divisions = packing.neighbour_grid_cell_divisions();

        let region_bounds = prepare_domains(the_box, domain_divisions, ng_divisions, range, total_range, origin)?;

        let mut decomposition =
            DomainDecomposition { the_box, domain_divisions, region_bounds, particles_in_regions: Vec::new() };
        decomposition.populate(packing, origin);
        Ok(decomposition)
    }

    pub fn particles_in_region(&self, coords: [usize; 3]) -> &[usize] {
        &self.particles_in_regions[self.coord_to_idx(coords)]
    }

    pub fn is_vector_in_active_region(&self, vector: Vec3, coords: [usize; 3]) -> bool {
        self.is_relative_vector_in_active_region(self.the_box.absolute_to_relative(vector), coords)
    }

    pub fn active_domain_bounds(&self, coords: [usize; 3]) -> ActiveDomain {
        let mut bounds = [RegionBounds::unbounded(); 3];
        for i in 0..3 {
            assert!(coords[i] < self.domain_divisions[i]);
            if self.domain_divisions[i] >= 2 {
                bounds[i] = self.region_bounds[i][coords[i]];
            }
        }
        ActiveDomain::new(self.the_box, bounds)
    }

    fn coord_to_idx(&self, coords: [usize; 3]) -> usize {
        let mut idx = 0usize;
        for i in 0..3 {
            assert!(coords[i] < self.domain_divisions[i]);
            idx = self.domain_divisions[i] * idx + coords[i];
        }
        idx
    }

    fn is_relative_vector_in_active_region(&self, relative: Vec3, coords: [usize; 3]) -> bool {
        for i in 0..3 {
            assert!(coords[i] < self.domain_divisions[i]);
            if self.domain_divisions[i] < 2 {
                continue;
            }
            let bounds = self.region_bounds[i][coords[i]];
            let inside = if bounds.beg < bounds.end {
                relative[i] > bounds.beg && relative[i] < bounds.end
            } else {
                relative[i] > bounds.beg || relative[i] < bounds.end
            };
            if !inside {
                return false;
            }
        }
        true
    }

    fn populate(&mut self, packing: &dyn Packing, origin: Vec3) {
        let num_domains: usize = self.domain_divisions.iter().product();
        self.particles_in_regions = vec![Vec::new(); num_domains];

        let origin_rel = self.the_box.absolute_to_relative(origin);
        let divisions = self.domain_divisions;

        let assignments: Vec<usize> = (0..packing.size())
            .into_par_iter()
            .map(|particle_idx| {
                let pos_rel = self.the_box.absolute_to_relative(packing.position(particle_idx));
                let mut coords = [0usize; 3];
                for i in 0..3 {
                    let signed = ((pos_rel[i] - origin_rel[i]) * divisions[i] as f64).floor() as isize;
                    coords[i] = signed.rem_euclid(divisions[i] as isize) as usize;
                }

                if self.is_relative_vector_in_active_region(pos_rel, coords) {
                    self.coord_to_idx(coords)
                } else {
                    GHOST
                }
            })
            .collect();

        for (particle_idx, &region) in assignments.iter().enumerate() {
            if region != GHOST {
                self.particles_in_regions[region].push(particle_idx);
            }
        }
    }
}

fn fit_periodically(x: f64) -> f64 {
    if x < 0.0 {
        x + 1.0
    } else if x >= 1.0 {
        x - 1.0
    } else {
        x
    }
}

fn prepare_domains(
    the_box: TriBox,
    domain_divisions: [usize; 3],
    ng_divisions: [usize; 3],
    range: f64,
    total_range: f64,
    origin: Vec3,
) -> Result<[Vec<RegionBounds>; 3], TooNarrowDomainError> {
    let heights = the_box.heights();
    let origin_rel = the_box.absolute_to_relative(origin);

    let mut region_bounds: [Vec<RegionBounds>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for coord in 0..3 {
        if origin_rel[coord] < 0.0 || origin_rel[coord] >= 1.0 {
            AssertionError::precondition(format!("origin relative coordinate {coord} out of [0, 1)")).terminate();
        }
        if domain_divisions[coord] == 0 {
            AssertionError::precondition(format!("domain_divisions[{coord}] must be positive")).terminate();
        }
        if ng_divisions[coord] == 0 {
            AssertionError::precondition(format!("ng_divisions[{coord}] must be positive")).terminate();
        }

        if domain_divisions[coord] < 2 {
            continue;
        }

        let ng_cell_size = heights[coord] / ng_divisions[coord] as f64;
        if ng_cell_size < range {
            AssertionError::precondition(format!("neighbour grid cell on axis {coord} is smaller than range")).terminate();
        }
        let whole_domain_width_rel = 1.0 / domain_divisions[coord] as f64;
        // Ghost layer: total interaction range plus the excess size of the NG cell.
        let ghost_layer_width_rel = (total_range - range + ng_cell_size) / heights[coord];

        let ng_cell_size_rel = 1.0 / ng_divisions[coord] as f64;
        if whole_domain_width_rel - ghost_layer_width_rel <= ng_cell_size_rel {
            return Err(TooNarrowDomainError {
                axis: coord,
                domain_width: whole_domain_width_rel * heights[coord],
                ghost_layer_width: ghost_layer_width_rel * heights[coord],
                ng_cell_size,
            });
        }

        let divisions = domain_divisions[coord];
        let mut bounds = vec![RegionBounds { beg: 0.0, end: 0.0 }; divisions];
        let mut previous_ghost_end = f64::NEG_INFINITY;

        for domain_idx in 0..divisions {
            let theoretical_middle = origin_rel[coord] + domain_idx as f64 * whole_domain_width_rel;
            // Snap the ghost-layer middle to the nearest boundary between NG cells.
            let real_middle = ((theoretical_middle * ng_divisions[coord] as f64 - 0.5).round() + 0.5)
                / ng_divisions[coord] as f64;

            let previous_domain_idx = (domain_idx + divisions - 1) % divisions;
            let ghost_beg = real_middle - ghost_layer_width_rel / 2.0;
            let ghost_end = real_middle + ghost_layer_width_rel / 2.0;

            bounds[previous_domain_idx].end = ghost_beg;
            bounds[domain_idx].beg = ghost_end;

            if ghost_beg <= previous_ghost_end {
                AssertionError::precondition(format!(
                    "domain {domain_idx} on axis {coord} has a non-increasing ghost layer start"
                ))
                .terminate();
            }
            previous_ghost_end = ghost_end;

            bounds[previous_domain_idx].end = fit_periodically(bounds[previous_domain_idx].end);
            bounds[domain_idx].beg = fit_periodically(bounds[domain_idx].beg);
        }

        region_bounds[coord] = bounds;
    }

    Ok(region_bounds)
}
