use crate::error::RaceConditionError;
use tricmc_error::ValidationError;
use tricmc_geometry::{Box as TriBox, Vec3};

const LIST_END: usize = usize::MAX;

/// A sentinel meaning "this cell has not yet been claimed by any thread since the sanitiser was
/// last reset" — shares the `LIST_END` value since both mean "no index here yet".
const UNCLAIMED: usize = usize::MAX;

/// A sparse linked-cell index over a [`TriBox`] giving O(1) insertion/removal and sub-linear
/// neighbour enumeration, with ghost cells aliased to their real counterparts so that readers
/// never have to special-case a periodic image.
///
/// Particles are identified by a plain `usize` index supplied by the caller (typically a
/// `Packing`'s particle index) rather than owned here; this grid only ever stores indices, not
/// positions, which is what lets `successors` be a flat intrusive singly-linked list instead of
/// one heap allocation per insertion.
pub struct NeighbourGrid {
    the_box: TriBox,
    cell_divisions: [usize; 3],
    relative_cell_size: [f64; 3],
    cell_heads: Vec<usize>,
    cell_owning_threads: Vec<usize>,
    successors: Vec<usize>,
    translations: [Vec3; 27],
    translation_indices: Vec<usize>,
    reflected_cells: Vec<usize>,
    num_cells: usize,
    neighbouring_cell_offsets: Vec<usize>,
    positive_neighbouring_cell_offsets: Vec<usize>,
    sanitize_race_conditions: bool,
}

impl NeighbourGrid {
    /// Builds a grid over `the_box` with a minimum cell size of `cell_size`, sized to hold up
    /// to `num_particles` particles. Fails if any axis would end up with fewer than one
    /// interior cell.
    pub fn new(the_box: TriBox, cell_size: f64, num_particles: usize) -> Result<Self, ValidationError> {
        if cell_size <= 0.0 {
            return Err(ValidationError::not_positive("cell_size", cell_size));
        }

        let mut grid = NeighbourGrid {
            the_box,
            cell_divisions: [0; 3],
            relative_cell_size: [0.0; 3],
            cell_heads: Vec::new(),
            cell_owning_threads: Vec::new(),
            successors: vec![LIST_END; num_particles],
            translations: [Vec3::ZERO; 27],
            translation_indices: Vec::new(),
            reflected_cells: Vec::new(),
            num_cells: 0,
            neighbouring_cell_offsets: Vec::new(),
            positive_neighbouring_cell_offsets: Vec::new(),
            sanitize_race_conditions: false,
        };
        grid.setup_sizes(the_box, cell_size)?;
        grid.cell_heads = vec![LIST_END; grid.num_cells];
        grid.cell_owning_threads = vec![UNCLAIMED; grid.num_cells];
        grid.translation_indices = vec![0; grid.num_cells];
        grid.reflected_cells = vec![0; grid.num_cells];
        grid.rebuild_reflection_tables();
        grid.fill_neighbouring_cell_offsets();
        Ok(grid)
    }

    /// Enables the debug-only cross-thread cell-touch sanitiser. Cheap to carry in release
    /// builds too (it is just an extra `Vec<usize>`), but callers outside debug assertions
    /// should leave it off.
    pub fn set_race_condition_sanitizing(&mut self, enabled: bool) {
        self.sanitize_race_conditions = enabled;
    }

    fn setup_sizes(&mut self, new_box: TriBox, new_cell_size: f64) -> Result<(), ValidationError> {
        let heights = new_box.heights();
        let mut cell_divisions = [0usize; 3];
        for i in 0..3 {
            let interior = (heights[i] / new_cell_size).floor() as isize;
            if interior < 1 {
                return Err(ValidationError::invalid(
                    "neighbour grid cell size",
                    format!("axis {i}: height {} is smaller than cell size {new_cell_size}", heights[i]),
                ));
            }
            cell_divisions[i] = interior as usize + 2;
        }

        self.the_box = new_box;
        self.cell_divisions = cell_divisions;
        for i in 0..3 {
            self.relative_cell_size[i] = 1.0 / (cell_divisions[i] - 2) as f64;
        }
        self.calculate_translations();
        self.num_cells = cell_divisions.iter().product();
        Ok(())
    }

    fn calculate_translations(&mut self) {
        for i in 0..3usize {
            for j in 0..3usize {
                for k in 0..3usize {
                    let relative = Vec3::new(i as f64 - 1.0, j as f64 - 1.0, k as f64 - 1.0);
                    let idx = flatten_translation_index(i, j, k);
                    self.translations[idx] = self.the_box.relative_to_absolute(relative);
                }
            }
        }
    }

    fn cell_no_to_coordinates(&self, mut cell_no: usize) -> [usize; 3] {
        let mut coords = [0usize; 3];
        for i in 0..3 {
            coords[i] = cell_no % self.cell_divisions[i];
            cell_no /= self.cell_divisions[i];
        }
        coords
    }

    fn coordinates_to_cell_no(&self, coords: [usize; 3]) -> usize {
        let mut result = 0usize;
        for i in (0..3).rev() {
            result = self.cell_divisions[i] * result + coords[i];
        }
        result
    }

    fn real_coordinates_to_cell_no(&self, coords: [usize; 3]) -> usize {
        let mut result = 0usize;
        for i in (0..3).rev() {
            result = self.cell_divisions[i] * result + coords[i] + 1;
        }
        result
    }

    fn cell_neighbour_to_cell_no(&self, coords: [usize; 3], neighbour: [isize; 3]) -> usize {
        let mut result = 0usize;
        for i in (0..3).rev() {
            let ix = (coords[i] as isize + neighbour[i] - 1) as usize;
            debug_assert!(ix < self.cell_divisions[i]);
            result = self.cell_divisions[i] * result + ix;
        }
        result
    }

    fn is_cell_reflected(&self, cell_no: usize) -> bool {
        let coords = self.cell_no_to_coordinates(cell_no);
        (0..3).any(|i| coords[i] == 0 || coords[i] == self.cell_divisions[i] - 1)
    }

    fn get_reflected_cell_data(&self, cell_no: usize) -> (usize, usize) {
        if !self.is_cell_reflected(cell_no) {
            return (cell_no, flatten_translation_index(1, 1, 1));
        }

        let mut coords = self.cell_no_to_coordinates(cell_no);
        let mut trans_coord = [1usize; 3];
        for i in 0..3 {
            if coords[i] == 0 {
                coords[i] = self.cell_divisions[i] - 2;
                trans_coord[i] = 0;
            } else if coords[i] == self.cell_divisions[i] - 1 {
                coords[i] = 1;
                trans_coord[i] = 2;
            }
        }

        let trans_idx = flatten_translation_index(trans_coord[0], trans_coord[1], trans_coord[2]);
        (self.coordinates_to_cell_no(coords), trans_idx)
    }

    fn rebuild_reflection_tables(&mut self) {
        for i in 0..self.num_cells {
            let (real, trans_idx) = self.get_reflected_cell_data(i);
            self.reflected_cells[i] = real;
            self.translation_indices[i] = trans_idx;
        }
    }

    fn fill_neighbouring_cell_offsets(&mut self) {
        self.neighbouring_cell_offsets.clear();
        self.positive_neighbouring_cell_offsets.clear();

        let test_cell_coords = [
            self.cell_divisions[0] / 2,
            self.cell_divisions[1] / 2,
            self.cell_divisions[2] / 2,
        ];
        let test_cell_no = self.coordinates_to_cell_no(test_cell_coords);

        let mut neighbour = [0isize; 3];
        loop {
            let neighbour_no = self.cell_neighbour_to_cell_no(test_cell_coords, neighbour);
            let offset = neighbour_no.wrapping_sub(test_cell_no);
            self.neighbouring_cell_offsets.push(offset);
            if 9 * neighbour[0] + 3 * neighbour[1] + neighbour[2] > 13 {
                self.positive_neighbouring_cell_offsets.push(offset);
            }

            if !increment(&mut neighbour) {
                break;
            }
        }

        self.neighbouring_cell_offsets.sort_unstable();
        self.neighbouring_cell_offsets.dedup();
        self.positive_neighbouring_cell_offsets.sort_unstable();
        self.positive_neighbouring_cell_offsets.dedup();
    }

    /// Maps an absolute position to its (real) cell number, clamping relative coordinates that
    /// have drifted by no more than `10 * f64::EPSILON` outside `[0, 1)` back onto the boundary.
    /// A larger drift is a precondition violation — the caller handed in a position that was
    /// never brought inside the box.
    pub fn position_to_cell_no(&self, position: Vec3) -> usize {
        const EPSILON: f64 = f64::EPSILON * 10.0;
        let relative = self.the_box.absolute_to_relative(position);
        let mut result = 0usize;
        for i in (0..3).rev() {
            let mut r = relative[i];
            if r < 0.0 {
                assert!(r > -EPSILON, "position drifted too far outside the box on axis {i}: {r}");
                r = 0.0;
            } else if r >= 1.0 {
                assert!(r < 1.0 + EPSILON, "position drifted too far outside the box on axis {i}: {r}");
                r = 1.0 - EPSILON;
            }
            // +1: the first row of cells on each edge is reflected, not real.
            let coord = (r / self.relative_cell_size[i]) as usize + 1;
            result = self.cell_divisions[i] * result + coord;
        }
        result
    }

    /// Inserts `idx` into the cell containing `position`. When the race-condition sanitiser is
    /// enabled, the caller is expected to have already claimed this cell via
    /// [`Self::check_race_condition`] — `add`/`remove` do not check it themselves, since during
    /// a domain-decomposed moves phase the claim must cover every mutation of the trial (the
    /// neighbour grid removal *and* the re-insertion), not just this one call.
    pub fn add(&mut self, idx: usize, position: Vec3) {
        let cell_no = self.position_to_cell_no(position);
        self.add_to_cell(idx, cell_no);
    }

    /// Inserts `idx` directly into the real cell `cell_no` (as previously returned by
    /// [`Self::position_to_cell_no`]).
    pub fn add_to_cell(&mut self, idx: usize, cell_no: usize) {
        self.successors[idx] = self.cell_heads[cell_no];
        self.cell_heads[cell_no] = idx;
    }

    /// Removes `idx` from the cell containing `position`. A no-op if `idx` is not present
    /// there.
    pub fn remove(&mut self, idx: usize, position: Vec3) {
        let cell_no = self.position_to_cell_no(position);
        let head = self.cell_heads[cell_no];
        if head == idx {
            self.cell_heads[cell_no] = self.successors[idx];
            self.successors[idx] = LIST_END;
            return;
        }

        let mut current = head;
        while current != LIST_END {
            if self.successors[current] == idx {
                self.successors[current] = self.successors[idx];
                self.successors[idx] = LIST_END;
                return;
            }
            current = self.successors[current];
        }
    }

    /// Empties every cell's linked list and clears the race-condition sanitiser's claims.
    pub fn clear(&mut self) {
        self.cell_heads.iter_mut().for_each(|h| *h = LIST_END);
        self.cell_owning_threads.iter_mut().for_each(|t| *t = UNCLAIMED);
        self.successors.iter_mut().for_each(|s| *s = LIST_END);
    }

    /// Recomputes sizes for `new_box`/`new_cell_size`. Returns `Ok(false)` (and only clears)
    /// if the per-axis cell counts are unchanged; otherwise rebuilds the reflection/offset
    /// tables, reallocating storage if the grid grew, and returns `Ok(true)`.
    pub fn resize(&mut self, new_box: TriBox, new_cell_size: f64) -> Result<bool, ValidationError> {
        let old_divisions = self.cell_divisions;
        let old_num_cells = self.num_cells;
        self.setup_sizes(new_box, new_cell_size)?;

        if self.cell_divisions == old_divisions {
            self.clear();
            return Ok(false);
        }

        if old_num_cells < self.num_cells {
            self.cell_heads.resize(self.num_cells, LIST_END);
            self.cell_owning_threads.resize(self.num_cells, UNCLAIMED);
            self.translation_indices.resize(self.num_cells, 0);
            self.reflected_cells.resize(self.num_cells, 0);
        }

        self.rebuild_reflection_tables();
        self.fill_neighbouring_cell_offsets();
        self.clear();
        Ok(true)
    }

    /// The linked list of particle indices in the cell containing `position`.
    pub fn get_cell(&self, position: Vec3) -> CellView<'_> {
        let cell_no = self.position_to_cell_no(position);
        CellView { grid: self, head: self.cell_heads[cell_no] }
    }

    /// The linked list of particle indices in the real (interior) cell at `coord`.
    pub fn get_cell_at(&self, coord: [usize; 3]) -> CellView<'_> {
        for i in 0..3 {
            assert!(coord[i] < self.cell_divisions[i] - 2);
        }
        let cell_no = self.real_coordinates_to_cell_no(coord);
        CellView { grid: self, head: self.cell_heads[cell_no] }
    }

    /// All particle indices in the 27-cell stencil around the cell containing `position`.
    /// Allocates; prefer [`Self::get_neighbouring_cells`] in hot loops.
    pub fn get_neighbours(&self, position: Vec3) -> Vec<usize> {
        let cell_no = self.position_to_cell_no(position);
        let mut result = Vec::new();
        for &offset in &self.neighbouring_cell_offsets {
            result.extend(self.cell_view_at(cell_no.wrapping_add(offset)));
        }
        result
    }

    fn cell_view_at(&self, cell_no: usize) -> CellView<'_> {
        let real = self.reflected_cells[cell_no];
        CellView { grid: self, head: self.cell_heads[real] }
    }

    /// A view over the 27 (or 13, if `only_positive`) neighbouring cells of the cell containing
    /// `position`, each paired with the periodic-image translation the caller must apply before
    /// comparing positions in it against `position`.
    pub fn get_neighbouring_cells(&self, position: Vec3, only_positive: bool) -> NeighboursView<'_> {
        let cell_no = self.position_to_cell_no(position);
        self.neighbouring_cells_view(cell_no, only_positive)
    }

    /// Same as [`Self::get_neighbouring_cells`], but addressing the cell by real interior
    /// coordinates rather than a position.
    pub fn get_neighbouring_cells_at(&self, coord: [usize; 3], only_positive: bool) -> NeighboursView<'_> {
        for i in 0..3 {
            assert!(coord[i] < self.cell_divisions[i] - 2);
        }
        let cell_no = self.real_coordinates_to_cell_no(coord);
        self.neighbouring_cells_view(cell_no, only_positive)
    }

    fn neighbouring_cells_view(&self, cell_no: usize, only_positive: bool) -> NeighboursView<'_> {
        let offsets = if only_positive { &self.positive_neighbouring_cell_offsets } else { &self.neighbouring_cell_offsets };
        NeighboursView { grid: self, cell_no, offsets, next: 0 }
    }

    /// Interior (non-ghost) cell counts per axis.
    pub fn cell_divisions(&self) -> [usize; 3] {
        [self.cell_divisions[0] - 2, self.cell_divisions[1] - 2, self.cell_divisions[2] - 2]
    }

    /// Clears which thread "owns" each cell, ahead of a fresh parallel moves phase.
    pub fn reset_race_condition_sanitizer(&mut self) {
        self.cell_owning_threads.iter_mut().for_each(|t| *t = UNCLAIMED);
    }

    /// Records `thread_id` as the mutator of `position`'s cell (for the duration of one
    /// sanitiser window), failing if a different thread already claimed it. Intended to be
    /// called by a `Packing` implementation right before it mutates this grid on behalf of a
    /// domain-decomposed move.
    pub fn check_race_condition(&mut self, position: Vec3, thread_id: usize) -> Result<(), RaceConditionError> {
        if !self.sanitize_race_conditions {
            return Ok(());
        }
        let cell_no = self.position_to_cell_no(position);
        self.sanitize(cell_no, "check_race_condition", thread_id)
    }

    fn sanitize(&mut self, cell_no: usize, method: &'static str, thread_id: usize) -> Result<(), RaceConditionError> {
        let claimant = self.cell_owning_threads[cell_no];
        if claimant == UNCLAIMED {
            self.cell_owning_threads[cell_no] = thread_id;
            return Ok(());
        }
        if claimant == thread_id {
            return Ok(());
        }

        let coords = self.cell_no_to_coordinates(cell_no);
        let bounds = self.cell_bounds(coords);
        let coords = [coords[0] - 1, coords[1] - 1, coords[2] - 1];
        log::error!("race condition in {method}: cell {cell_no} claimed by thread {claimant}, touched by {thread_id}");
        Err(RaceConditionError {
            method,
            cell_no,
            coords,
            bounds,
            first_thread: claimant,
            offending_thread: thread_id,
        })
    }

    fn cell_bounds(&self, coords: [usize; 3]) -> [(f64, f64); 3] {
        let mut bounds = [(0.0, 0.0); 3];
        for i in 0..3 {
            let beg = (coords[i] as f64 - 1.0) / self.cell_divisions[i] as f64;
            bounds[i] = (beg, beg + self.relative_cell_size[i]);
        }
        bounds
    }
}

fn flatten_translation_index(i: usize, j: usize, k: usize) -> usize {
    i * 3 * 3 + j * 3 + k
}

fn increment(coords: &mut [isize; 3]) -> bool {
    for i in 0..3 {
        coords[i] += 1;
        if coords[i] > 2 && i < 2 {
            coords[i] = 0;
        } else {
            break;
        }
    }
    coords[2] <= 2
}

/// A read-only view over one cell's intrusive linked list.
pub struct CellView<'a> {
    grid: &'a NeighbourGrid,
    head: usize,
}

impl<'a> Iterator for CellView<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.head == LIST_END {
            return None;
        }
        let current = self.head;
        self.head = self.grid.successors[current];
        Some(current)
    }
}

/// One neighbouring cell's particle list, paired with the periodic-image translation to apply
/// to positions read from it.
pub struct NeighbourCellData<'a> {
    grid: &'a NeighbourGrid,
    head: usize,
    pub translation: Vec3,
}

impl<'a> NeighbourCellData<'a> {
    pub fn particles(&self) -> CellView<'a> {
        CellView { grid: self.grid, head: self.head }
    }
}

/// An iterator over the 27 (or 13) neighbouring cells of one cell.
pub struct NeighboursView<'a> {
    grid: &'a NeighbourGrid,
    cell_no: usize,
    offsets: &'a [usize],
    next: usize,
}

impl<'a> Iterator for NeighboursView<'a> {
    type Item = NeighbourCellData<'a>;

    fn next(&mut self) -> Option<NeighbourCellData<'a>> {
        let offset = *self.offsets.get(self.next)?;
        self.next += 1;

        let neighbour_cell_no = self.cell_no.wrapping_add(offset);
        let translation_idx = self.grid.translation_indices[neighbour_cell_no];
        let real = self.grid.reflected_cells[neighbour_cell_no];
        Some(NeighbourCellData {
            grid: self.grid,
            head: self.grid.cell_heads[real],
            translation: self.grid.translations[translation_idx],
        })
    }
}
