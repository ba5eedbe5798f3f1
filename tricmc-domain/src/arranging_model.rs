use tricmc_error::AssertionError;
use tricmc_geometry::{Box as TriBox, Vec3};

/// Lays `n` particles out on an orthorhombic lattice inscribed in a `Box`, with identity
/// orientations.
///
/// This is a pure function of `(n, the_box)`: it knows nothing about interaction range or
/// overlap, so a caller after an arrangement still needs overlap relaxation to reach a legal
/// starting configuration before running `Simulation::integrate`.
pub struct OrthorhombicArrangingModel;

impl OrthorhombicArrangingModel {
    /// Picks per-axis particle counts proportional to `the_box`'s side lengths (as closely as
    /// integers allow) and places one particle at the centre of each of the resulting cells,
    /// in row-major order, truncated to the first `n`.
    pub fn arrange(n: usize, the_box: &TriBox) -> Vec<Vec3> {
        if n == 0 {
            AssertionError::precondition("OrthorhombicArrangingModel::arrange given n == 0").terminate();
        }

        let heights = the_box.heights();
        let counts = per_axis_counts(n, heights);

        let mut positions = Vec::with_capacity(n);
        'outer: for i in 0..counts[0] {
            for j in 0..counts[1] {
                for k in 0..counts[2] {
                    if positions.len() >= n {
                        break 'outer;
                    }
                    let relative = Vec3::new(
                        (i as f64 + 0.5) / counts[0] as f64,
                        (j as f64 + 0.5) / counts[1] as f64,
                        (k as f64 + 0.5) / counts[2] as f64,
                    );
                    positions.push(the_box.relative_to_absolute(relative));
                }
            }
        }
        positions
    }
}

/// Smallest `(nx, ny, nz)` with `nx*ny*nz >= n` that keep each axis's count proportional to its
/// height, found by starting from the isotropic cube-root guess and growing the smallest-count
/// axis first until the product suffices.
fn per_axis_counts(n: usize, heights: [f64; 3]) -> [usize; 3] {
    let total_height: f64 = heights.iter().sum();
    let cube_root_n = (n as f64).cbrt();

    let mut counts = [0usize; 3];
    for axis in 0..3 {
        let share = heights[axis] / total_height * 3.0;
        counts[axis] = ((cube_root_n * share).ceil() as usize).max(1);
    }

    while counts[0] * counts[1] * counts[2] < n {
        let smallest_axis = (0..3).min_by(|&a, &b| {
            (counts[a] as f64 / heights[a]).partial_cmp(&(counts[b] as f64 / heights[b])).unwrap()
        }).unwrap();
        counts[smallest_axis] += 1;
    }

    counts
}
