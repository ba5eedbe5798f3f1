use crate::matrix3x3::Matrix3x3;
use tricmc_error::AssertionError;

const EPSILON: f64 = 1e-12;
const GIMBAL_EPSILON: f64 = 1e-8;

/// Extrinsic XYZ Euler (Tait-Bryan) angles for a rotation matrix, in `(x, y, z)` order.
///
/// Away from a gimbal lock there are two distinct solutions, [`EulerAngles::first`] and
/// [`EulerAngles::second`]; at a gimbal lock (`y` angle at `±π/2`) there are infinitely many,
/// and both fields carry the same solution with the `x` angle pinned to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerAngles {
    pub first: [f64; 3],
    pub second: [f64; 3],
}

impl EulerAngles {
    /// Decomposes `matrix` into its two Euler-angle solutions.
    ///
    /// `matrix` must be a proper rotation (`R·Rᵀ = I` to within [`EPSILON`]); violating this is
    /// a programming error in the caller, not a user input to reject gracefully.
    pub fn for_matrix(matrix: &Matrix3x3) -> Self {
        if !is_rotation_matrix(matrix) {
            AssertionError::precondition("EulerAngles::for_matrix given a non-rotation matrix").terminate();
        }

        let r11 = matrix.get(0, 0);
        let r12 = matrix.get(0, 1);
        let r13 = matrix.get(0, 2);
        let r21 = matrix.get(1, 0);
        let r31 = matrix.get(2, 0);
        let r32 = matrix.get(2, 1);
        let r33 = matrix.get(2, 2);

        let (first, second) = if r31 > -1.0 + EPSILON || r31 < 1.0 - EPSILON {
            let theta1 = -r31.asin();
            let theta2 = std::f64::consts::PI - theta1;
            let c1 = theta1.cos();
            let c2 = theta2.cos();
            let psi1 = (r32 / c1).atan2(r33 / c1);
            let psi2 = (r32 / c2).atan2(r33 / c2);
            let phi1 = (r21 / c1).atan2(r11 / c1);
            let phi2 = (r21 / c2).atan2(r11 / c2);
            ([psi1, theta1, phi1], [psi2, theta2, phi2])
        } else if r31 < 0.0 {
            let psi = r12.atan2(r13);
            ([psi, std::f64::consts::FRAC_PI_2, 0.0], [psi, std::f64::consts::FRAC_PI_2, 0.0])
        } else {
            let psi = (-r12).atan2(-r13);
            ([psi, -std::f64::consts::FRAC_PI_2, 0.0], [psi, -std::f64::consts::FRAC_PI_2, 0.0])
        };

        EulerAngles { first, second }
    }

    /// Reconstructs the extrinsic XYZ rotation matrix for `(x, y, z)` angles, the inverse of
    /// [`EulerAngles::for_matrix`] on either of its two solutions.
    pub fn to_matrix(angles: [f64; 3]) -> Matrix3x3 {
        let (sx, cx) = angles[0].sin_cos();
        let (sy, cy) = angles[1].sin_cos();
        let (sz, cz) = angles[2].sin_cos();

        let rx = Matrix3x3::from_rows(
            crate::vec3::Vec3::new(1.0, 0.0, 0.0),
            crate::vec3::Vec3::new(0.0, cx, -sx),
            crate::vec3::Vec3::new(0.0, sx, cx),
        );
        let ry = Matrix3x3::from_rows(
            crate::vec3::Vec3::new(cy, 0.0, sy),
            crate::vec3::Vec3::new(0.0, 1.0, 0.0),
            crate::vec3::Vec3::new(-sy, 0.0, cy),
        );
        let rz = Matrix3x3::from_rows(
            crate::vec3::Vec3::new(cz, -sz, 0.0),
            crate::vec3::Vec3::new(sz, cz, 0.0),
            crate::vec3::Vec3::new(0.0, 0.0, 1.0),
        );

        rz.mul_mat(&ry).mul_mat(&rx)
    }

    /// Whether `first`'s `y` angle sits at a gimbal lock (`±π/2`), where `first` and `second`
    /// coincide and neither's `x` angle is individually meaningful.
    pub fn has_gimbal_lock(&self) -> bool {
        (self.first[1].abs() - std::f64::consts::FRAC_PI_2).abs() < GIMBAL_EPSILON
    }
}

fn is_rotation_matrix(matrix: &Matrix3x3) -> bool {
    let should_be_zero = matrix.mul_mat(&matrix.transpose()) - Matrix3x3::identity();
    (0..3).all(|row| (0..3).all(|col| should_be_zero.get(row, col).abs() < EPSILON))
}
