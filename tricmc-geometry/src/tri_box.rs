use crate::matrix3x3::Matrix3x3;
use crate::vec3::Vec3;
use tricmc_error::ValidationError;

/// A triclinic parallelepiped periodic simulation box.
///
/// The box is defined by a matrix `M` whose columns are the three (generally non-orthogonal)
/// side vectors. Absolute coordinates convert to relative (fractional) coordinates via
/// `M^-1`; the box interior is the unit cube `[0, 1)^3` in relative coordinates. `M` and its
/// cached inverse are kept in lock-step by every mutator, so a `Box` can never be observed
/// with a stale inverse.
#[derive(Clone, Copy, Debug)]
pub struct Box {
    matrix: Matrix3x3,
    inverse: Matrix3x3,
}

impl Box {
    /// Builds a box from its side-vector matrix. Fails if the sides are degenerate
    /// (`det(M) == 0`), since such a box would have zero volume and no well-defined inverse.
    pub fn new(matrix: Matrix3x3) -> Result<Box, ValidationError> {
        let inverse = matrix.inverse()?;
        Ok(Box { matrix, inverse })
    }

    /// An orthogonal box with the given edge lengths.
    pub fn orthorhombic(lx: f64, ly: f64, lz: f64) -> Result<Box, ValidationError> {
        if lx <= 0.0 {
            return Err(ValidationError::not_positive("lx", lx));
        }
        if ly <= 0.0 {
            return Err(ValidationError::not_positive("ly", ly));
        }
        if lz <= 0.0 {
            return Err(ValidationError::not_positive("lz", lz));
        }
        Box::new(Matrix3x3::diagonal(lx, ly, lz))
    }

    /// A cube of the given edge length.
    pub fn cubic(l: f64) -> Result<Box, ValidationError> {
        Box::orthorhombic(l, l, l)
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix3x3 {
        &self.matrix
    }

    #[inline]
    pub fn inverse_matrix(&self) -> &Matrix3x3 {
        &self.inverse
    }

    /// `rel = M^-1 . abs`
    #[inline]
    pub fn absolute_to_relative(&self, absolute: Vec3) -> Vec3 {
        self.inverse.mul_vec(&absolute)
    }

    /// `abs = M . rel`
    #[inline]
    pub fn relative_to_absolute(&self, relative: Vec3) -> Vec3 {
        self.matrix.mul_vec(&relative)
    }

    /// Applies a linear transformation `M <- A . M` and recomputes the inverse.
    ///
    /// Fails if the result would be singular (`det(A . M) == 0`).
    pub fn transform(&mut self, a: &Matrix3x3) -> Result<(), ValidationError> {
        let new_matrix = a.mul_mat(&self.matrix);
        let new_inverse = new_matrix.inverse()?;
        self.matrix = new_matrix;
        self.inverse = new_inverse;
        Ok(())
    }

    /// Returns a copy of this box after applying `transform`, leaving `self` untouched.
    ///
    /// This is the shape used by box-scaling Monte Carlo moves: a trial box is built,
    /// tried against the packing, and only committed into the live box on acceptance.
    pub fn transformed(&self, a: &Matrix3x3) -> Result<Box, ValidationError> {
        let mut out = *self;
        out.transform(a)?;
        Ok(out)
    }

    /// Anisotropic scaling along the three box axes; a diagonal special case of `transform`.
    pub fn scale(&mut self, fx: f64, fy: f64, fz: f64) -> Result<(), ValidationError> {
        self.transform(&Matrix3x3::diagonal(fx, fy, fz))
    }

    pub fn scaled(&self, fx: f64, fy: f64, fz: f64) -> Result<Box, ValidationError> {
        self.transformed(&Matrix3x3::diagonal(fx, fy, fz))
    }

    /// The three side vectors of this box, i.e. the columns of `M`.
    pub fn sides(&self) -> [Vec3; 3] {
        [self.matrix.column(0), self.matrix.column(1), self.matrix.column(2)]
    }

    /// The perpendicular distance between each pair of opposite faces,
    /// `height[i] = |det(M)| / |s_j x s_k|` for the cyclic pair `(j, k) != i`.
    pub fn heights(&self) -> [f64; 3] {
        let s = self.sides();
        let v = self.volume();
        [
            v / s[1].cross(&s[2]).length(),
            v / s[2].cross(&s[0]).length(),
            v / s[0].cross(&s[1]).length(),
        ]
    }

    pub fn volume(&self) -> f64 {
        self.matrix.det().abs()
    }
}

