#[cfg(test)]
mod box_test {
    use tricmc_geometry::{assert_eq_float, Box, Matrix3x3, Vec3};

    #[test]
    fn absolute_relative_round_trip() {
        let b = Box::new(Matrix3x3::from_columns(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(2.0, 8.0, 0.0),
            Vec3::new(1.0, 1.0, 6.0),
        ))
        .unwrap();
        let v = Vec3::new(3.3, -4.1, 12.0);
        let rel = b.absolute_to_relative(v);
        let back = b.relative_to_absolute(rel);
        assert!((back - v).length() < 1e-12);
    }

    #[test]
    fn cubic_box_heights_equal_side_length() {
        let b = Box::cubic(5.0).unwrap();
        for h in b.heights() {
            assert_eq_float!(h, 5.0, 1e-12);
        }
        assert_eq_float!(b.volume(), 125.0, 1e-9);
    }

    #[test]
    fn degenerate_matrix_is_rejected() {
        let m = Matrix3x3::from_columns(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(Box::new(m).is_err());
    }

    #[test]
    fn scaling_scales_volume() {
        let mut b = Box::cubic(4.0).unwrap();
        let v0 = b.volume();
        b.scale(2.0, 1.0, 1.0).unwrap();
        assert_eq_float!(b.volume(), v0 * 2.0, 1e-9);
    }
}
