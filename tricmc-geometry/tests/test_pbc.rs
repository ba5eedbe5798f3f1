#[cfg(test)]
mod pbc_test {
    use tricmc_geometry::{Box, Matrix3x3, PeriodicBoundaryConditions, Vec3};

    fn triclinic_box() -> Box {
        Box::new(Matrix3x3::from_columns(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(3.0, 9.0, 0.0),
            Vec3::new(1.0, -2.0, 8.0),
        ))
        .unwrap()
    }

    #[test]
    fn correction_brings_point_inside() {
        let pbc = PeriodicBoundaryConditions::new(triclinic_box());
        let p = Vec3::new(25.0, 40.0, -30.0);
        let corrected = pbc.corrected_position(p);
        let rel = pbc.get_box().absolute_to_relative(corrected);
        for axis in 0..3 {
            assert!(rel[axis] >= 0.0 && rel[axis] < 1.0, "component {axis} = {}", rel[axis]);
        }
    }

    #[test]
    fn correction_is_idempotent_for_interior_points() {
        let pbc = PeriodicBoundaryConditions::new(triclinic_box());
        let p = Vec3::new(4.0, 3.0, 1.0);
        let corrected = pbc.corrected_position(p);
        assert!((corrected - p).length() < 1e-12);
    }

    #[test]
    fn translation_length_matches_distance2() {
        let pbc = PeriodicBoundaryConditions::new(triclinic_box());
        let p1 = Vec3::new(1.0, 1.0, 1.0);
        let p2 = Vec3::new(9.0, 8.0, 7.5);
        let t = pbc.get_translation(p1, p2);
        let d2 = pbc.get_distance2(p1, p2);
        assert!((t.length_squared() - d2).abs() < 1e-12);
    }

    #[test]
    fn translation_finds_closer_periodic_image() {
        // Cubic box of side 10: a particle at x=9.9 and one at x=0.1 are 0.2 apart
        // through the periodic boundary, not 9.8 apart directly.
        let pbc = PeriodicBoundaryConditions::new(Box::cubic(10.0).unwrap());
        let p1 = Vec3::new(9.9, 5.0, 5.0);
        let p2 = Vec3::new(0.1, 5.0, 5.0);
        let t = pbc.get_translation(p1, p2);
        assert!((t.x - 0.2).abs() < 1e-12, "t.x = {}", t.x);
    }

    #[test]
    fn drifted_point_just_inside_is_left_alone() {
        let pbc = PeriodicBoundaryConditions::new(Box::cubic(10.0).unwrap());
        let eps = 1e-13;
        let p = Vec3::new(10.0 - eps, 5.0, 5.0);
        let corrected = pbc.corrected_position(p);
        assert!((corrected - p).length() < 1e-12);
    }
}
