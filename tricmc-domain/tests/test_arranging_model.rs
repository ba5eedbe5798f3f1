#[cfg(test)]
mod arranging_model_test {
    use tricmc_domain::OrthorhombicArrangingModel;
    use tricmc_geometry::Box as TriBox;

    #[test]
    fn produces_exactly_n_positions() {
        let the_box = TriBox::orthorhombic(20.0, 10.0, 10.0).unwrap();
        for n in [1, 2, 7, 8, 27, 100] {
            let positions = OrthorhombicArrangingModel::arrange(n, &the_box);
            assert_eq!(positions.len(), n);
        }
    }

    #[test]
    fn all_positions_lie_strictly_inside_the_box() {
        let the_box = TriBox::orthorhombic(12.0, 21.0, 6.0).unwrap();
        for position in OrthorhombicArrangingModel::arrange(50, &the_box) {
            let relative = the_box.absolute_to_relative(position);
            for c in 0..3 {
                assert!(relative[c] > 0.0 && relative[c] < 1.0);
            }
        }
    }

    #[test]
    fn positions_are_pairwise_distinct() {
        let the_box = TriBox::cubic(10.0).unwrap();
        let positions = OrthorhombicArrangingModel::arrange(64, &the_box);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert!((positions[i] - positions[j]).length() > 1e-9);
            }
        }
    }

    #[test]
    fn a_single_particle_is_placed_near_the_box_centre() {
        let the_box = TriBox::cubic(10.0).unwrap();
        let positions = OrthorhombicArrangingModel::arrange(1, &the_box);
        assert_eq!(positions.len(), 1);
        let relative = the_box.absolute_to_relative(positions[0]);
        for c in 0..3 {
            assert!((relative[c] - 0.5).abs() < 1e-9);
        }
    }
}
