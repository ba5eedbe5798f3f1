#[cfg(test)]
mod decomposition_test {
    use tricmc_core::{ActiveRegion, Interaction, Packing};
    use tricmc_domain::DomainDecomposition;
    use tricmc_geometry::{Box as TriBox, Matrix3x3, Vec3};

    /// A `Packing` stub exposing a fixed particle-position list and nothing else; every
    /// mutating/overlap method is unreachable from these tests.
    struct StubPacking {
        the_box: TriBox,
        positions: Vec<Vec3>,
        range: f64,
        total_range: f64,
        ng_divisions: [usize; 3],
    }

    impl Packing for StubPacking {
        fn size(&self) -> usize {
            self.positions.len()
        }
        fn get_box(&self) -> &TriBox {
            &self.the_box
        }
        fn position(&self, i: usize) -> Vec3 {
            self.positions[i]
        }
        fn orientation(&self, _i: usize) -> Matrix3x3 {
            unreachable!()
        }
        fn set_orientation(&mut self, _i: usize, _orientation: Matrix3x3) {
            unreachable!()
        }
        fn range_radius(&self) -> f64 {
            self.range
        }
        fn total_range_radius(&self) -> f64 {
            self.total_range
        }
        fn neighbour_grid_cell_divisions(&self) -> [usize; 3] {
            self.ng_divisions
        }
        fn move_threads(&self) -> usize {
            1
        }
        fn try_translation(
            &mut self,
            _i: usize,
            _delta: Vec3,
            _interaction: &dyn Interaction,
            _active_region: Option<&dyn ActiveRegion>,
        ) -> Option<f64> {
            unreachable!()
        }
        fn try_rotation(&mut self, _i: usize, _rotation: &Matrix3x3, _interaction: &dyn Interaction) -> Option<f64> {
            unreachable!()
        }
        fn try_move(
            &mut self,
            _i: usize,
            _delta: Vec3,
            _rotation: &Matrix3x3,
            _interaction: &dyn Interaction,
            _active_region: Option<&dyn ActiveRegion>,
        ) -> Option<f64> {
            unreachable!()
        }
        fn accept_move(&mut self) {
            unreachable!()
        }
        fn revert_move(&mut self) {
            unreachable!()
        }
        fn try_scaling(&mut self, _new_box: TriBox, _interaction: &dyn Interaction) -> Option<f64> {
            unreachable!()
        }
        fn accept_scaling(&mut self) {
            unreachable!()
        }
        fn revert_scaling(&mut self) {
            unreachable!()
        }
        fn count_total_overlaps(&self, _interaction: &dyn Interaction, _early_exit: bool) -> usize {
            unreachable!()
        }
        fn toggle_overlap_counting(&mut self, _enabled: bool, _interaction: &dyn Interaction) {
            unreachable!()
        }
        fn cached_number_of_overlaps(&self) -> usize {
            unreachable!()
        }
        fn setup_for_interaction(&mut self, _interaction: &dyn Interaction) {
            unreachable!()
        }
        fn reset_counters(&mut self) {
            unreachable!()
        }
        fn reset_ng_race_condition_sanitizer(&mut self) {
            unreachable!()
        }
    }

    fn worked_example_packing(positions: Vec<Vec3>) -> StubPacking {
        StubPacking {
            the_box: TriBox::orthorhombic(12.0, 21.0, 6.0).unwrap(),
            positions,
            range: 2.0,
            total_range: 6.0,
            ng_divisions: [4, 7, 2],
        }
    }

    #[test]
    fn single_division_axis_is_unbounded() {
        let packing = worked_example_packing(vec![Vec3::new(6.0, 10.0, 3.0)]);
        let decomposition = DomainDecomposition::new(&packing, [1, 2, 1], Vec3::new(6.0, 17.0, 3.0)).unwrap();

        let domain = decomposition.active_domain_bounds([0, 0, 0]);
        assert_eq!(domain.bounds_for_axis(0), tricmc_domain::RegionBounds::unbounded());
        assert_eq!(domain.bounds_for_axis(2), tricmc_domain::RegionBounds::unbounded());
    }

    #[test]
    fn y_subdomains_partition_into_two_disjoint_bands() {
        let packing = worked_example_packing(vec![Vec3::new(6.0, 10.0, 3.0)]);
        let decomposition = DomainDecomposition::new(&packing, [1, 2, 1], Vec3::new(6.0, 17.0, 3.0)).unwrap();

        let first = decomposition.active_domain_bounds([0, 0, 0]).bounds_for_axis(1);
        let second = decomposition.active_domain_bounds([0, 1, 0]).bounds_for_axis(1);

        // The two subdomains' active bands never overlap: every point accepted by one axis-y
        // bound must be rejected by the other.
        let sample_count = 2100;
        for k in 0..sample_count {
            let y = k as f64 / sample_count as f64;
            let inside_first = if first.beg < first.end { y > first.beg && y < first.end } else { y > first.beg || y < first.end };
            let inside_second = if second.beg < second.end { y > second.beg && y < second.end } else { y > second.beg || y < second.end };
            assert!(!(inside_first && inside_second), "y={y} inside both subdomains");
        }
    }

    #[test]
    fn particles_in_ghost_layer_are_excluded_from_every_subdomain() {
        // One particle placed well inside the (0,0,0) band, one placed near the y=17/21
        // boundary where the ghost layer straddling the origin lives.
        let positions = vec![Vec3::new(6.0, 3.0, 3.0), Vec3::new(6.0, 17.0, 3.0)];
        let packing = worked_example_packing(positions);
        let decomposition = DomainDecomposition::new(&packing, [1, 2, 1], Vec3::new(6.0, 17.0, 3.0)).unwrap();

        let mut total_assigned = 0;
        for j in 0..2 {
            total_assigned += decomposition.particles_in_region([0, j, 0]).len();
        }
        // Particle 1 sits exactly at the drawn origin, inside a ghost layer by construction;
        // it must not appear in either subdomain's active list.
        assert!(total_assigned <= 1);
    }

    #[test]
    fn too_narrow_domain_is_rejected() {
        let packing = worked_example_packing(vec![Vec3::new(6.0, 10.0, 3.0)]);
        // Asking for 10 subdomains along y leaves no room for an active region once the ghost
        // layers (sized from range/totalRange/ngCellSize) are subtracted.
        let result = DomainDecomposition::new(&packing, [1, 10, 1], Vec3::new(6.0, 17.0, 3.0));
        assert!(result.is_err());
    }
}
