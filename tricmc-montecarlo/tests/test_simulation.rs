#[cfg(test)]
mod simulation_test {
    use rand::RngCore;
    use tricmc_core::{
        ActiveRegion, Counter, DynamicParameter, Environment, Interaction, MoveData, MoveSampler, Shape,
        TriclinicBoxScaler,
    };
    use tricmc_core::Packing;
    use tricmc_geometry::{Box as TriBox, Matrix3x3, Vec3};
    use tricmc_montecarlo::{CancellationFlag, NullObserver, Simulation};

    /// A packing of non-interacting point particles: every trial is legal (energy 0), so this
    /// exercises cycle bookkeeping without needing a real interaction or overlap test.
    struct FreeParticlePacking {
        the_box: TriBox,
        positions: Vec<Vec3>,
        orientations: Vec<Matrix3x3>,
        trial: Option<(usize, Vec3, Matrix3x3)>,
        move_threads: usize,
    }

    impl FreeParticlePacking {
        fn new(n: usize, the_box: TriBox, move_threads: usize) -> Self {
            FreeParticlePacking {
                the_box,
                positions: vec![Vec3::new(0.0, 0.0, 0.0); n],
                orientations: vec![Matrix3x3::identity(); n],
                trial: None,
                move_threads,
            }
        }
    }

    impl Packing for FreeParticlePacking {
        fn size(&self) -> usize {
            self.positions.len()
        }
        fn get_box(&self) -> &TriBox {
            &self.the_box
        }
        fn position(&self, i: usize) -> Vec3 {
            self.positions[i]
        }
        fn orientation(&self, i: usize) -> Matrix3x3 {
            self.orientations[i]
        }
        fn set_orientation(&mut self, i: usize, orientation: Matrix3x3) {
            self.orientations[i] = orientation;
        }
        fn range_radius(&self) -> f64 {
            1.0
        }
        fn total_range_radius(&self) -> f64 {
            1.0
        }
        fn neighbour_grid_cell_divisions(&self) -> [usize; 3] {
            [1, 1, 1]
        }
        fn move_threads(&self) -> usize {
            self.move_threads
        }
        fn try_translation(
            &mut self,
            i: usize,
            delta: Vec3,
            _interaction: &dyn Interaction,
            active_region: Option<&dyn ActiveRegion>,
        ) -> Option<f64> {
            let current = self.positions[i];
            let proposed = current + delta;
            if let Some(region) = active_region {
                if !region.contains(proposed) {
                    return None;
                }
            }
            self.trial = Some((i, current, self.orientations[i]));
            self.positions[i] = proposed;
            Some(0.0)
        }
        fn try_rotation(&mut self, i: usize, rotation: &Matrix3x3, _interaction: &dyn Interaction) -> Option<f64> {
            let current = self.orientations[i];
            self.trial = Some((i, self.positions[i], current));
            self.orientations[i] = *rotation;
            Some(0.0)
        }
        fn try_move(
            &mut self,
            i: usize,
            delta: Vec3,
            rotation: &Matrix3x3,
            _interaction: &dyn Interaction,
            active_region: Option<&dyn ActiveRegion>,
        ) -> Option<f64> {
            let current_position = self.positions[i];
            let proposed = current_position + delta;
            if let Some(region) = active_region {
                if !region.contains(proposed) {
                    return None;
                }
            }
            self.trial = Some((i, current_position, self.orientations[i]));
            self.positions[i] = proposed;
            self.orientations[i] = *rotation;
            Some(0.0)
        }
        fn accept_move(&mut self) {
            self.trial = None;
        }
        fn revert_move(&mut self) {
            if let Some((i, pos, rot)) = self.trial.take() {
                self.positions[i] = pos;
                self.orientations[i] = rot;
            }
        }
        fn try_scaling(&mut self, new_box: TriBox, _interaction: &dyn Interaction) -> Option<f64> {
            self.the_box = new_box;
            Some(0.0)
        }
        fn accept_scaling(&mut self) {}
        fn revert_scaling(&mut self) {}
        fn count_total_overlaps(&self, _interaction: &dyn Interaction, _early_exit: bool) -> usize {
            0
        }
        fn toggle_overlap_counting(&mut self, _enabled: bool, _interaction: &dyn Interaction) {}
        fn cached_number_of_overlaps(&self) -> usize {
            0
        }
        fn setup_for_interaction(&mut self, _interaction: &dyn Interaction) {}
        fn reset_counters(&mut self) {}
        fn reset_ng_race_condition_sanitizer(&mut self) {}
    }

    struct NullInteraction;
    impl Interaction for NullInteraction {
        fn range_radius(&self) -> f64 {
            1.0
        }
        fn total_range_radius(&self) -> f64 {
            1.0
        }
        fn has_soft_part(&self) -> bool {
            false
        }
        fn energy_for_distance(&self, _distance: f64) -> f64 {
            0.0
        }
        fn overlap(&self, _s1: &dyn Shape, _s2: &dyn Shape, _scale: f64, _translation: Vec3) -> bool {
            false
        }
        fn energy(&self, _s1: &dyn Shape, _s2: &dyn Shape, _scale: f64, _translation: Vec3) -> f64 {
            0.0
        }
    }

    struct FixedStepTranslator {
        step: f64,
        requested: usize,
    }

    impl MoveSampler for FixedStepTranslator {
        fn name(&self) -> &str {
            "translation"
        }
        fn num_of_requested_moves(&self, n: usize) -> usize {
            n.min(self.requested)
        }
        fn sample_move(&self, particle_idxs: &[usize], rng: &mut dyn RngCore) -> MoveData {
            let idx = particle_idxs[rng.next_u32() as usize % particle_idxs.len()];
            let delta = Vec3::new((rng.next_u32() as f64 / u32::MAX as f64 - 0.5) * 2.0 * self.step, 0.0, 0.0);
            MoveData::translation(idx, delta)
        }
        fn increase_step_size(&mut self) -> bool {
            self.step *= 2.0;
            true
        }
        fn decrease_step_size(&mut self) -> bool {
            self.step *= 0.5;
            true
        }
        fn step_sizes(&self) -> Vec<(String, f64)> {
            vec![("translation".to_string(), self.step)]
        }
        fn set_step_size(&mut self, _name: &str, value: f64) {
            self.step = value;
        }
    }

    struct NoOpScaler;
    impl TriclinicBoxScaler for NoOpScaler {
        fn propose_box(&self, old_box: &TriBox, _rng: &mut dyn RngCore) -> TriBox {
            *old_box
        }
        fn step_size(&self) -> f64 {
            0.0
        }
        fn increase_step_size(&mut self) -> bool {
            true
        }
        fn decrease_step_size(&mut self) -> bool {
            true
        }
    }

    fn complete_environment(requested_moves: usize) -> Environment {
        let mut env = Environment::new();
        env.temperature = Some(DynamicParameter::constant(1.0));
        env.pressure = Some(DynamicParameter::constant(1.0));
        env.movers = Some(vec![
            Box::new(FixedStepTranslator { step: 0.1, requested: requested_moves }) as Box<dyn MoveSampler>
        ]);
        env.box_scaler = Some(Box::new(NoOpScaler));
        env
    }

    #[test]
    fn two_cycles_from_the_same_seed_reproduce_identical_counters() {
        let make_sim = || {
            let packing = Box::new(FreeParticlePacking::new(8, TriBox::cubic(10.0).unwrap(), 1));
            Simulation::new(
                packing,
                Box::new(NullInteraction),
                complete_environment(8),
                42,
                None,
                0,
                CancellationFlag::new(),
            )
            .unwrap()
        };

        let mut sim_a = make_sim();
        let mut sim_b = make_sim();
        for _ in 0..5 {
            sim_a.run_cycle(100.0).unwrap();
            sim_b.run_cycle(100.0).unwrap();
        }

        assert_eq!(sim_a.current_cycle(), sim_b.current_cycle());
        assert_eq!(sim_a.packing().position(0), sim_b.packing().position(0));
    }

    #[test]
    fn integrate_reaches_the_requested_total_cycle_count() {
        let packing = Box::new(FreeParticlePacking::new(4, TriBox::cubic(10.0).unwrap(), 1));
        let mut sim =
            Simulation::new(packing, Box::new(NullInteraction), complete_environment(4), 7, None, 0, CancellationFlag::new())
                .unwrap();

        let mut observer = NullObserver;
        let reached = sim.integrate(10, 20, 5, 5, &mut observer).unwrap();
        assert_eq!(reached, 30);
        assert_eq!(sim.current_cycle(), 30);
    }

    #[test]
    fn relax_terminates_immediately_when_there_are_no_overlaps() {
        let packing = Box::new(FreeParticlePacking::new(4, TriBox::cubic(10.0).unwrap(), 1));
        let mut sim =
            Simulation::new(packing, Box::new(NullInteraction), complete_environment(4), 3, None, 0, CancellationFlag::new())
                .unwrap();

        // cached_number_of_overlaps() is always 0 for FreeParticlePacking, so relax must not
        // spin forever.
        let cycles = sim.relax().unwrap();
        assert_eq!(cycles, 0);
    }

    #[test]
    fn cancellation_stops_integration_early() {
        let packing = Box::new(FreeParticlePacking::new(4, TriBox::cubic(10.0).unwrap(), 1));
        let cancellation = CancellationFlag::new();
        cancellation.raise();
        let mut sim = Simulation::new(
            packing,
            Box::new(NullInteraction),
            complete_environment(4),
            11,
            None,
            0,
            cancellation,
        )
        .unwrap();

        let mut observer = NullObserver;
        let reached = sim.integrate(10, 20, 5, 5, &mut observer).unwrap();
        assert_eq!(reached, 0);
    }

    #[test]
    fn too_many_domains_is_rejected_at_construction() {
        let packing = Box::new(FreeParticlePacking::new(4, TriBox::cubic(10.0).unwrap(), 1));
        let result = Simulation::new(
            packing,
            Box::new(NullInteraction),
            complete_environment(4),
            1,
            Some([2, 2, 1]),
            0,
            CancellationFlag::new(),
        );
        assert!(result.is_err());
    }
}
