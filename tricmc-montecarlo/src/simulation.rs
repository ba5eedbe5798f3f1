use crate::cancellation::CancellationFlag;
use crate::error::SimulationError;
use crate::observer::{NullObserver, SimulationObserver};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tricmc_core::{ActiveRegion, Counter, Environment, Interaction, MoveData, MoveType, Packing, orthogonality_deviation};
use tricmc_domain::DomainDecomposition;
use tricmc_geometry::{Matrix3x3, Vec3};

/// A raw pointer to a trait object, smuggled across a rayon fan-out.
///
/// Each domain-decomposed worker closure dereferences this to get its own `&mut dyn Packing`.
/// Soundness rests entirely on [`DomainDecomposition`]'s ghost-layer guarantee: every worker is
/// handed a disjoint `ActiveDomain` and a disjoint particle-index list, and `Packing::try_*`
/// reject any trial that would touch a particle or neighbour-grid cell outside that region. No
/// two workers ever read or write the same memory through this pointer at the same time.
#[derive(Clone, Copy)]
struct PackingPtr(*mut dyn Packing);

unsafe impl Send for PackingPtr {}
unsafe impl Sync for PackingPtr {}

const OVERLAP_DEVIATION_THRESHOLD: f64 = 1e-28;
const FIX_CONVERGED_THRESHOLD: f64 = 1e-30;
const MAX_FIX_ITERATIONS: usize = 3;
const ADAPT_EVAL_FACTOR: u64 = 100;
const ACCEPT_RATE_HIGH: f64 = 0.2;
const ACCEPT_RATE_LOW: f64 = 0.1;

/// Performs Metropolis Monte Carlo cycles over a [`Packing`], optionally parallelised over
/// spatial subdomains.
///
/// Owns the packing, the interaction, the environment (temperature/pressure schedules, move
/// samplers and box scaler) and everything needed to reproduce a run deterministically from a
/// seed: one PRNG for the driver thread (used for single-domain moves, box scaling and drawing
/// each cycle's decomposition origin) and, when running in multi-domain mode, one more PRNG per
/// subdomain.
pub struct Simulation {
    packing: Box<dyn Packing>,
    interaction: Box<dyn Interaction>,
    environment: Environment,
    domain_divisions: Option<[usize; 3]>,
    driver_rng: SmallRng,
    domain_rngs: Vec<SmallRng>,
    mover_counters: Vec<Counter>,
    scaling_counter: Counter,
    mover_refusal_logged: Vec<bool>,
    scaler_refusal_logged: bool,
    current_cycle: u64,
    cycle_offset: u64,
    should_adjust_step_size: bool,
    are_overlaps_counted: bool,
    rotation_matrix_fix_every: u64,
    cancellation: CancellationFlag,
    current_temperature: f64,
    current_pressure: f64,
}

impl Simulation {
    pub fn new(
        packing: Box<dyn Packing>,
        interaction: Box<dyn Interaction>,
        environment: Environment,
        seed: u64,
        domain_divisions: Option<[usize; 3]>,
        rotation_matrix_fix_every: u64,
        cancellation: CancellationFlag,
    ) -> Result<Self, SimulationError> {
        if !environment.is_complete() {
            return Err(SimulationError::IncompleteEnvironment);
        }

        let num_domains = domain_divisions.map(|d| d[0] * d[1] * d[2]).unwrap_or(1);
        let move_threads = packing.move_threads();
        if num_domains > move_threads {
            return Err(SimulationError::TooManyDomains { num_domains, move_threads });
        }

        let num_movers = environment.movers.as_ref().map(|m| m.len()).unwrap_or(0);
        let domain_rngs = match domain_divisions {
            Some(_) => (0..num_domains).map(|k| SmallRng::seed_from_u64(seed + 1 + k as u64)).collect(),
            None => Vec::new(),
        };

        Ok(Simulation {
            packing,
            interaction,
            environment,
            domain_divisions,
            driver_rng: SmallRng::seed_from_u64(seed),
            domain_rngs,
            mover_counters: vec![Counter::new(); num_movers],
            scaling_counter: Counter::new(),
            mover_refusal_logged: vec![false; num_movers],
            scaler_refusal_logged: false,
            current_cycle: 0,
            cycle_offset: 0,
            should_adjust_step_size: true,
            are_overlaps_counted: false,
            rotation_matrix_fix_every,
            cancellation,
            current_temperature: 0.0,
            current_pressure: 0.0,
        })
    }

    pub fn packing(&self) -> &dyn Packing {
        self.packing.as_ref()
    }

    pub fn current_cycle(&self) -> u64 {
        self.current_cycle
    }

    pub fn set_should_adjust_step_size(&mut self, enabled: bool) {
        self.should_adjust_step_size = enabled;
    }

    pub fn toggle_overlap_counting(&mut self, enabled: bool) {
        self.are_overlaps_counted = enabled;
        self.packing.toggle_overlap_counting(enabled, self.interaction.as_ref());
    }

    /// Performs one full cycle: moves, then a box-scaling attempt, then (if enabled) step-size
    /// adaptation and rotation-matrix renormalisation.
    pub fn run_cycle(&mut self, total_cycles: f64) -> Result<(), SimulationError> {
        self.update_environment_cache(total_cycles);

        match self.domain_divisions {
            Some(divs) => self.moves_multi_domain(divs)?,
            None => self.moves_single_domain(),
        }

        self.try_box_scaling();

        if self.should_adjust_step_size {
            self.adapt_step_sizes();
        }

        if self.rotation_matrix_fix_every > 0 && self.current_cycle % self.rotation_matrix_fix_every == 0 {
            self.fix_rotation_matrices();
        }

        self.current_cycle += 1;
        Ok(())
    }

    fn update_environment_cache(&mut self, total_cycles: f64) {
        let temperature = self.environment.temperature.as_ref().expect("checked at construction");
        let pressure = self.environment.pressure.as_ref().expect("checked at construction");
        self.current_temperature = temperature.value(self.current_cycle as f64, total_cycles);
        self.current_pressure = pressure.value(self.current_cycle as f64, total_cycles);
    }

    fn moves_single_domain(&mut self) {
        let n = self.packing.size();
        let all_particles: Vec<usize> = (0..n).collect();
        let movers = self.environment.movers.as_ref().expect("checked at construction");
        let requested: Vec<usize> = movers.iter().map(|m| m.num_of_requested_moves(n)).collect();
        let total: usize = requested.iter().sum();
        if total == 0 {
            return;
        }

        for _ in 0..total {
            let sampler_idx = pick_weighted(&requested, &mut self.driver_rng);
            let movers = self.environment.movers.as_ref().expect("checked at construction");
            let move_data = movers[sampler_idx].sample_move(&all_particles, &mut self.driver_rng);
            let accepted = dispatch_and_accept(
                self.packing.as_mut(),
                self.interaction.as_ref(),
                move_data,
                None,
                self.current_temperature,
                &mut self.driver_rng,
            );
            self.mover_counters[sampler_idx].record(accepted);
        }
    }

    fn moves_multi_domain(&mut self, divs: [usize; 3]) -> Result<(), SimulationError> {
        let origin = self.draw_origin();
        self.packing.reset_ng_race_condition_sanitizer();

        let decomposition = DomainDecomposition::new(self.packing.as_ref(), divs, origin)?;

        let n = self.packing.size();
        let num_domains = divs[0] * divs[1] * divs[2];
        let movers = self.environment.movers.as_ref().expect("checked at construction");
        let requested: Vec<usize> = movers.iter().map(|m| m.num_of_requested_moves(n)).collect();
        let total: usize = requested.iter().sum();
        if total == 0 || num_domains == 0 {
            return Ok(());
        }
        let moves_per_domain = total / num_domains;
        let num_movers = requested.len();

        let coords: Vec<[usize; 3]> = (0..divs[0])
            .flat_map(|i| (0..divs[1]).flat_map(move |j| (0..divs[2]).map(move |k| [i, j, k])))
            .collect();

        let packing_ptr = PackingPtr(self.packing.as_mut() as *mut dyn Packing);
        let interaction_ref = self.interaction.as_ref();
        let temperature = self.current_temperature;

        let per_domain_counters: Vec<Vec<Counter>> = coords
            .par_iter()
            .zip(self.domain_rngs.par_iter_mut())
            .map(|(&coord, rng)| {
                // SAFETY: see `PackingPtr`'s doc comment — this closure only ever touches the
                // particles listed for `coord` and rejects trials leaving `active_domain`.
                let packing: &mut dyn Packing = unsafe { &mut *packing_ptr.0 };
                let active_domain = decomposition.active_domain_bounds(coord);
                let particle_idxs = decomposition.particles_in_region(coord);

                let mut local_counters = vec![Counter::new(); num_movers];
                if particle_idxs.is_empty() {
                    return local_counters;
                }
                for _ in 0..moves_per_domain {
                    let sampler_idx = pick_weighted(&requested, rng);
                    let move_data = movers[sampler_idx].sample_move(particle_idxs, rng);
                    let accepted = dispatch_and_accept(
                        packing,
                        interaction_ref,
                        move_data,
                        Some(&active_domain),
                        temperature,
                        rng,
                    );
                    local_counters[sampler_idx].record(accepted);
                }
                local_counters
            })
            .collect();

        for domain_counters in &per_domain_counters {
            for (sampler_idx, counter) in domain_counters.iter().enumerate() {
                self.mover_counters[sampler_idx].merge(counter);
            }
        }

        self.packing.reset_ng_race_condition_sanitizer();
        Ok(())
    }

    fn draw_origin(&mut self) -> Vec3 {
        let relative = Vec3::new(self.driver_rng.gen(), self.driver_rng.gen(), self.driver_rng.gen());
        self.packing.get_box().relative_to_absolute(relative)
    }

    fn try_box_scaling(&mut self) {
        let old_box = *self.packing.get_box();
        let new_box = {
            let scaler = self.environment.box_scaler.as_ref().expect("checked at construction");
            scaler.propose_box(&old_box, &mut self.driver_rng)
        };

        let n = self.packing.size() as f64;
        let f = new_box.volume() / old_box.volume();
        let delta_v = new_box.volume() - old_box.volume();
        let exponent_without_de = n * f.ln() - self.current_pressure * delta_v / self.current_temperature;

        let accepted = if self.interaction.has_soft_part() || self.are_overlaps_counted {
            match self.packing.try_scaling(new_box, self.interaction.as_ref()) {
                Some(delta_e) => {
                    let exponent = exponent_without_de - delta_e / self.current_temperature;
                    let accept = exponent >= 0.0 || self.driver_rng.gen::<f64>() < exponent.exp();
                    if accept {
                        self.packing.accept_scaling();
                    } else {
                        self.packing.revert_scaling();
                    }
                    accept
                }
                None => false,
            }
        } else {
            // Best case for acceptance is ΔE = 0 (any real overlap would give ΔE = +∞). Draw
            // the Metropolis random first and only pay for the overlap scan if it could matter.
            let best_case_accept = exponent_without_de >= 0.0 || self.driver_rng.gen::<f64>() < exponent_without_de.exp();
            if best_case_accept {
                match self.packing.try_scaling(new_box, self.interaction.as_ref()) {
                    Some(_) => {
                        self.packing.accept_scaling();
                        true
                    }
                    None => false,
                }
            } else {
                false
            }
        };

        self.scaling_counter.record(accepted);
    }

    fn adapt_step_sizes(&mut self) {
        let num_movers = self.mover_counters.len();
        for idx in 0..num_movers {
            let requested = {
                let movers = self.environment.movers.as_ref().expect("checked at construction");
                movers[idx].num_of_requested_moves(self.packing.size())
            };
            let threshold = ADAPT_EVAL_FACTOR * requested.max(1) as u64;
            if self.mover_counters[idx].moves_since_eval < threshold {
                continue;
            }
            let rate = self.mover_counters[idx].rate_since_eval();
            let movers = self.environment.movers.as_mut().expect("checked at construction");
            let mover = &mut movers[idx];
            let changed = if rate > ACCEPT_RATE_HIGH {
                mover.increase_step_size()
            } else if rate < ACCEPT_RATE_LOW {
                mover.decrease_step_size()
            } else {
                true
            };
            if !changed {
                if !self.mover_refusal_logged[idx] {
                    log::warn!("mover {} refused a step-size adjustment at rate {rate:.3}", mover.name());
                    self.mover_refusal_logged[idx] = true;
                }
            } else {
                self.mover_refusal_logged[idx] = false;
            }
            self.mover_counters[idx].reset_since_eval();
        }

        let scaling_threshold = ADAPT_EVAL_FACTOR;
        if self.scaling_counter.moves_since_eval >= scaling_threshold {
            let rate = self.scaling_counter.rate_since_eval();
            let scaler = self.environment.box_scaler.as_mut().expect("checked at construction");
            let changed = if rate > ACCEPT_RATE_HIGH {
                scaler.increase_step_size()
            } else if rate < ACCEPT_RATE_LOW {
                scaler.decrease_step_size()
            } else {
                true
            };
            if !changed {
                if !self.scaler_refusal_logged {
                    log::warn!("box scaler refused a step-size adjustment at rate {rate:.3}");
                    self.scaler_refusal_logged = true;
                }
            } else {
                self.scaler_refusal_logged = false;
            }
            self.scaling_counter.reset_since_eval();
        }
    }

    fn fix_rotation_matrices(&mut self) {
        for i in 0..self.packing.size() {
            let mut r = self.packing.orientation(i);
            let mut deviation = orthogonality_deviation(&r);
            if deviation <= OVERLAP_DEVIATION_THRESHOLD {
                continue;
            }
            for _ in 0..MAX_FIX_ITERATIONS {
                let rt = r.transpose();
                r = r * 1.5 - r.mul_mat(&rt).mul_mat(&r) * 0.5;
                deviation = orthogonality_deviation(&r);
                if deviation < FIX_CONVERGED_THRESHOLD {
                    break;
                }
            }
            self.packing.set_orientation(i, r);
        }

        if !self.are_overlaps_counted && self.packing.count_total_overlaps(self.interaction.as_ref(), true) > 0 {
            log::error!("rotation-matrix renormalisation introduced an overlap; cancelling run");
            self.cancellation.raise();
        }
    }

    /// Loops cycles until the packing's cached overlap count reaches zero or cancellation is
    /// raised. `T`/`p` are evaluated with `total_cycles = ∞`, matching a schedule with no fixed
    /// horizon.
    pub fn relax(&mut self) -> Result<u64, SimulationError> {
        self.toggle_overlap_counting(true);
        self.should_adjust_step_size = true;
        while self.packing.cached_number_of_overlaps() > 0 {
            if self.cancellation.check() {
                break;
            }
            self.run_cycle(f64::INFINITY)?;
        }
        Ok(self.current_cycle)
    }

    /// Thermalisation (`n_thermalisation` cycles, adaptation on) followed by averaging
    /// (`n_averaging` cycles, adaptation off), honouring `snapshot_every`/`averaging_every`
    /// through `observer` and stopping early on cancellation.
    pub fn integrate(
        &mut self,
        n_thermalisation: u64,
        n_averaging: u64,
        averaging_every: u64,
        inline_info_every: u64,
        observer: &mut dyn SimulationObserver,
    ) -> Result<u64, SimulationError> {
        if !self.are_overlaps_counted && self.packing.count_total_overlaps(self.interaction.as_ref(), true) > 0 {
            return Err(SimulationError::PreexistingOverlaps);
        }

        let total_cycles = (self.cycle_offset + n_thermalisation + n_averaging) as f64;

        self.should_adjust_step_size = true;
        for _ in 0..n_thermalisation {
            if self.cancellation.check() {
                return Ok(self.current_cycle);
            }
            self.run_cycle(total_cycles)?;
            if inline_info_every > 0 && self.current_cycle % inline_info_every == 0 {
                observer.on_inline_info(self.current_cycle, self.current_temperature, self.current_pressure);
            }
        }

        self.should_adjust_step_size = false;
        for cyc in 0..n_averaging {
            if self.cancellation.check() {
                return Ok(self.current_cycle);
            }
            self.run_cycle(total_cycles)?;
            if averaging_every > 0 && cyc % averaging_every == 0 {
                observer.on_snapshot(self.current_cycle);
            }
            if inline_info_every > 0 && self.current_cycle % inline_info_every == 0 {
                observer.on_inline_info(self.current_cycle, self.current_temperature, self.current_pressure);
            }
        }

        Ok(self.current_cycle)
    }
}

/// Picks an index into `weights` with probability proportional to its value; `weights` must
/// sum to at least 1.
fn pick_weighted(weights: &[usize], rng: &mut impl Rng) -> usize {
    let total: usize = weights.iter().sum();
    let mut draw = rng.gen_range(0..total);
    for (idx, &w) in weights.iter().enumerate() {
        if draw < w {
            return idx;
        }
        draw -= w;
    }
    weights.len() - 1
}

fn dispatch_and_accept(
    packing: &mut dyn Packing,
    interaction: &dyn Interaction,
    move_data: MoveData,
    active_region: Option<&dyn ActiveRegion>,
    temperature: f64,
    rng: &mut impl Rng,
) -> bool {
    let delta_e = match move_data.move_type {
        MoveType::Translation => {
            packing.try_translation(move_data.particle_idx, move_data.translation, interaction, active_region)
        }
        MoveType::Rotation | MoveType::Flip => {
            packing.try_rotation(move_data.particle_idx, &move_data.rotation, interaction)
        }
        MoveType::Rototranslation => packing.try_move(
            move_data.particle_idx,
            move_data.translation,
            &move_data.rotation,
            interaction,
            active_region,
        ),
    };

    let Some(delta_e) = delta_e else {
        return false;
    };

    let accept = delta_e <= 0.0 || rng.gen::<f64>() < (-delta_e / temperature).exp();
    if accept {
        packing.accept_move();
    } else {
        packing.revert_move();
    }
    accept
}
