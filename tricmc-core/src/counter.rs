/// Move/acceptance bookkeeping for one mover (or the box scaler).
///
/// Mirrors `bioshell-montecarlo`'s `AcceptanceStatistics`, but additionally tracks counts
/// *since the last step-size evaluation* — the adaptive step-size loop needs a rate computed
/// only over attempts made since it last looked, not the whole simulation's history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counter {
    pub moves: u64,
    pub accepted_moves: u64,
    pub moves_since_eval: u64,
    pub accepted_moves_since_eval: u64,
}

impl Counter {
    pub fn new() -> Self {
        Counter::default()
    }

    pub fn record(&mut self, accepted: bool) {
        self.moves += 1;
        self.moves_since_eval += 1;
        if accepted {
            self.accepted_moves += 1;
            self.accepted_moves_since_eval += 1;
        }
    }

    /// Overall acceptance rate across the counter's whole lifetime.
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / self.moves as f64
        }
    }

    /// Acceptance rate since the last `reset_since_eval` call; this is what step-size
    /// adaptation acts on.
    pub fn rate_since_eval(&self) -> f64 {
        if self.moves_since_eval == 0 {
            0.0
        } else {
            self.accepted_moves_since_eval as f64 / self.moves_since_eval as f64
        }
    }

    /// Clears only the since-last-evaluation counters, once an adaptation decision has been
    /// made from them. Lifetime totals (`moves`, `accepted_moves`) are untouched.
    pub fn reset_since_eval(&mut self) {
        self.moves_since_eval = 0;
        self.accepted_moves_since_eval = 0;
    }

    /// Clears every counter, lifetime totals included.
    pub fn reset(&mut self) {
        *self = Counter::default();
    }

    /// Folds another counter's tallies into this one. Used to combine per-thread counters
    /// collected during a domain-decomposed parallel moves phase back into the shared totals
    /// after the join — deterministically, since counters are plain integer sums and do not
    /// depend on the (nondeterministic) order in which threads ran.
    pub fn merge(&mut self, other: &Counter) {
        self.moves += other.moves;
        self.accepted_moves += other.accepted_moves;
        self.moves_since_eval += other.moves_since_eval;
        self.accepted_moves_since_eval += other.accepted_moves_since_eval;
    }
}

