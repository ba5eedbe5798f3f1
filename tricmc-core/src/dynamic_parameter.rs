use tricmc_error::ValidationError;

/// A cycle-indexed scalar schedule: temperature and pressure are each one of these, so that a
/// simulation can ramp, decay or hold them steady as it runs.
///
/// `total_cycles` is carried as `f64` (not `u64`) specifically so that overlap relaxation,
/// which has no fixed cycle budget, can pass `f64::INFINITY` for it without a special-cased
/// "unbounded" variant threading through every parameter kind.
#[derive(Clone, Debug)]
pub enum DynamicParameter {
    Constant(f64),
    Linear { intercept: f64, slope: f64 },
    Exponential { a0: f64, rate: f64 },
    /// Wraps another parameter, adding `cycle_shift` to both the current and total cycle
    /// before evaluating it — e.g. to make a thermalisation-phase schedule read as if it
    /// started counting from a prior run's cycle offset.
    Shifted { inner: Box<DynamicParameter>, cycle_shift: f64 },
    /// An ordered list of `(start_cycle, parameter)` pairs. `start_cycle`s must strictly
    /// ascend and the first must be `0.0`; each piece sees only its own subrange, with the
    /// *next* piece's start (or the whole schedule's `total_cycles`, for the last piece)
    /// standing in as that piece's own `total_cycles`.
    Piecewise(Vec<(f64, DynamicParameter)>),
}

impl DynamicParameter {
    pub fn constant(value: f64) -> Self {
        DynamicParameter::Constant(value)
    }

    pub fn linear(intercept: f64, slope: f64) -> Self {
        DynamicParameter::Linear { intercept, slope }
    }

    pub fn exponential(a0: f64, rate: f64) -> Self {
        DynamicParameter::Exponential { a0, rate }
    }

    pub fn shifted(inner: DynamicParameter, cycle_shift: f64) -> Self {
        DynamicParameter::Shifted { inner: Box::new(inner), cycle_shift }
    }

    /// Builds a piecewise schedule, validating that `start_cycle`s strictly ascend and that
    /// the first one is zero.
    pub fn piecewise(pieces: Vec<(f64, DynamicParameter)>) -> Result<Self, ValidationError> {
        if pieces.is_empty() {
            return Err(ValidationError::invalid("piecewise dynamic parameter", "no pieces given"));
        }
        if pieces[0].0 != 0.0 {
            return Err(ValidationError::invalid(
                "piecewise dynamic parameter",
                format!("first piece must start at cycle 0, got {}", pieces[0].0),
            ));
        }
        for w in pieces.windows(2) {
            if !(w[0].0 < w[1].0) {
                return Err(ValidationError::invalid(
                    "piecewise dynamic parameter",
                    format!("start cycles must strictly ascend, got {} then {}", w[0].0, w[1].0),
                ));
            }
        }
        Ok(DynamicParameter::Piecewise(pieces))
    }

    /// Evaluates this parameter for the given cycle, out of `total_cycles` total (which may be
    /// `f64::INFINITY`).
    pub fn value(&self, current_cycle: f64, total_cycles: f64) -> f64 {
        match self {
            DynamicParameter::Constant(c) => *c,
            DynamicParameter::Linear { intercept, slope } => intercept + slope * current_cycle,
            DynamicParameter::Exponential { a0, rate } => a0 * (rate * current_cycle).exp(),
            DynamicParameter::Shifted { inner, cycle_shift } => {
                inner.value(current_cycle + cycle_shift, total_cycles + cycle_shift)
            }
            DynamicParameter::Piecewise(pieces) => {
                // Find the last piece whose start_cycle <= current_cycle.
                let idx = pieces
                    .iter()
                    .rposition(|(start, _)| *start <= current_cycle)
                    .unwrap_or(0);
                let (start, piece) = &pieces[idx];
                let local_total = if idx + 1 < pieces.len() { pieces[idx + 1].0 } else { total_cycles } - start;
                piece.value(current_cycle - start, local_total)
            }
        }
    }
}

