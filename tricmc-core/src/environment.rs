use crate::dynamic_parameter::DynamicParameter;
use crate::move_sampler::{MoveSampler, TriclinicBoxScaler};

/// Temperature, pressure, movers and box scaler for a simulation run.
///
/// Every field is optional so that an `Environment` can represent a *partial* configuration —
/// e.g. one read from a base config file — that a more specific override merges on top of.
/// [`Environment::is_complete`] is the precondition the simulation driver checks before it will
/// run at all.
#[derive(Default)]
pub struct Environment {
    pub temperature: Option<DynamicParameter>,
    pub pressure: Option<DynamicParameter>,
    pub movers: Option<Vec<Box<dyn MoveSampler>>>,
    pub box_scaler: Option<Box<dyn TriclinicBoxScaler>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn is_complete(&self) -> bool {
        self.temperature.is_some()
            && self.pressure.is_some()
            && self.movers.as_ref().is_some_and(|m| !m.is_empty())
            && self.box_scaler.is_some()
    }

    /// Merges `other` on top of `self`: each field `other` has set overrides the
    /// corresponding field in `self`; fields `other` leaves unset pass `self`'s value through
    /// unchanged. Consumes both environments and returns the combined one.
    pub fn combine(mut self, mut other: Environment) -> Environment {
        if other.temperature.is_some() {
            self.temperature = other.temperature.take();
        }
        if other.pressure.is_some() {
            self.pressure = other.pressure.take();
        }
        if other.movers.is_some() {
            self.movers = other.movers.take();
        }
        if other.box_scaler.is_some() {
            self.box_scaler = other.box_scaler.take();
        }
        self
    }
}

