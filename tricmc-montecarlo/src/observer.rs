/// A hook the simulation driver calls at the points where the (external) observable pipeline
/// and trajectory writer would normally do their work.
///
/// This crate owns none of that machinery; it only guarantees to call `on_snapshot` every
/// `averaging_every` cycles of the averaging phase and `on_inline_info` every
/// `inline_info_every` cycles of either phase, exactly as the integration loop is specified to.
pub trait SimulationObserver: Send + Sync {
    fn on_snapshot(&mut self, cycle: u64);
    fn on_inline_info(&mut self, cycle: u64, temperature: f64, pressure: f64);
}

/// The default observer: does nothing. Used when a caller has no trajectory/observable
/// pipeline wired up (e.g. overlap relaxation, or a test).
pub struct NullObserver;

impl SimulationObserver for NullObserver {
    fn on_snapshot(&mut self, _cycle: u64) {}
    fn on_inline_info(&mut self, _cycle: u64, _temperature: f64, _pressure: f64) {}
}
