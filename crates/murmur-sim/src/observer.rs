//! Observer callbacks.

use crate::sim::Simulation;

/// Lifecycle events delivered to observers.
///
/// All events fire outside the world lock, so handlers may freely call the
/// simulation's read accessors (`visit_all`, `get_snapshots`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Populations are placed and initial states entered.
    Initialized,
    /// About to apply a tick.
    PreTick,
    /// A tick has been fully applied.
    Tick,
    /// The run is over (duration reached or terminated early).
    Finished,
}

/// Read-only spectator of a running simulation.
pub trait Observer {
    fn notify(&mut self, event: SimEvent, sim: &Simulation);
}

/// Does nothing; stands in where no observation is wanted.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&mut self, _event: SimEvent, _sim: &Simulation) {}
}
