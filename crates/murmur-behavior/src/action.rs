//! The steering-action contract.

use murmur_agent::Agent;
use murmur_core::{AgentRng, Tick};
use murmur_neighbor::NeighborRecord;

use crate::context::TickContext;

/// One composable steering strategy.
///
/// A state runs its actions in order on every resume; each `apply`
/// accumulates into `agent.steering` (or stages side data such as escape
/// copies).  Actions may carry per-agent mutable state between calls —
/// `on_entry` is the place to initialize it.
pub trait Action: Send {
    /// Called once when the owning state is entered.
    fn on_entry(
        &mut self,
        _agent: &mut Agent,
        _idx: usize,
        _ctx: &TickContext,
        _rng: &mut AgentRng,
    ) {
    }

    /// Give the action a chance to shorten the owning state's dwell.
    /// Called after `on_entry`, with the state's nominal duration and its
    /// provisional exit tick.
    fn check_state_exit(&self, _state_duration: u64, _exit_tick: &mut Tick) {}

    /// Accumulate steering for this update.
    fn apply(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, rng: &mut AgentRng);
}

// ── neighborhood filters ──────────────────────────────────────────────────────

/// Field-of-view plus maximum-distance admission test on neighbor records.
#[derive(Debug, Clone, Copy)]
pub struct FovFilter {
    half_fov: f32, // [rad]
    maxdist2: f32,
}

impl FovFilter {
    pub fn new(fov_deg: f32, maxdist: f32) -> Self {
        FovFilter {
            half_fov: (0.5 * fov_deg).to_radians(),
            maxdist2: maxdist * maxdist,
        }
    }

    #[inline]
    pub fn admits(&self, r: &NeighborRecord) -> bool {
        r.dist2 < self.maxdist2 && r.bearing.abs() <= self.half_fov
    }
}

/// Run `accept` over a sorted neighbor view until `topo` records have been
/// accepted or the view is exhausted; returns the realized count.
pub fn while_topo<F>(view: &[NeighborRecord], topo: usize, mut accept: F) -> usize
where
    F: FnMut(&NeighborRecord) -> bool,
{
    let mut realized = 0;
    for record in view {
        if realized == topo {
            break;
        }
        if accept(record) {
            realized += 1;
        }
    }
    realized
}
