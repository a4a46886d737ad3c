//! Read-only world view handed to actions and state machines.

use murmur_agent::AgentFrame;
use murmur_core::{FlockId, RefreshCounter, Tick};
use murmur_flock::FlockTracker;
use murmur_neighbor::{NeighborRecord, NeighborTable};

/// Everything an action may read during one behavioral update.
///
/// All cross-agent data in here was captured at the start of the tick
/// (frames, neighbor rows, flock descriptors), so concurrent updates of
/// other agents are invisible — every worker sees the same consistent world.
pub struct TickContext<'a> {
    pub tick: Tick,
    pub dt:   f32,
    /// Index of the focal agent's species.
    pub species: usize,
    /// Per-species frame captures.
    pub frames: &'a [Vec<AgentFrame>],
    /// Neighbor tables, indexed `[focal species][other species]`.
    pub tables: &'a [Vec<NeighborTable>],
    /// Per-species flock trackers.
    pub trackers: &'a [FlockTracker],
    /// Forced neighbor-refresh counter (raised by evasion states).
    pub refresh: &'a RefreshCounter,
}

impl<'a> TickContext<'a> {
    /// Distance-sorted neighbor row of focal agent `idx` against `other`.
    /// Excludes the focal agent itself when `other` is its own species.
    #[inline]
    pub fn sorted(&self, other: usize, idx: usize) -> &'a [NeighborRecord] {
        self.tables[self.species][other].sorted_view(idx)
    }

    /// Insertion-ordered neighbor row (includes self for the own species).
    #[inline]
    pub fn raw(&self, other: usize, idx: usize) -> &'a [NeighborRecord] {
        self.tables[self.species][other].raw_view(idx)
    }

    /// Frame captures of species `other`.
    #[inline]
    pub fn frames_of(&self, other: usize) -> &'a [AgentFrame] {
        &self.frames[other]
    }

    /// Flock tracker of species `other`.
    #[inline]
    pub fn tracker(&self, other: usize) -> &'a FlockTracker {
        &self.trackers[other]
    }

    /// Flock of focal agent `idx` within its own species.
    #[inline]
    pub fn flock_of(&self, idx: usize) -> FlockId {
        self.trackers[self.species].id_of(idx)
    }
}
