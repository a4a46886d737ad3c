//! Per-neighbor observation records.

use std::f32::consts::PI;

use murmur_agent::AgentFrame;
use murmur_core::geom::rad_between_xy;
use murmur_core::StateId;

// ── NeighborRecord ────────────────────────────────────────────────────────────

/// One observation of neighbor `idx` from a focal agent's point of view.
///
/// Layout note: `dist2` comes first so the distance-sorted row can be built
/// with a byte-wise radix sort keyed on its bit pattern (squared distances
/// are non-negative, so the f32 bits order like the values).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeighborRecord {
    /// Squared distance to the neighbor.
    pub dist2: f32,
    /// Index of the neighbor within its own population.
    pub idx: u32,
    /// Signed bearing [rad] of the neighbor off the focal heading, xy-plane.
    pub bearing: f32,
    /// `true` when the neighbor's state is in the configured escape set.
    pub escaping: bool,
    /// Neighbor's behavioral state, for escape copying.
    pub state: StateId,
    /// Neighbor's remaining dwell ticks, for escape copying.
    pub escape_ticks_left: u64,
}

// ── EscapeSet ─────────────────────────────────────────────────────────────────

/// The states a population's members broadcast as "escaping".
///
/// Tiny (a handful of states at most), so a linear scan beats hashing.
#[derive(Debug, Clone, Default)]
pub struct EscapeSet(Vec<StateId>);

impl EscapeSet {
    pub fn new(states: Vec<StateId>) -> Self {
        EscapeSet(states)
    }

    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        self.0.contains(&state)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fill a raw row: one record per member of `others`, in index order.
pub fn fill_row(
    focal: &AgentFrame,
    others: &[AgentFrame],
    escape: &EscapeSet,
    row: &mut [NeighborRecord],
) {
    debug_assert_eq!(others.len(), row.len());
    for (j, (other, slot)) in others.iter().zip(row.iter_mut()).enumerate() {
        *slot = NeighborRecord {
            dist2:             focal.pos.distance_squared(other.pos),
            idx:               j as u32,
            bearing:           rad_between_xy(focal.dir, other.pos - focal.pos, PI),
            escaping:          escape.contains(other.state),
            state:             other.state,
            escape_ticks_left: other.state_timer,
        };
    }
}
