//! The per-individual record and its per-tick snapshot frame.

use glam::Vec3;

use crate::aero::{AeroInfo, StateAero};
use crate::snapshot::AgentSnapshot;
use murmur_core::{AgentId, StateId, Tick};

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One individual.  Plain data: all behavior lives in the state machine that
/// the simulation stores alongside it.
///
/// Units: positions in meters, speeds in m/s, forces in kg·m/s².  Steering is
/// reset at each behavioral update and accumulated by the state's actions;
/// `force` is reserved for standing physical forces.
#[derive(Debug, Clone)]
pub struct Agent {
    pub pos:   Vec3,
    /// Unit heading.  Kept normalized by motion integration.
    pub dir:   Vec3,
    pub speed: f32,
    pub accel: Vec3,

    /// Accumulated steering for the current update.  [kg·m/s²]
    pub steering: Vec3,
    /// Standing physical force (wind, gravity correction).  [kg·m/s²]
    pub force: Vec3,
    /// Signed yaw rate, export only.  [rad/s]
    pub ang_vel: f32,

    pub stress:          f32,
    /// Individual stress floor restored at every state exit.
    pub stress_baseline: f32,

    /// Ticks between behavioral updates.
    pub reaction_time: u64,
    pub last_update:   Tick,

    pub current_state: StateId,
    /// Remaining dwell ticks, broadcast to neighbors for escape copying.
    pub state_timer: u64,
    /// Escape-copy staging: state observed on an escaping neighbor.
    pub copy_state: StateId,
    /// Escape-copy staging: that neighbor's remaining dwell.
    pub copy_duration: u64,

    /// Current prey of a hunting strategy; `INVALID` when unset.
    pub target: AgentId,

    pub ai: AeroInfo,
    /// Speed regime of the current state.
    pub sa: StateAero,
}

impl Agent {
    pub fn new(ai: AeroInfo) -> Self {
        Agent {
            pos:             Vec3::ZERO,
            dir:             Vec3::X,
            speed:           ai.cruise_speed,
            accel:           Vec3::ZERO,
            steering:        Vec3::ZERO,
            force:           Vec3::ZERO,
            ang_vel:         0.0,
            stress:          0.0,
            stress_baseline: 0.0,
            reaction_time:   1,
            last_update:     Tick::ZERO,
            current_state:   StateId(0),
            state_timer:     0,
            copy_state:      StateId::INVALID,
            copy_duration:   0,
            target:          AgentId::INVALID,
            sa:              ai.default_state_aero(),
            ai,
        }
    }

    /// Velocity vector `speed · dir`.
    #[inline]
    pub fn vel(&self) -> Vec3 {
        self.speed * self.dir
    }

    /// Capture the cross-agent-visible part of this agent.
    #[inline]
    pub fn frame(&self) -> AgentFrame {
        AgentFrame {
            pos:         self.pos,
            dir:         self.dir,
            speed:       self.speed,
            state:       self.current_state,
            state_timer: self.state_timer,
        }
    }

    pub fn to_snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            pos:    self.pos,
            dir:    self.dir,
            speed:  self.speed,
            accel:  self.accel,
            stress: self.stress,
        }
    }

    pub fn apply_snapshot(&mut self, s: &AgentSnapshot) {
        self.pos = s.pos;
        self.dir = s.dir;
        self.speed = s.speed;
        self.accel = s.accel;
        self.stress = s.stress;
    }
}

// ── AgentFrame ────────────────────────────────────────────────────────────────

/// Immutable view of an agent captured at the start of a tick.
///
/// During the parallel update phase this is the ONLY cross-agent data a
/// worker may read; live `Agent` records are being mutated concurrently by
/// their own workers.
#[derive(Debug, Clone, Copy)]
pub struct AgentFrame {
    pub pos:         Vec3,
    pub dir:         Vec3,
    pub speed:       f32,
    pub state:       StateId,
    pub state_timer: u64,
}

impl AgentFrame {
    #[inline]
    pub fn vel(&self) -> Vec3 {
        self.speed * self.dir
    }
}

impl Default for AgentFrame {
    fn default() -> Self {
        AgentFrame {
            pos:         Vec3::ZERO,
            dir:         Vec3::X,
            speed:       0.0,
            state:       StateId(0),
            state_timer: 0,
        }
    }
}
