//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; the mapping to seconds
//! is held by `SimClock`:
//!
//!   seconds = tick * dt
//!
//! Using an integer tick as the canonical unit keeps all schedule arithmetic
//! exact.  `dt` is typically a few milliseconds of simulated flight; a `u64`
//! tick counter never overflows in practice.
//!
//! Agents that are permanently asleep carry the [`Tick::NEVER`] sentinel as
//! their next-due tick; the integrate phase skips them entirely.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Sentinel: "this agent is never due again".
    pub const NEVER: Tick = Tick(u64::MAX);

    /// Ticks elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub dt: f32,
    /// The current tick — advanced by [`SimClock::advance`] each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick zero with the given resolution.
    pub fn new(dt: f32) -> Self {
        Self { dt, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.dt as f64
    }
}

/// Ticks spanning `secs` simulated seconds at resolution `dt`, rounded to
/// the nearest tick.
///
/// Rounding matters: many config values are near-exact multiples of `dt`
/// that land just below the integer in float (`0.5 / 0.05f32 as f64` is
/// 9.9999…), and truncation would shave a tick off every such duration.
#[inline]
pub fn ticks_for(secs: f32, dt: f32) -> u64 {
    (secs as f64 / dt as f64).round() as u64
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3} s)", self.current_tick, self.elapsed_secs())
    }
}
