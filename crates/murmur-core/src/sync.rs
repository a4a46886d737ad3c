//! Cross-thread control flags shared between the tick driver and
//! collaborators.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

// ── RefreshCounter ────────────────────────────────────────────────────────────

/// Shared forced-neighbor-refresh counter.
///
/// While the counter is positive the scheduler recomputes every agent's
/// neighbor rows every tick, overriding the per-agent reaction-time cadence.
/// Collaborators needing tighter neighbor fidelity (active predator evasion)
/// call [`raise`][Self::raise] on entering that regime and
/// [`lower`][Self::lower] on leaving it; nesting works because this is a
/// counter, not a flag.
#[derive(Debug, Default)]
pub struct RefreshCounter(AtomicI32);

impl RefreshCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request forced refresh (one more interested party).
    #[inline]
    pub fn raise(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    /// Withdraw a forced-refresh request.
    #[inline]
    pub fn lower(&self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }

    /// `true` while at least one party requests forced refresh.
    #[inline]
    pub fn active(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }
}

// ── TerminationFlag ───────────────────────────────────────────────────────────

/// One-way termination request, settable from any thread.
///
/// The tick driver polls it between ticks only, so a raised flag never
/// interrupts a tick mid-flight — post-tick consumers always observe a
/// fully-applied tick.
#[derive(Debug, Default)]
pub struct TerminationFlag(AtomicBool);

impl TerminationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request termination at the next tick boundary.
    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
