//! `murmur-core` — foundational types for the `rust_murmur` flocking framework.
//!
//! This crate is a dependency of every other `murmur-*` crate.  It
//! intentionally has no `murmur-*` dependencies and minimal external ones
//! (only `glam`, `rand` and `thiserror`).
//!
//! # What lives here
//!
//! | Module   | Contents                                              |
//! |----------|-------------------------------------------------------|
//! | [`ids`]  | `AgentId`, `StateId`, `FlockId`                       |
//! | [`geom`] | planar-flight vector helpers on `glam::Vec3`          |
//! | [`time`] | `Tick`, `SimClock`                                    |
//! | [`rng`]  | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`sync`] | `RefreshCounter`, `TerminationFlag`                   |
//! | [`error`]| `CoreError`, `CoreResult`                             |

pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod sync;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, FlockId, StateId};
pub use rng::{AgentRng, SimRng};
pub use sync::{RefreshCounter, TerminationFlag};
pub use time::{ticks_for, SimClock, Tick};
