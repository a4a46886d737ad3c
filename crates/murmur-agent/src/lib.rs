//! `murmur-agent` — the agent record and its physical layer.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`agent`]    | `Agent` (mutable per-individual record), `AgentFrame`       |
//! | [`aero`]     | `AeroConfig`/`AeroInfo` flight profiles, `StateAero`        |
//! | [`flight`]   | steering → force → velocity motion integration             |
//! | [`snapshot`] | `AgentSnapshot` and its CSV round-trip                      |
//! | [`init`]     | named initial-placement providers                           |
//!
//! An `Agent` is plain data: the behavioral state machine that drives it
//! lives in `murmur-behavior` and is stored in a vector parallel to the
//! population, so the tick driver can hand out disjoint mutable borrows.

pub mod aero;
pub mod agent;
pub mod error;
pub mod flight;
pub mod init;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use aero::{AeroConfig, AeroInfo, StateAero};
pub use agent::{Agent, AgentFrame};
pub use error::{AgentError, AgentResult};
pub use flight::integrate_motion;
pub use init::InitialPlacement;
pub use snapshot::AgentSnapshot;
