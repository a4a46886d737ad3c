//! `murmur-sim` — the simulation driver.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`config`]   | JSON-backed `SimulationConfig` / `SpeciesConfig`         |
//! | [`builder`]  | `SimBuilder` — validate the config, assemble the world   |
//! | [`sim`]      | `Simulation`: tick loop, snapshots, visitors             |
//! | [`observer`] | `Observer` trait and `SimEvent`s                         |
//!
//! # Tick anatomy
//!
//! 1. capture an [`AgentFrame`](murmur_agent::AgentFrame) per agent;
//! 2. refresh the neighbor rows of every due agent (every agent while the
//!    forced-refresh counter is raised), then run the behavioral update of
//!    due agents in parallel per species;
//! 3. integrate motion for all awake agents; on the flock-detection interval
//!    feed and re-cluster the trackers, otherwise advect the centroids;
//! 4. advance the clock.
//!
//! `PreTick`/`Tick` observer events fire outside the world lock, so
//! observers are free to call back into snapshots and visitors.  The
//! termination flag is honored between ticks only: outside observers always
//! see fully-applied ticks.

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use config::{FlockDetectionConfig, SimulationConfig, SpeciesConfig, StressConfig};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, Observer, SimEvent};
pub use sim::{AgentVisit, Simulation};
