//! `murmur-behavior` — the hierarchical behavioral layer.
//!
//! Each agent runs a [`StateMachine`] over a small set of
//! [`BehaviorState`]s.  A state owns an ordered list of steering
//! [`Action`]s that accumulate into the agent's steering vector every time
//! the state resumes; transient states exit on every resume, persistent ones
//! dwell for a configured duration (actions may shorten it).  On exit the
//! next state is drawn from a stress-indexed [`TransitionTable`], unless a
//! staged escape copy overrides the draw.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`context`]    | `TickContext` — read-only world view for actions      |
//! | [`action`]     | `Action` trait, FOV filter, topological iteration     |
//! | [`actions`]    | the concrete steering strategies + `ActionConfig`     |
//! | [`transition`] | stress-indexed piecewise-linear transition table      |
//! | [`stress`]     | stress sources run at every state exit                |
//! | [`state`]      | transient/persistent `BehaviorState` + `StateConfig`  |
//! | [`machine`]    | per-agent `StateMachine`                               |

pub mod action;
pub mod actions;
pub mod context;
pub mod error;
pub mod machine;
pub mod state;
pub mod stress;
pub mod transition;


pub use action::{Action, FovFilter};
pub use actions::{ActionConfig, FlockSelection};
pub use context::TickContext;
pub use error::{BehaviorError, BehaviorResult};
pub use machine::StateMachine;
pub use state::{BehaviorState, StateConfig};
pub use stress::{StressSource, StressSourceConfig};
pub use transition::{TransitionConfig, TransitionTable};
