use thiserror::Error;

use murmur_agent::AgentError;
use murmur_behavior::BehaviorError;
use murmur_core::CoreError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("unknown species index {0}")]
    UnknownSpecies(usize),

    #[error("species {species} has no agent {index}")]
    UnknownAgent { species: usize, index: usize },

    #[error("snapshot set for species {species} has {got} entries, population holds {expected}")]
    SnapshotMismatch {
        species:  usize,
        expected: usize,
        got:      usize,
    },

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
