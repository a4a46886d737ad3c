use murmur_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("unknown species '{0}' referenced by an action")]
    UnknownSpecies(String),
}

impl From<BehaviorError> for CoreError {
    fn from(e: BehaviorError) -> Self {
        CoreError::Config(e.to_string())
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
