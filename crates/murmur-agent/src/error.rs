use murmur_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent configuration error: {0}")]
    Config(String),

    #[error("snapshot file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AgentError> for CoreError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::Config(msg) => CoreError::Config(msg),
            AgentError::Csv(err) => CoreError::Parse(err.to_string()),
            AgentError::Io(err) => CoreError::Io(err),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
