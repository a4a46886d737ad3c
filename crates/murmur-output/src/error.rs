use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output configuration error: {0}")]
    Config(String),

    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;
