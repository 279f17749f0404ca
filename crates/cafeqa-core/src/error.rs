use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("The corpus must contain at least one entry")]
    EmptyCorpus,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Malformed source: {0}")]
    MalformedSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors a caller can report and move past (an interactive session keeps going).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidConfig(_) | Error::EmptyCorpus | Error::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
