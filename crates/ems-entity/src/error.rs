use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("entity parse error: {0}")]
    Parse(String),

    #[error("invalid entity input: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EntityResult<T> = Result<T, EntityError>;
