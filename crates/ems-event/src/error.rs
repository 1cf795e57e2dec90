use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("unknown event form: {0:?}")]
    UnknownForm(String),
}

pub type EventResult<T> = Result<T, EventError>;
