use ems_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown {kind} policy {name:?}")]
    UnknownPolicy { kind: &'static str, name: String },

    #[error("invalid compliance table: {0}")]
    InvalidCompTable(String),

    #[error("travel query failed: {0}")]
    Travel(#[from] SpatialError),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
