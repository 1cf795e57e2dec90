//! Error type for `ems-sim`.

use ems_core::EmsError;
use ems_entity::EntityError;
use ems_policy::PolicyError;
use ems_spatial::SpatialError;
use thiserror::Error;

use crate::DeploymentError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} entry {position} has index {index}; entities must be indexed by position")]
    IndexMismatch {
        what:     &'static str,
        position: usize,
        index:    usize,
    },

    #[error("invalid advance bound: {0}")]
    InvalidBound(String),

    #[error("{policy} policy returned an unusable decision: {reason}")]
    InvalidDecision {
        policy: String,
        reason: String,
    },

    #[error("cannot schedule sleep: {0}")]
    Sleep(String),

    #[error(transparent)]
    Core(#[from] EmsError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("travel query failed: {0}")]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
