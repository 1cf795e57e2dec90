//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `EmsError` through a
//! `#[from]` variant where they need it.

use thiserror::Error;

use crate::{AmbId, CallId, HospitalId, StationId};

/// The base error type for `ems-core` and a common variant for sub-crates.
#[derive(Debug, Error)]
pub enum EmsError {
    #[error("ambulance {0} not found")]
    AmbulanceNotFound(AmbId),

    #[error("call {0} not found")]
    CallNotFound(CallId),

    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("hospital {0} not found")]
    HospitalNotFound(HospitalId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type.
pub type EmsResult<T> = Result<T, EmsError>;
