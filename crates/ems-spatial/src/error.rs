//! Spatial-subsystem error type.

use thiserror::Error;

use ems_core::NodeId;

/// Errors produced by `ems-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("invalid travel speed: {0}")]
    InvalidSpeed(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
