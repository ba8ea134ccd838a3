//! Error types.

use thiserror::Error;

use crate::sim::{HandlerId, ShapeId};

/// Failures registering or deregistering a shape with a drawing surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("shape {0} is already registered")]
    AlreadyRegistered(ShapeId),

    #[error("shape {0} is not registered")]
    NotRegistered(ShapeId),

    #[error("surface is full ({capacity} shapes)")]
    Full { capacity: usize },

    #[error("surface is busy")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("unrecognized shape kind: {0}")]
    InvalidKind(String),

    #[error("surface registration failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("no shape with handler id {0}")]
    UnknownHandler(HandlerId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
