use thiserror::Error;

use crate::{NodeId, PipeId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown node id: {0}")]
    UnknownNode(NodeId),
    #[error("Unknown pipe id: {0}")]
    UnknownPipe(PipeId),
    #[error("Node id {0} is already in use")]
    DuplicateNodeId(NodeId),
    #[error("Invalid pipe path: {0}")]
    InvalidPath(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Polyline codec error: {0}")]
    Polyline(String),
    #[error("Elevation lookup failed: {0}")]
    Elevation(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
