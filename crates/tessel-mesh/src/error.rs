use thiserror::Error;

use crate::mesh::{FaceId, VertexId};

/// Errors raised by the face store and the division operations.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("a face needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("unknown face {0}")]
    UnknownFace(FaceId),

    /// The division only handles quads.
    #[error("{op} needs a quad but face {face} has {vertices} vertices")]
    UnsupportedPolygon {
        op: &'static str,
        face: FaceId,
        vertices: usize,
    },

    #[error("face {0} is degenerate (zero area)")]
    Degenerate(FaceId),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type MeshResult<T> = std::result::Result<T, MeshError>;
