use tessel_mesh::MeshError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoxelError {
    /// Occupancy and color grids must share extents.
    #[error("occupancy grid is {solid:?} but color grid is {colors:?}")]
    DimensionMismatch {
        solid: (usize, usize, usize),
        colors: (usize, usize, usize),
    },

    #[error("grid {dims:?} needs {expected} cells, got {got}")]
    InvalidData {
        dims: (usize, usize, usize),
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type VoxelResult<T> = std::result::Result<T, VoxelError>;
