//! Dense voxel grids and boundary-surface extraction.
#![forbid(unsafe_code)]

mod direction;
mod error;
pub mod extract;
pub mod field;
mod grid;

pub use direction::Direction;
pub use error::{VoxelError, VoxelResult};
pub use extract::{count_exposed_faces, extract_boundary, extract_boundary_par};
pub use grid::{Grid, Rgb};
