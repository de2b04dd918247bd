//! Polygon face store used by the grammar and voxel crates.
//!
//! Faces are addressed by [`FaceId`] handles and carry a mutable `group` tag and
//! `color`. Geometry derived from a face (normal, area, center) is computed on demand.
#![forbid(unsafe_code)]

pub mod color;
pub mod divide;
mod error;
mod mesh;
mod obj;
mod topology;

pub use divide::{Division, SplitDir};
pub use error::{MeshError, MeshResult};
pub use mesh::{Face, FaceId, Mesh, MeshCheckpoint, VertexId, WHITE};
pub use topology::TopologyStats;
