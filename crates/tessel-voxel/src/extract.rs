//! Boundary-surface extraction: one quad per solid-to-void voxel face.

use rayon::prelude::*;
use tessel_geom::Vec3;
use tessel_mesh::Mesh;

use crate::direction::Direction;
use crate::error::{VoxelError, VoxelResult};
use crate::grid::{Grid, Rgb};

fn check_len<T>(grid: &Grid<T>) -> VoxelResult<()> {
    let expected = grid.nx * grid.ny * grid.nz;
    if grid.len() != expected {
        return Err(VoxelError::InvalidData {
            dims: grid.dims(),
            expected,
            got: grid.len(),
        });
    }
    Ok(())
}

/// Rejects malformed input before any quad is emitted.
fn check_dims(solid: &Grid<bool>, colors: &Grid<Rgb>) -> VoxelResult<()> {
    if solid.dims() != colors.dims() {
        return Err(VoxelError::DimensionMismatch {
            solid: solid.dims(),
            colors: colors.dims(),
        });
    }
    check_len(solid)?;
    check_len(colors)
}

/// A face is exposed when the neighbor across it is outside the grid or void.
#[inline]
fn exposed(solid: &Grid<bool>, x: usize, y: usize, z: usize, dir: Direction) -> bool {
    let (dx, dy, dz) = dir.delta();
    let n = solid.get(x as i64 + dx, y as i64 + dy, z as i64 + dz);
    !n.copied().unwrap_or(false)
}

fn emit_quad(mesh: &mut Mesh, x: usize, y: usize, z: usize, dir: Direction, rgb: Rgb) -> VoxelResult<()> {
    let base = Vec3::new(x as f32, y as f32, z as f32);
    let ids = dir
        .corners()
        .map(|(cx, cy, cz)| mesh.add_vertex_at(base + Vec3::new(cx as f32, cy as f32, cz as f32)));
    let f = mesh.add_face(&ids)?;
    if let Some(face) = mesh.face_mut(f) {
        face.color = [rgb[0], rgb[1], rgb[2], 1.0];
    }
    Ok(())
}

fn extract_slab(solid: &Grid<bool>, colors: &Grid<Rgb>, z: usize, mesh: &mut Mesh) -> VoxelResult<()> {
    for y in 0..solid.ny {
        for x in 0..solid.nx {
            if !*solid.get_local(x, y, z) {
                continue;
            }
            let rgb = *colors.get_local(x, y, z);
            for dir in Direction::ALL {
                if exposed(solid, x, y, z, dir) {
                    emit_quad(mesh, x, y, z, dir, rgb)?;
                }
            }
        }
    }
    Ok(())
}

/// Builds the boundary mesh of `solid`, coloring each quad from its cell in `colors`.
///
/// Cells are visited z-outer, then y, then x; each exposed direction is tested in
/// [`Direction::ALL`] order and emits four fresh vertices. Coincident vertices are
/// not welded; call [`Mesh::update_topology`] for that.
pub fn extract_boundary(solid: &Grid<bool>, colors: &Grid<Rgb>) -> VoxelResult<Mesh> {
    check_dims(solid, colors)?;
    let mut mesh = Mesh::new();
    for z in 0..solid.nz {
        extract_slab(solid, colors, z, &mut mesh)?;
    }
    log::debug!(
        "extracted {} quads from {}x{}x{} grid",
        mesh.face_count(),
        solid.nx,
        solid.ny,
        solid.nz
    );
    Ok(mesh)
}

/// Same mesh as [`extract_boundary`], built one z-slab per rayon task and
/// concatenated in slab order.
pub fn extract_boundary_par(solid: &Grid<bool>, colors: &Grid<Rgb>) -> VoxelResult<Mesh> {
    check_dims(solid, colors)?;
    let slabs: Vec<Mesh> = (0..solid.nz)
        .into_par_iter()
        .map(|z| {
            let mut slab = Mesh::new();
            extract_slab(solid, colors, z, &mut slab).map(|()| slab)
        })
        .collect::<VoxelResult<_>>()?;
    let mut mesh = Mesh::new();
    for slab in slabs {
        mesh.append(slab);
    }
    log::debug!("extracted {} quads over {} slabs", mesh.face_count(), solid.nz);
    Ok(mesh)
}

/// Number of quads [`extract_boundary`] would emit. Panics if `solid.data` is shorter than its extents.
pub fn count_exposed_faces(solid: &Grid<bool>) -> usize {
    let mut n = 0;
    for z in 0..solid.nz {
        for y in 0..solid.ny {
            for x in 0..solid.nx {
                if *solid.get_local(x, y, z) {
                    n += Direction::ALL
                        .iter()
                        .filter(|&&d| exposed(solid, x, y, z, d))
                        .count();
                }
            }
        }
    }
    n
}
