//! Face division operations.
//!
//! Every operation appends child faces to the mesh and returns them in a fixed
//! order; the parent face is left untouched. Children inherit the parent's group
//! and color so a classifier can overwrite only what it needs.

use serde::{Deserialize, Serialize};
use tessel_geom::Vec3;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{FaceId, Mesh, VertexId};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDir {
    /// Along the first edge (corner 0 → 1).
    U,
    /// Along the second edge (corner 1 → 2).
    V,
}

fn quad_corners(mesh: &Mesh, f: FaceId, op: &'static str) -> MeshResult<[VertexId; 4]> {
    let face = mesh.face(f).ok_or(MeshError::UnknownFace(f))?;
    match face.vertices.as_slice() {
        &[a, b, c, d] => Ok([a, b, c, d]),
        vs => Err(MeshError::UnsupportedPolygon {
            op,
            face: f,
            vertices: vs.len(),
        }),
    }
}

fn open_unit(name: &str, t: f32) -> MeshResult<()> {
    if t.is_finite() && t > 0.0 && t < 1.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter(format!(
            "{name} must lie in (0, 1), got {t}"
        )))
    }
}

/// Splits a quad into `nu × nv` cells by bilinear interpolation, row by row.
pub fn split_grid(mesh: &mut Mesh, f: FaceId, nu: usize, nv: usize) -> MeshResult<Vec<FaceId>> {
    let [a, b, c, d] = quad_corners(mesh, f, "split_grid")?;
    if nu == 0 || nv == 0 {
        return Err(MeshError::InvalidParameter(format!(
            "grid needs at least one cell per direction, got {nu}x{nv}"
        )));
    }
    let pa = mesh.vertices[a.index()];
    let pb = mesh.vertices[b.index()];
    let pc = mesh.vertices[c.index()];
    let pd = mesh.vertices[d.index()];

    let mut lattice = Vec::with_capacity((nu + 1) * (nv + 1));
    for j in 0..=nv {
        let tv = j as f32 / nv as f32;
        let left = pa.lerp(pd, tv);
        let right = pb.lerp(pc, tv);
        for i in 0..=nu {
            let p = left.lerp(right, i as f32 / nu as f32);
            lattice.push(mesh.add_vertex_at(p));
        }
    }
    let at = |i: usize, j: usize| lattice[j * (nu + 1) + i];

    let mut out = Vec::with_capacity(nu * nv);
    for j in 0..nv {
        for i in 0..nu {
            let loop_ids = [at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)];
            out.push(mesh.add_child_face(f, &loop_ids)?);
        }
    }
    Ok(out)
}

/// Splits a quad in two at fraction `t` of the chosen direction.
pub fn split_rel(mesh: &mut Mesh, f: FaceId, dir: SplitDir, t: f32) -> MeshResult<Vec<FaceId>> {
    let [a, b, c, d] = quad_corners(mesh, f, "split_rel")?;
    open_unit("split ratio", t)?;
    let p = |v: VertexId| mesh.vertices[v.index()];
    match dir {
        SplitDir::U => {
            let m1 = p(a).lerp(p(b), t);
            let m2 = p(d).lerp(p(c), t);
            let m1 = mesh.add_vertex_at(m1);
            let m2 = mesh.add_vertex_at(m2);
            Ok(vec![
                mesh.add_child_face(f, &[a, m1, m2, d])?,
                mesh.add_child_face(f, &[m1, b, c, m2])?,
            ])
        }
        SplitDir::V => {
            let m1 = p(b).lerp(p(c), t);
            let m2 = p(a).lerp(p(d), t);
            let m1 = mesh.add_vertex_at(m1);
            let m2 = mesh.add_vertex_at(m2);
            Ok(vec![
                mesh.add_child_face(f, &[a, b, m1, m2])?,
                mesh.add_child_face(f, &[m2, m1, c, d])?,
            ])
        }
    }
}

/// Shrinks the face toward its center. Returns one ring quad per edge followed by
/// the inner face as the last element.
pub fn inset(mesh: &mut Mesh, f: FaceId, fraction: f32) -> MeshResult<Vec<FaceId>> {
    open_unit("inset fraction", fraction)?;
    let outer = mesh.face(f).ok_or(MeshError::UnknownFace(f))?.vertices.clone();
    let center = mesh.face_center(f);
    let inner: Vec<VertexId> = outer
        .iter()
        .map(|v| {
            let p = mesh.vertices[v.index()].lerp(center, fraction);
            mesh.add_vertex_at(p)
        })
        .collect();
    ring_then_cap(mesh, f, &outer, &inner)
}

/// Extrudes the face along its normal. Returns the side quads followed by the cap
/// as the last element. `taper` scales the cap toward its center (0 keeps the size).
pub fn extrude(mesh: &mut Mesh, f: FaceId, height: f32, taper: f32) -> MeshResult<Vec<FaceId>> {
    if !height.is_finite() {
        return Err(MeshError::InvalidParameter(format!(
            "extrude height must be finite, got {height}"
        )));
    }
    if !(taper.is_finite() && (0.0..1.0).contains(&taper)) {
        return Err(MeshError::InvalidParameter(format!(
            "extrude taper must lie in [0, 1), got {taper}"
        )));
    }
    let outer = mesh.face(f).ok_or(MeshError::UnknownFace(f))?.vertices.clone();
    let normal = mesh.face_normal(f);
    if normal == Vec3::ZERO {
        return Err(MeshError::Degenerate(f));
    }
    let center = mesh.face_center(f);
    let offset = normal * height;
    let top: Vec<VertexId> = outer
        .iter()
        .map(|v| {
            let p = mesh.vertices[v.index()].lerp(center, taper) + offset;
            mesh.add_vertex_at(p)
        })
        .collect();
    ring_then_cap(mesh, f, &outer, &top)
}

fn ring_then_cap(
    mesh: &mut Mesh,
    parent: FaceId,
    outer: &[VertexId],
    inner: &[VertexId],
) -> MeshResult<Vec<FaceId>> {
    let n = outer.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let j = (i + 1) % n;
        out.push(mesh.add_child_face(parent, &[outer[i], outer[j], inner[j], inner[i]])?);
    }
    out.push(mesh.add_child_face(parent, inner)?);
    Ok(out)
}

/// Identity division: one child sharing the parent's vertex loop.
pub fn copy_face(mesh: &mut Mesh, f: FaceId) -> MeshResult<Vec<FaceId>> {
    let vs = mesh.face(f).ok_or(MeshError::UnknownFace(f))?.vertices.clone();
    Ok(vec![mesh.add_child_face(f, &vs)?])
}

/// Serializable choice of division, used by config-driven generation steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Division {
    Grid {
        nu: usize,
        nv: usize,
    },
    SplitRel {
        dir: SplitDir,
        ratio: f32,
    },
    Inset {
        fraction: f32,
    },
    Extrude {
        height: f32,
        #[serde(default)]
        taper: f32,
    },
    Copy,
}

impl Division {
    pub fn apply(&self, mesh: &mut Mesh, f: FaceId) -> MeshResult<Vec<FaceId>> {
        match *self {
            Division::Grid { nu, nv } => split_grid(mesh, f, nu, nv),
            Division::SplitRel { dir, ratio } => split_rel(mesh, f, dir, ratio),
            Division::Inset { fraction } => inset(mesh, f, fraction),
            Division::Extrude { height, taper } => extrude(mesh, f, height, taper),
            Division::Copy => copy_face(mesh, f),
        }
    }
}
