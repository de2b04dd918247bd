use std::fmt;

use hashbrown::HashMap;
use tessel_geom::{Aabb, Vec3};

use crate::error::{MeshError, MeshResult};

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle to a face owned by a [`Mesh`]. Handles stay valid until a rollback or
/// topology rebuild that removes the face.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FaceId(pub u32);

impl FaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub vertices: Vec<VertexId>,
    /// Grammar tag; empty while unassigned.
    pub group: String,
    pub color: [f32; 4],
}

impl Face {
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Vertex and face counts recorded by [`Mesh::checkpoint`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MeshCheckpoint {
    vertices: usize,
    faces: usize,
}

#[derive(Default, Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub(crate) edges: HashMap<(VertexId, VertexId), Vec<FaceId>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> VertexId {
        self.add_vertex_at(Vec3::new(x, y, z))
    }

    pub fn add_vertex_at(&mut self, p: Vec3) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(p);
        id
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> Option<Vec3> {
        self.vertices.get(v.index()).copied()
    }

    /// Adds a face from an ordered vertex loop. New faces are untagged and white.
    pub fn add_face(&mut self, vertices: &[VertexId]) -> MeshResult<FaceId> {
        if vertices.len() < 3 {
            return Err(MeshError::TooFewVertices(vertices.len()));
        }
        if let Some(&bad) = vertices.iter().find(|v| v.index() >= self.vertices.len()) {
            return Err(MeshError::UnknownVertex(bad));
        }
        let id = FaceId(self.faces.len() as u32);
        self.faces.push(Face {
            vertices: vertices.to_vec(),
            group: String::new(),
            color: WHITE,
        });
        Ok(id)
    }

    /// Adds a face whose group and color are copied from `parent`.
    pub(crate) fn add_child_face(
        &mut self,
        parent: FaceId,
        vertices: &[VertexId],
    ) -> MeshResult<FaceId> {
        let (group, color) = {
            let p = self.face(parent).ok_or(MeshError::UnknownFace(parent))?;
            (p.group.clone(), p.color)
        };
        let id = self.add_face(vertices)?;
        let f = &mut self.faces[id.index()];
        f.group = group;
        f.color = color;
        Ok(id)
    }

    #[inline]
    pub fn face(&self, f: FaceId) -> Option<&Face> {
        self.faces.get(f.index())
    }

    #[inline]
    pub fn face_mut(&mut self, f: FaceId) -> Option<&mut Face> {
        self.faces.get_mut(f.index())
    }

    /// All face handles in storage order.
    pub fn face_ids(&self) -> Vec<FaceId> {
        (0..self.faces.len() as u32).map(FaceId).collect()
    }

    /// Corner positions of a face in loop order.
    ///
    /// Panics if `f` does not belong to this mesh.
    pub fn face_positions(&self, f: FaceId) -> Vec<Vec3> {
        self.faces[f.index()]
            .vertices
            .iter()
            .map(|v| self.vertices[v.index()])
            .collect()
    }

    /// Newell's area vector: direction is the normal, length is twice the area.
    fn newell(&self, f: FaceId) -> Vec3 {
        let pts = self.face_positions(f);
        let mut n = Vec3::ZERO;
        for (i, c) in pts.iter().enumerate() {
            let nx = pts[(i + 1) % pts.len()];
            n.x += (c.y - nx.y) * (c.z + nx.z);
            n.y += (c.z - nx.z) * (c.x + nx.x);
            n.z += (c.x - nx.x) * (c.y + nx.y);
        }
        n
    }

    /// Unit outward normal following the right-hand rule over the vertex loop.
    /// Degenerate faces yield the zero vector.
    pub fn face_normal(&self, f: FaceId) -> Vec3 {
        self.newell(f).normalized()
    }

    pub fn face_area(&self, f: FaceId) -> f32 {
        self.newell(f).length() * 0.5
    }

    pub fn face_perimeter(&self, f: FaceId) -> f32 {
        let pts = self.face_positions(f);
        pts.iter()
            .enumerate()
            .map(|(i, p)| p.distance(pts[(i + 1) % pts.len()]))
            .sum()
    }

    /// Vertex centroid.
    pub fn face_center(&self, f: FaceId) -> Vec3 {
        let pts = self.face_positions(f);
        let mut c = Vec3::ZERO;
        for p in &pts {
            c += *p;
        }
        c / pts.len() as f32
    }

    /// Isoperimetric ratio `4πA / P²`: 1 for a disc, ~0.785 for a square.
    pub fn face_compactness(&self, f: FaceId) -> f32 {
        let p = self.face_perimeter(f);
        if p <= 0.0 {
            return 0.0;
        }
        4.0 * std::f32::consts::PI * self.face_area(f) / (p * p)
    }

    /// Box around every stored vertex, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    pub fn checkpoint(&self) -> MeshCheckpoint {
        MeshCheckpoint {
            vertices: self.vertices.len(),
            faces: self.faces.len(),
        }
    }

    /// Drops every vertex and face added after `mark`. Tags written to older faces
    /// are not restored. Topology is cleared and must be rebuilt.
    pub fn rollback(&mut self, mark: MeshCheckpoint) {
        self.vertices.truncate(mark.vertices);
        self.faces.truncate(mark.faces);
        self.edges.clear();
    }

    /// Moves every vertex and face of `other` to the end of this mesh. Returns the
    /// handle of the first appended face.
    pub fn append(&mut self, other: Mesh) -> FaceId {
        let v_off = self.vertices.len() as u32;
        let first = FaceId(self.faces.len() as u32);
        self.vertices.extend(other.vertices);
        self.faces.extend(other.faces.into_iter().map(|mut f| {
            for v in &mut f.vertices {
                v.0 += v_off;
            }
            f
        }));
        self.edges.clear();
        first
    }

    /// Builds a compact mesh holding only `faces`, in the given order. Vertices are
    /// renumbered in first-use order; tags and colors are kept.
    pub fn extract(&self, faces: &[FaceId]) -> MeshResult<Mesh> {
        let mut out = Mesh::new();
        let mut remap: HashMap<VertexId, VertexId> = HashMap::new();
        for &f in faces {
            let face = self.face(f).ok_or(MeshError::UnknownFace(f))?;
            let mut loop_ids = Vec::with_capacity(face.len());
            for &v in &face.vertices {
                let nv = match remap.get(&v) {
                    Some(&nv) => nv,
                    None => {
                        let nv = out.add_vertex_at(self.vertices[v.index()]);
                        remap.insert(v, nv);
                        nv
                    }
                };
                loop_ids.push(nv);
            }
            let id = out.add_face(&loop_ids)?;
            let dst = &mut out.faces[id.index()];
            dst.group = face.group.clone();
            dst.color = face.color;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_vertices() {
        let mut mesh = Mesh::new();
        assert!(mesh.bounds().is_none());
        mesh.add_vertex(1.0, -2.0, 0.5);
        mesh.add_vertex(-1.0, 4.0, 2.5);
        let bb = mesh.bounds().unwrap();
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(bb.size(), Vec3::new(2.0, 6.0, 2.0));
        assert_eq!(bb.center(), Vec3::new(0.0, 1.0, 1.5));
    }

    fn unit_square(mesh: &mut Mesh, z: f32) -> FaceId {
        let a = mesh.add_vertex(0.0, 0.0, z);
        let b = mesh.add_vertex(1.0, 0.0, z);
        let c = mesh.add_vertex(1.0, 1.0, z);
        let d = mesh.add_vertex(0.0, 1.0, z);
        mesh.add_face(&[a, b, c, d]).unwrap()
    }

    #[test]
    fn add_face_rejects_short_loops_and_unknown_vertices() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(0.0, 0.0, 0.0);
        let b = mesh.add_vertex(1.0, 0.0, 0.0);
        assert!(matches!(
            mesh.add_face(&[a, b]),
            Err(MeshError::TooFewVertices(2))
        ));
        assert!(matches!(
            mesh.add_face(&[a, b, VertexId(9)]),
            Err(MeshError::UnknownVertex(VertexId(9)))
        ));
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn unit_square_metrics() {
        let mut mesh = Mesh::new();
        let f = unit_square(&mut mesh, 2.0);
        assert_eq!(mesh.face_normal(f), Vec3::UP);
        assert!((mesh.face_area(f) - 1.0).abs() < 1e-6);
        assert!((mesh.face_perimeter(f) - 4.0).abs() < 1e-6);
        assert_eq!(mesh.face_center(f), Vec3::new(0.5, 0.5, 2.0));
        assert!((mesh.face_compactness(f) - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn reversed_loop_flips_normal() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(0.0, 0.0, 0.0);
        let b = mesh.add_vertex(0.0, 1.0, 0.0);
        let c = mesh.add_vertex(1.0, 0.0, 0.0);
        let f = mesh.add_face(&[a, b, c]).unwrap();
        assert_eq!(mesh.face_normal(f), -Vec3::UP);
    }

    #[test]
    fn rollback_discards_later_additions() {
        let mut mesh = Mesh::new();
        let keep = unit_square(&mut mesh, 0.0);
        let mark = mesh.checkpoint();
        unit_square(&mut mesh, 1.0);
        unit_square(&mut mesh, 2.0);
        assert_eq!(mesh.face_count(), 3);
        mesh.rollback(mark);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.face(keep).is_some());
    }

    #[test]
    fn append_offsets_vertex_ids() {
        let mut a = Mesh::new();
        unit_square(&mut a, 0.0);
        let mut b = Mesh::new();
        unit_square(&mut b, 1.0);
        let first = a.append(b);
        assert_eq!(first, FaceId(1));
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.faces[1].vertices[0], VertexId(4));
        assert_eq!(a.face_center(first).z, 1.0);
    }

    #[test]
    fn extract_keeps_order_tags_and_drops_unused_vertices() {
        let mut mesh = Mesh::new();
        let f0 = unit_square(&mut mesh, 0.0);
        let f1 = unit_square(&mut mesh, 1.0);
        mesh.face_mut(f1).unwrap().group = "roof".to_string();
        let out = mesh.extract(&[f1]).unwrap();
        assert_eq!(out.face_count(), 1);
        assert_eq!(out.vertex_count(), 4);
        assert_eq!(out.faces[0].group, "roof");
        assert_eq!(out.vertices[0].z, 1.0);
        assert!(matches!(
            mesh.extract(&[f0, FaceId(42)]),
            Err(MeshError::UnknownFace(FaceId(42)))
        ));
    }
}
