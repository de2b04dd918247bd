use hashbrown::HashMap;

use crate::mesh::{FaceId, Mesh, VertexId};

/// Positions closer than this on every axis are welded into one vertex.
const WELD_EPSILON: f32 = 1e-5;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TopologyStats {
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub edges: usize,
    /// Edges used by a single face.
    pub boundary_edges: usize,
    /// Edges shared by more than two faces.
    pub non_manifold_edges: usize,
}

impl TopologyStats {
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.boundary_edges == 0
    }
}

#[inline]
fn weld_key(x: f32, y: f32, z: f32) -> (i64, i64, i64) {
    let q = |v: f32| (v / WELD_EPSILON).round() as i64;
    (q(x), q(y), q(z))
}

impl Mesh {
    /// Welds coincident vertices, drops vertices no face uses, and rebuilds the
    /// undirected edge → faces map. Face handles are unchanged.
    pub fn update_topology(&mut self) -> TopologyStats {
        let vertices_before = self.vertices.len();
        let mut by_pos: HashMap<(i64, i64, i64), VertexId> = HashMap::new();
        let mut remap: HashMap<VertexId, VertexId> = HashMap::new();
        let mut welded = Vec::with_capacity(self.vertices.len());

        for face in &mut self.faces {
            for v in &mut face.vertices {
                let nv = match remap.get(v) {
                    Some(&nv) => nv,
                    None => {
                        let p = self.vertices[v.index()];
                        let nv = *by_pos.entry(weld_key(p.x, p.y, p.z)).or_insert_with(|| {
                            welded.push(p);
                            VertexId(welded.len() as u32 - 1)
                        });
                        remap.insert(*v, nv);
                        nv
                    }
                };
                *v = nv;
            }
        }
        self.vertices = welded;

        self.edges.clear();
        for (fi, face) in self.faces.iter().enumerate() {
            let n = face.vertices.len();
            for i in 0..n {
                let a = face.vertices[i];
                let b = face.vertices[(i + 1) % n];
                if a == b {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                self.edges.entry(key).or_default().push(FaceId(fi as u32));
            }
        }

        let mut stats = TopologyStats {
            vertices_before,
            vertices_after: self.vertices.len(),
            edges: self.edges.len(),
            ..TopologyStats::default()
        };
        for faces in self.edges.values() {
            match faces.len() {
                1 => stats.boundary_edges += 1,
                2 => {}
                _ => stats.non_manifold_edges += 1,
            }
        }
        log::debug!(
            "topology rebuilt: {} -> {} vertices, {} edges ({} boundary, {} non-manifold)",
            stats.vertices_before,
            stats.vertices_after,
            stats.edges,
            stats.boundary_edges,
            stats.non_manifold_edges
        );
        stats
    }

    /// Faces sharing the undirected edge `a`-`b`. Empty until [`Mesh::update_topology`] ran.
    pub fn edge_faces(&self, a: VertexId, b: VertexId) -> &[FaceId] {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }
}
