use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::MeshResult;
use crate::mesh::{Mesh, WHITE};

impl Mesh {
    /// Writes Wavefront OBJ. Vertex colors come from the first face using each
    /// vertex; faces are grouped with `g <tag>` whenever the tag changes.
    pub fn write_obj<W: Write>(&self, mut w: W) -> MeshResult<()> {
        let mut vcol = vec![None; self.vertices.len()];
        for face in &self.faces {
            for v in &face.vertices {
                vcol[v.index()].get_or_insert(face.color);
            }
        }
        writeln!(w, "# tessel: {} vertices, {} faces", self.vertices.len(), self.faces.len())?;
        for (p, c) in self.vertices.iter().zip(&vcol) {
            let c = c.unwrap_or(WHITE);
            writeln!(w, "v {} {} {} {} {} {}", p.x, p.y, p.z, c[0], c[1], c[2])?;
        }
        let mut current: Option<&str> = None;
        for face in &self.faces {
            if current != Some(face.group.as_str()) {
                let name = if face.group.is_empty() { "default" } else { face.group.as_str() };
                writeln!(w, "g {}", name)?;
                current = Some(face.group.as_str());
            }
            write!(w, "f")?;
            for v in &face.vertices {
                write!(w, " {}", v.0 + 1)?;
            }
            writeln!(w)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn save_obj(&self, path: impl AsRef<Path>) -> MeshResult<()> {
        let file = File::create(path.as_ref())?;
        self.write_obj(BufWriter::new(file))?;
        log::info!("wrote {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[test]
    fn obj_lists_vertices_groups_and_one_based_faces() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(0.0, 0.0, 0.0);
        let b = mesh.add_vertex(1.0, 0.0, 0.0);
        let c = mesh.add_vertex(0.0, 1.0, 0.0);
        let f = mesh.add_face(&[a, b, c]).unwrap();
        mesh.face_mut(f).unwrap().group = "roof".to_string();
        let mut buf = Vec::new();
        mesh.write_obj(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("v 1 0 0 1 1 1"));
        assert!(text.contains("g roof"));
        assert!(text.contains("f 1 2 3"));
    }

    #[test]
    fn save_obj_writes_file_and_reports_bad_path() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(0.0, 0.0, 0.0);
        let b = mesh.add_vertex(1.0, 0.0, 0.0);
        let c = mesh.add_vertex(1.0, 1.0, 0.0);
        let d = mesh.add_vertex(0.0, 1.0, 0.0);
        mesh.add_face(&[a, b, c, d]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        mesh.save_obj(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert!(text.contains("g default"));
        assert!(text.contains("f 1 2 3 4"));

        let missing = dir.path().join("no_such_dir").join("quad.obj");
        assert!(matches!(mesh.save_obj(&missing), Err(MeshError::Io(_))));
    }
}
