//! Classification strategies: assign child tags to the output of a division.

use std::fmt;
use std::str::FromStr;

use tessel_mesh::{FaceId, Mesh};

use crate::error::{GrammarError, GrammarResult};
use crate::tag::Tag;

/// Faces whose normal z lies within `[-ORIENTATION_DEAD_BAND, ORIENTATION_DEAD_BAND]` count as sides.
pub const ORIENTATION_DEAD_BAND: f32 = 0.1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// One tag for every face.
    Uniform,
    /// `a` for all faces but the last, `b` for the last.
    Index,
    /// `up`, `down` or `side` by normal z.
    Orientation,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Uniform => "group_by_default",
            Strategy::Index => "group_by_index",
            Strategy::Orientation => "group_by_orientation",
        }
    }

    /// Number of tags the strategy consumes.
    pub fn arity(self) -> usize {
        match self {
            Strategy::Uniform => 1,
            Strategy::Index => 2,
            Strategy::Orientation => 3,
        }
    }

    pub fn check_arity(self, tags: &[Tag]) -> GrammarResult<()> {
        if tags.len() == self.arity() {
            Ok(())
        } else {
            Err(GrammarError::config(format!(
                "{} takes {} tag(s), got {}",
                self.name(),
                self.arity(),
                tags.len()
            )))
        }
    }

    /// Tags `faces` in place with `tags`, which must match [`Strategy::arity`].
    pub fn apply(self, mesh: &mut Mesh, faces: &[FaceId], tags: &[Tag]) -> GrammarResult<()> {
        self.check_arity(tags)?;
        match (self, tags) {
            (Strategy::Uniform, &[child]) => group_by_default(mesh, faces, child),
            (Strategy::Index, &[a, b]) => group_by_index(mesh, faces, a, b),
            (Strategy::Orientation, &[up, down, side]) => {
                group_by_orientation(mesh, faces, up, down, side)
            }
            _ => unreachable!("arity checked above"),
        }
        Ok(())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group_by_default" | "uniform" => Ok(Strategy::Uniform),
            "group_by_index" | "index" => Ok(Strategy::Index),
            "group_by_orientation" | "orientation" => Ok(Strategy::Orientation),
            other => Err(GrammarError::config(format!(
                "unknown classification strategy {other:?}"
            ))),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Orientation {
    Up,
    Down,
    Side,
}

impl Orientation {
    /// Bounds are exclusive: exactly ±0.1 is a side.
    #[inline]
    pub fn from_normal_z(nz: f32) -> Orientation {
        if nz > ORIENTATION_DEAD_BAND {
            Orientation::Up
        } else if nz < -ORIENTATION_DEAD_BAND {
            Orientation::Down
        } else {
            Orientation::Side
        }
    }
}

// Panics on a handle from another mesh, like the mesh accessors.
#[inline]
fn set_group(mesh: &mut Mesh, f: FaceId, tag: Tag) {
    let face = &mut mesh.faces[f.index()];
    face.group.clear();
    face.group.push_str(tag.as_str());
}

pub fn group_by_default(mesh: &mut Mesh, faces: &[FaceId], child: Tag) {
    for &f in faces {
        set_group(mesh, f, child);
    }
}

pub fn group_by_index(mesh: &mut Mesh, faces: &[FaceId], child_a: Tag, child_b: Tag) {
    let Some((&last, rest)) = faces.split_last() else {
        log::warn!("group_by_index called with no faces");
        return;
    };
    for &f in rest {
        set_group(mesh, f, child_a);
    }
    set_group(mesh, last, child_b);
}

pub fn group_by_orientation(mesh: &mut Mesh, faces: &[FaceId], up: Tag, down: Tag, side: Tag) {
    for &f in faces {
        let tag = match Orientation::from_normal_z(mesh.face_normal(f).z) {
            Orientation::Up => up,
            Orientation::Down => down,
            Orientation::Side => side,
        };
        set_group(mesh, f, tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(mesh: &mut Mesh, pts: [(f32, f32, f32); 4]) -> FaceId {
        let ids: Vec<_> = pts.iter().map(|&(x, y, z)| mesh.add_vertex(x, y, z)).collect();
        mesh.add_face(&ids).unwrap()
    }

    fn groups(mesh: &Mesh, faces: &[FaceId]) -> Vec<String> {
        faces.iter().map(|&f| mesh.face(f).unwrap().group.clone()).collect()
    }

    fn flat_faces(mesh: &mut Mesh, n: usize) -> Vec<FaceId> {
        (0..n)
            .map(|i| {
                let x = i as f32;
                quad(mesh, [(x, 0.0, 0.0), (x + 1.0, 0.0, 0.0), (x + 1.0, 1.0, 0.0), (x, 1.0, 0.0)])
            })
            .collect()
    }

    #[test]
    fn index_single_face_gets_child_b() {
        let mut mesh = Mesh::new();
        let faces = flat_faces(&mut mesh, 1);
        group_by_index(&mut mesh, &faces, Tag::Road, Tag::ConstructUp);
        assert_eq!(groups(&mesh, &faces), ["construct_up"]);
    }

    #[test]
    fn index_two_faces_in_order() {
        let mut mesh = Mesh::new();
        let faces = flat_faces(&mut mesh, 2);
        group_by_index(&mut mesh, &faces, Tag::Frame, Tag::Glass);
        assert_eq!(groups(&mesh, &faces), ["frame", "glass"]);
    }

    #[test]
    fn index_empty_is_noop() {
        let mut mesh = Mesh::new();
        group_by_index(&mut mesh, &[], Tag::Frame, Tag::Glass);
    }

    #[test]
    fn orientation_dead_band() {
        assert_eq!(Orientation::from_normal_z(0.0), Orientation::Side);
        assert_eq!(Orientation::from_normal_z(0.1000001), Orientation::Up);
        assert_eq!(Orientation::from_normal_z(-0.1000001), Orientation::Down);
        assert_eq!(Orientation::from_normal_z(0.1), Orientation::Side);
        assert_eq!(Orientation::from_normal_z(-0.1), Orientation::Side);
        assert_eq!(Orientation::from_normal_z(1.0), Orientation::Up);
    }

    #[test]
    fn orientation_tags_faces_by_normal() {
        let mut mesh = Mesh::new();
        let up = quad(&mut mesh, [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 1.0), (0.0, 1.0, 1.0)]);
        let down = quad(&mut mesh, [(0.0, 1.0, 0.0), (1.0, 1.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, 0.0)]);
        let side = quad(&mut mesh, [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 0.0, 1.0), (0.0, 0.0, 1.0)]);
        let faces = [side, up, down];
        group_by_orientation(&mut mesh, &faces, Tag::ConstructUp, Tag::ConstructDown, Tag::ConstructSide);
        assert_eq!(groups(&mesh, &faces), ["construct_side", "construct_up", "construct_down"]);
    }

    #[test]
    fn uniform_retagging_is_idempotent() {
        let mut mesh = Mesh::new();
        let faces = flat_faces(&mut mesh, 3);
        group_by_default(&mut mesh, &faces, Tag::Wall);
        let once = groups(&mesh, &faces);
        group_by_default(&mut mesh, &faces, Tag::Wall);
        assert_eq!(groups(&mesh, &faces), once);
        assert!(once.iter().all(|g| g == "wall"));
    }

    #[test]
    fn strategy_names_and_arity() {
        for s in [Strategy::Uniform, Strategy::Index, Strategy::Orientation] {
            assert_eq!(s.name().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!("uniform".parse::<Strategy>().unwrap(), Strategy::Uniform);
        assert!(matches!(
            "group_by_colour".parse::<Strategy>(),
            Err(GrammarError::Configuration(_))
        ));

        let mut mesh = Mesh::new();
        let faces = flat_faces(&mut mesh, 2);
        let err = Strategy::Index.apply(&mut mesh, &faces, &[Tag::Frame]);
        assert!(matches!(err, Err(GrammarError::Configuration(_))));
        assert_eq!(groups(&mesh, &faces), ["", ""]);
        Strategy::Index
            .apply(&mut mesh, &faces, &[Tag::Frame, Tag::Glass])
            .unwrap();
        assert_eq!(groups(&mesh, &faces), ["frame", "glass"]);
    }
}
