use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tessel_mesh::color::color_faces_by_values;
use tessel_mesh::{FaceId, Mesh};

use crate::error::{GrammarError, GrammarResult};

/// The grammar's tag alphabet. Discriminants are the stable ordinals used for
/// coloring; ordinal 0 is reserved for untagged faces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Tag {
    Block = 1,
    BlockS,
    BlockSs,
    BlockSss,
    Plaza,
    Plot,
    Road,
    ConstructUp,
    ConstructSide,
    ConstructDown,
    Roof,
    RoofS,
    RoofF,
    Wall,
    Panel,
    Facade,
    Frame,
    Glass,
    Brick,
}

impl Tag {
    /// Every tag in ordinal order.
    pub const ALL: [Tag; 19] = [
        Tag::Block,
        Tag::BlockS,
        Tag::BlockSs,
        Tag::BlockSss,
        Tag::Plaza,
        Tag::Plot,
        Tag::Road,
        Tag::ConstructUp,
        Tag::ConstructSide,
        Tag::ConstructDown,
        Tag::Roof,
        Tag::RoofS,
        Tag::RoofF,
        Tag::Wall,
        Tag::Panel,
        Tag::Facade,
        Tag::Frame,
        Tag::Glass,
        Tag::Brick,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Block => "block",
            Tag::BlockS => "block_s",
            Tag::BlockSs => "block_ss",
            Tag::BlockSss => "block_sss",
            Tag::Plaza => "plaza",
            Tag::Plot => "plot",
            Tag::Road => "road",
            Tag::ConstructUp => "construct_up",
            Tag::ConstructSide => "construct_side",
            Tag::ConstructDown => "construct_down",
            Tag::Roof => "roof",
            Tag::RoofS => "roof_s",
            Tag::RoofF => "roof_f",
            Tag::Wall => "wall",
            Tag::Panel => "panel",
            Tag::Facade => "facade",
            Tag::Frame => "frame",
            Tag::Glass => "glass",
            Tag::Brick => "brick",
        }
    }

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Ordinal of a face group string: 0 for an empty group, `None` for an unknown tag.
    pub fn ordinal_of_group(group: &str) -> Option<usize> {
        if group.is_empty() {
            return Some(0);
        }
        group.parse::<Tag>().ok().map(Tag::ordinal)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GrammarError::config(format!("unknown tag {s:?}")))
    }
}

/// Colors faces along the hue gradient by tag ordinal.
pub fn color_by_group(mesh: &mut Mesh, faces: &[FaceId]) -> GrammarResult<()> {
    let mut values = Vec::with_capacity(faces.len());
    for &f in faces {
        let group = &mesh.face(f).ok_or_else(|| GrammarError::config(format!("unknown face {f}")))?.group;
        let ord = Tag::ordinal_of_group(group)
            .ok_or_else(|| GrammarError::config(format!("face {f} has unknown tag {group:?}")))?;
        values.push(ord as f32);
    }
    color_faces_by_values(mesh, faces, &values)?;
    Ok(())
}

/// Face count per group string, sorted by group name.
pub fn tag_histogram(mesh: &Mesh, faces: &[FaceId]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for f in faces.iter().filter_map(|&f| mesh.face(f)) {
        *out.entry(f.group.clone()).or_insert(0) += 1;
    }
    out
}
