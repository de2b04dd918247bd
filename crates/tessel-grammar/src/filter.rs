//! Selection predicates over faces.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tessel_mesh::{FaceId, Mesh};

use crate::error::{GrammarError, GrammarResult};
use crate::tag::Tag;

/// Anything that can decide whether a face takes part in a subdivision step.
pub trait FacePredicate {
    fn test(&self, mesh: &Mesh, f: FaceId) -> bool;
}

impl<F> FacePredicate for F
where
    F: Fn(&Mesh, FaceId) -> bool,
{
    #[inline]
    fn test(&self, mesh: &Mesh, f: FaceId) -> bool {
        self(mesh, f)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Relation {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl Relation {
    #[inline]
    pub fn compare(self, lhs: f32, rhs: f32) -> bool {
        match self {
            Relation::Gt => lhs > rhs,
            Relation::Lt => lhs < rhs,
            Relation::Ge => lhs >= rhs,
            Relation::Le => lhs <= rhs,
            Relation::Eq => lhs == rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Gt => ">",
            Relation::Lt => "<",
            Relation::Ge => ">=",
            Relation::Le => "<=",
            Relation::Eq => "==",
        }
    }
}

impl FromStr for Relation {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Relation::Gt),
            "<" => Ok(Relation::Lt),
            ">=" => Ok(Relation::Ge),
            "<=" => Ok(Relation::Le),
            "==" => Ok(Relation::Eq),
            other => Err(GrammarError::config(format!(
                "unknown relational operator {other:?}"
            ))),
        }
    }
}

/// Numeric face attributes a filter can compare.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Attribute {
    Area,
    Perimeter,
    Compactness,
    CenterZ,
    NormalZ,
    VertexCount,
}

impl Attribute {
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Area => "area",
            Attribute::Perimeter => "perimeter",
            Attribute::Compactness => "compactness",
            Attribute::CenterZ => "center_z",
            Attribute::NormalZ => "normal_z",
            Attribute::VertexCount => "vertex_count",
        }
    }

    /// Measured in the mesh's own f32 precision.
    pub fn measure(self, mesh: &Mesh, f: FaceId) -> f32 {
        match self {
            Attribute::Area => mesh.face_area(f),
            Attribute::Perimeter => mesh.face_perimeter(f),
            Attribute::Compactness => mesh.face_compactness(f),
            Attribute::CenterZ => mesh.face_center(f).z,
            Attribute::NormalZ => mesh.face_normal(f).z,
            Attribute::VertexCount => mesh.faces[f.index()].len() as f32,
        }
    }
}

impl FromStr for Attribute {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "area" => Attribute::Area,
            "perimeter" => Attribute::Perimeter,
            "compactness" => Attribute::Compactness,
            "center_z" => Attribute::CenterZ,
            "normal_z" => Attribute::NormalZ,
            "vertex_count" => Attribute::VertexCount,
            other => {
                return Err(GrammarError::config(format!(
                    "unknown face attribute {other:?}"
                )));
            }
        })
    }
}

/// Right-hand side of a filter as it appears in configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Number(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<Tag> for FilterValue {
    fn from(v: Tag) -> Self {
        FilterValue::Text(v.as_str().to_string())
    }
}

/// A predicate built from `(attribute, operator, value)`.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Numeric {
        attribute: Attribute,
        relation: Relation,
        /// Narrowed once to f32 so a face stored at the threshold compares equal.
        threshold: f32,
    },
    /// `group == tag`; the only relation accepted for the `group` attribute.
    Group(Tag),
}

impl Filter {
    pub fn new(
        attribute: &str,
        relation: &str,
        value: impl Into<FilterValue>,
    ) -> GrammarResult<Filter> {
        let relation: Relation = relation.parse()?;
        let value = value.into();
        if attribute == "group" {
            if relation != Relation::Eq {
                return Err(GrammarError::config(format!(
                    "group filters only support ==, got {}",
                    relation.symbol()
                )));
            }
            return match value {
                FilterValue::Text(s) => Ok(Filter::Group(s.parse()?)),
                FilterValue::Number(n) => Err(GrammarError::config(format!(
                    "group filter needs a tag, got {n}"
                ))),
            };
        }
        let attribute: Attribute = attribute.parse()?;
        let threshold = match value {
            FilterValue::Number(n) => n as f32,
            FilterValue::Text(s) => s.trim().parse::<f32>().map_err(|_| {
                GrammarError::config(format!(
                    "{} filter needs a number, got {s:?}",
                    attribute.name()
                ))
            })?,
        };
        Ok(Filter::Numeric {
            attribute,
            relation,
            threshold,
        })
    }

    #[inline]
    pub fn group(tag: Tag) -> Filter {
        Filter::Group(tag)
    }
}

impl FacePredicate for Filter {
    fn test(&self, mesh: &Mesh, f: FaceId) -> bool {
        match self {
            Filter::Numeric {
                attribute,
                relation,
                threshold,
            } => relation.compare(attribute.measure(mesh, f), *threshold),
            Filter::Group(tag) => mesh
                .face(f)
                .is_some_and(|face| face.group == tag.as_str()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Numeric {
                attribute,
                relation,
                threshold,
            } => write!(f, "{} {} {}", attribute.name(), relation.symbol(), threshold),
            Filter::Group(tag) => write!(f, "group == {tag}"),
        }
    }
}
