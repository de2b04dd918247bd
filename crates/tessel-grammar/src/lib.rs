//! Shape-grammar subdivision over tagged faces.
//!
//! A single [`subdivide`] call is one generation: faces matching a [`Filter`] are
//! divided with probability `ratio`, the children are tagged by a classification
//! [`Strategy`], and the new flat face sequence is returned. Chaining generations
//! is left to the caller.
#![forbid(unsafe_code)]

pub mod classify;
mod error;
pub mod filter;
mod rules;
mod select;
mod subdivide;
mod tag;

pub use classify::{
    Orientation, Strategy, group_by_default, group_by_index, group_by_orientation,
};
pub use error::{GrammarError, GrammarResult};
pub use filter::{Attribute, FacePredicate, Filter, FilterValue, Relation};
pub use rules::{Grammar, Rule};
pub use select::{Partition, select};
pub use subdivide::{subdivide, subdivide_with_rule};
pub use tag::{Tag, color_by_group, tag_histogram};
