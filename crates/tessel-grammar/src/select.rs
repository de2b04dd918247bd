use rand::Rng;
use tessel_mesh::{FaceId, Mesh};

use crate::error::{GrammarError, GrammarResult};
use crate::filter::FacePredicate;

/// Three disjoint buckets; each keeps the input order of its faces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub selected: Vec<FaceId>,
    pub unselected_by_ratio: Vec<FaceId>,
    pub unselected_by_filter: Vec<FaceId>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.selected.len() + self.unselected_by_ratio.len() + self.unselected_by_filter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn check_ratio(ratio: f64) -> GrammarResult<()> {
    if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(GrammarError::config(format!(
            "selection ratio must lie in [0, 1], got {ratio}"
        )))
    }
}

/// Splits `faces` into selected / rejected-by-ratio / rejected-by-filter.
///
/// Each face passing the filter gets one independent uniform draw in `[0, 1)` and
/// is selected when the draw is below `ratio`. Faces failing the filter consume no
/// draw.
pub fn select<P, R>(
    mesh: &Mesh,
    faces: &[FaceId],
    filter: &P,
    ratio: f64,
    rng: &mut R,
) -> GrammarResult<Partition>
where
    P: FacePredicate + ?Sized,
    R: Rng,
{
    check_ratio(ratio)?;
    let mut part = Partition::default();
    for &f in faces {
        if !filter.test(mesh, f) {
            part.unselected_by_filter.push(f);
        } else if rng.random::<f64>() < ratio {
            part.selected.push(f);
        } else {
            part.unselected_by_ratio.push(f);
        }
    }
    Ok(part)
}
