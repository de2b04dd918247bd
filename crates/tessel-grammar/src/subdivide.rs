use rand::Rng;
use tessel_mesh::{FaceId, Mesh, MeshResult};

use crate::error::{GrammarError, GrammarResult};
use crate::filter::FacePredicate;
use crate::rules::Rule;
use crate::select::select;

/// Runs one grammar generation over `faces`.
///
/// Selected faces are replaced by the children `divide` returns for them; faces that
/// passed the filter but lost the draw are handed to `classify` together with the
/// per-parent children. The result is `children ++ undivided ++ unselected`, each
/// part in input order.
///
/// On failure the mesh is rolled back to its state before the call, so no child
/// face from this step survives.
pub fn subdivide<P, R, D, C>(
    mesh: &mut Mesh,
    faces: &[FaceId],
    filter: &P,
    ratio: f64,
    rng: &mut R,
    mut divide: D,
    classify: C,
) -> GrammarResult<Vec<FaceId>>
where
    P: FacePredicate + ?Sized,
    R: Rng,
    D: FnMut(&mut Mesh, FaceId) -> MeshResult<Vec<FaceId>>,
    C: FnOnce(&mut Mesh, &[Vec<FaceId>], &[FaceId]) -> GrammarResult<()>,
{
    let part = select(mesh, faces, filter, ratio, rng)?;
    let mark = mesh.checkpoint();

    let mut children = Vec::with_capacity(part.selected.len());
    for &f in &part.selected {
        match divide(mesh, f) {
            Ok(kids) => children.push(kids),
            Err(source) => {
                mesh.rollback(mark);
                log::warn!("division of {f} failed, step discarded: {source}");
                return Err(GrammarError::DivisionFailure { face: f, source });
            }
        }
    }

    if let Err(e) = classify(mesh, &children, &part.unselected_by_ratio) {
        mesh.rollback(mark);
        return Err(e);
    }

    let n_children: usize = children.iter().map(Vec::len).sum();
    log::debug!(
        "subdivide: {} divided into {} children, {} undivided, {} unselected",
        part.selected.len(),
        n_children,
        part.unselected_by_ratio.len(),
        part.unselected_by_filter.len()
    );

    let mut out = Vec::with_capacity(
        n_children + part.unselected_by_ratio.len() + part.unselected_by_filter.len(),
    );
    out.extend(children.into_iter().flatten());
    out.extend(part.unselected_by_ratio);
    out.extend(part.unselected_by_filter);
    Ok(out)
}

/// [`subdivide`] classified by `rule`: children get the rule's strategy and
/// `divide_to` tags, undivided faces its terminal tag.
pub fn subdivide_with_rule<P, R, D>(
    mesh: &mut Mesh,
    faces: &[FaceId],
    filter: &P,
    ratio: f64,
    rng: &mut R,
    rule: &Rule,
    divide: D,
) -> GrammarResult<Vec<FaceId>>
where
    P: FacePredicate + ?Sized,
    R: Rng,
    D: FnMut(&mut Mesh, FaceId) -> MeshResult<Vec<FaceId>>,
{
    rule.group_children.check_arity(&rule.divide_to)?;
    subdivide(mesh, faces, filter, ratio, rng, divide, rule.classifier())
}
