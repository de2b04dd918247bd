use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tessel_grammar::{Filter, Grammar, Tag, select, subdivide_with_rule};
use tessel_mesh::divide::split_grid;
use tessel_mesh::{FaceId, Mesh};

fn squares(mesh: &mut Mesh, sizes: &[f32], tags: &[bool]) -> Vec<FaceId> {
    sizes
        .iter()
        .zip(tags)
        .enumerate()
        .map(|(i, (&s, &is_wall))| {
            let x = 100.0 * i as f32;
            let a = mesh.add_vertex(x, 0.0, 0.0);
            let b = mesh.add_vertex(x + s, 0.0, 0.0);
            let c = mesh.add_vertex(x + s, s, 0.0);
            let d = mesh.add_vertex(x, s, 0.0);
            let f = mesh.add_face(&[a, b, c, d]).unwrap();
            let tag = if is_wall { Tag::Wall } else { Tag::Roof };
            mesh.face_mut(f).unwrap().group = tag.as_str().to_string();
            f
        })
        .collect()
}

fn arb_faces() -> impl Strategy<Value = (Vec<f32>, Vec<bool>)> {
    (0usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(0.5f32..20.0, n),
            prop::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    // Every input face lands in exactly one bucket, order preserved per bucket
    #[test]
    fn partition_is_complete((sizes, tags) in arb_faces(), threshold in 0.0f64..400.0, ratio in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut mesh = Mesh::new();
        let faces = squares(&mut mesh, &sizes, &tags);
        let filter = Filter::new("area", ">=", threshold).unwrap();
        let part = select(&mesh, &faces, &filter, ratio, &mut StdRng::seed_from_u64(seed)).unwrap();

        let mut all: Vec<FaceId> = part.selected.iter()
            .chain(&part.unselected_by_ratio)
            .chain(&part.unselected_by_filter)
            .copied()
            .collect();
        all.sort();
        prop_assert_eq!(&all, &faces);
        for bucket in [&part.selected, &part.unselected_by_ratio, &part.unselected_by_filter] {
            prop_assert!(bucket.windows(2).all(|w| w[0] < w[1]));
        }
        for &f in &part.unselected_by_filter {
            prop_assert!(mesh.face_area(f) < threshold as f32);
        }
    }

    // Ratio boundaries hold for any seed
    #[test]
    fn ratio_bounds((sizes, tags) in arb_faces(), seed in any::<u64>()) {
        let mut mesh = Mesh::new();
        let faces = squares(&mut mesh, &sizes, &tags);
        let filter = Filter::group(Tag::Wall);
        let zero = select(&mesh, &faces, &filter, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(zero.selected.is_empty());
        let one = select(&mesh, &faces, &filter, 1.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(one.unselected_by_ratio.is_empty());
        prop_assert_eq!(one.selected.len(), tags.iter().filter(|&&w| w).count());
    }

    // A subdivision step neither loses nor duplicates leaves
    #[test]
    fn subdivide_replaces_each_selected_face_by_its_children((sizes, tags) in arb_faces(), ratio in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut mesh = Mesh::new();
        let faces = squares(&mut mesh, &sizes, &tags);
        let rule = Grammar::builtin().resolve(Tag::Wall).unwrap();
        let out = subdivide_with_rule(
            &mut mesh,
            &faces,
            &Filter::group(Tag::Wall),
            ratio,
            &mut StdRng::seed_from_u64(seed),
            rule,
            |m, f| split_grid(m, f, 2, 3),
        ).unwrap();

        let originals: Vec<_> = out.iter().copied().filter(|f| faces.contains(f)).collect();
        let new_faces = out.len() - originals.len();
        let divided = faces.len() - originals.len();
        prop_assert_eq!(new_faces, divided * 6);

        let mut uniq = out.clone();
        uniq.sort();
        uniq.dedup();
        prop_assert_eq!(uniq.len(), out.len());

        let total: f32 = out.iter().map(|&f| mesh.face_area(f)).sum();
        let expected: f32 = sizes.iter().map(|s| s * s).sum();
        prop_assert!((total - expected).abs() <= 1e-3 * expected.max(1.0));

        for &f in &out {
            let g = mesh.face(f).unwrap().group.as_str();
            prop_assert!(g == "panel" || g == "facade" || g == "roof");
        }
    }
}
