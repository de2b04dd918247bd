use proptest::prelude::*;
use tessel_voxel::field::{colors_from_values, noise, sinusoids, threshold};
use tessel_voxel::{Grid, count_exposed_faces, extract_boundary, extract_boundary_par};

fn occupancy() -> impl Strategy<Value = Grid<bool>> {
    (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(nx, ny, nz)| {
        prop::collection::vec(any::<bool>(), nx * ny * nz)
            .prop_map(move |data| Grid::from_vec(nx, ny, nz, data).unwrap())
    })
}

proptest! {
    #[test]
    fn parallel_matches_serial(solid in occupancy()) {
        let colors = Grid::from_fn(solid.nx, solid.ny, solid.nz, |x, y, z| {
            [x as f32 / 8.0, y as f32 / 8.0, z as f32 / 8.0]
        });
        let a = extract_boundary(&solid, &colors).unwrap();
        let b = extract_boundary_par(&solid, &colors).unwrap();
        prop_assert_eq!(&a.vertices, &b.vertices);
        prop_assert_eq!(&a.faces, &b.faces);
        prop_assert_eq!(a.face_count(), count_exposed_faces(&solid));
        prop_assert_eq!(a.vertex_count(), 4 * a.face_count());
    }

    #[test]
    fn welded_boundary_is_closed(solid in occupancy()) {
        let colors = Grid::new(solid.nx, solid.ny, solid.nz, [1.0, 1.0, 1.0]);
        let mut mesh = extract_boundary(&solid, &colors).unwrap();
        let stats = mesh.update_topology();
        prop_assert_eq!(stats.boundary_edges, 0);
    }
}

#[test]
fn sinusoid_field_round_trip() {
    let field = sinusoids((10, 10, 10), 0.6, 0.6, 0.6);
    let solid = threshold(&field, 0.1);
    let colors = colors_from_values(&field, -1.0, 1.0, 0.0, 0.66);
    let mesh = extract_boundary_par(&solid, &colors).unwrap();
    assert_eq!(mesh.face_count(), count_exposed_faces(&solid));
    assert!(mesh.face_count() > 0);
    for f in mesh.face_ids() {
        assert!((mesh.face_area(f) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn noise_field_extracts() {
    let field = noise((12, 12, 12), 1337, 0.15);
    let solid = threshold(&field, 0.0);
    let colors = colors_from_values(&field, -1.0, 1.0, 0.0, 0.66);
    let serial = extract_boundary(&solid, &colors).unwrap();
    let parallel = extract_boundary_par(&solid, &colors).unwrap();
    assert_eq!(serial.faces, parallel.faces);
}
