use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tessel_voxel::field::{colors_from_values, noise, threshold};
use tessel_voxel::{extract_boundary, extract_boundary_par};

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_boundary");
    let field = noise((64, 64, 64), 1337, 0.05);
    let solid = threshold(&field, 0.0);
    let colors = colors_from_values(&field, -1.0, 1.0, 0.0, 0.66);
    group.bench_function("serial_64", |b| {
        b.iter(|| black_box(extract_boundary(&solid, &colors).unwrap()))
    });
    group.bench_function("parallel_64", |b| {
        b.iter(|| black_box(extract_boundary_par(&solid, &colors).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
