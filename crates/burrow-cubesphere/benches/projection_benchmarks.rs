use burrow_cubesphere::*;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_raw_projections(c: &mut Criterion) {
    for mode in [Projection::Gnomonic, Projection::Equiangular, Projection::Spherify] {
        c.bench_function(&format!("raw_{mode:?}").to_lowercase(), |bencher| {
            bencher.iter(|| black_box(mode.direction(black_box(CubeFace::PosX), black_box(0.6), black_box(-0.3))))
        });
    }
}

fn bench_project_direction_default(c: &mut Criterion) {
    let grid = SphereGrid::default();
    c.bench_function("project_direction_default", |bencher| {
        bencher.iter(|| black_box(grid.project_direction(CubeFace::NegZ, black_box(0.8), black_box(0.7))))
    });
}

fn bench_project_direction_no_uniformize(c: &mut Criterion) {
    let grid = SphereGrid::new(
        glam::DVec3::ZERO,
        GridSettings {
            uniform_corners: 0.0,
            ..Default::default()
        },
    );
    c.bench_function("project_direction_no_uniformize", |bencher| {
        bencher.iter(|| black_box(grid.project_direction(CubeFace::NegZ, black_box(0.8), black_box(0.7))))
    });
}

fn bench_step_across_seam(c: &mut Criterion) {
    let grid = SphereGrid::default();
    let cell = CellAddress::new(CubeFace::PosZ, 0, 31);
    c.bench_function("step_across_seam", |bencher| {
        bencher.iter(|| black_box(grid.step(black_box(cell), -1, 0)))
    });
}

fn bench_face_polyline(c: &mut Criterion) {
    let grid = SphereGrid::default();
    c.bench_function("edge_polyline_96", |bencher| {
        bencher.iter(|| black_box(grid.edge_polyline(CubeFace::PosY, true, black_box(17), 96)))
    });
}

criterion_group!(
    benches,
    bench_raw_projections,
    bench_project_direction_default,
    bench_project_direction_no_uniformize,
    bench_step_across_seam,
    bench_face_polyline,
);
criterion_main!(benches);
