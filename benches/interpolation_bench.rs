//! Benchmarks for interpolation matrix construction and mesh reconstruction.
//!
//! Run with: `cargo bench --bench interpolation_bench`
//!
//! Compares matrix build cost across basis families and the cost of
//! reconstructing a field on the fine mesh as the grid grows.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dg_interp::{
    BasisFamily, BasisSpec, DgInterpolator, FieldDataset, InterpolationConfig,
    InterpolationMatrix, MatrixCache, UniformGrid, interpolate_values,
};
use ndarray::{ArrayD, IxDyn};

/// Deterministic, non-trivial coefficients.
fn coefficients(num_cells: &[usize], num_nodes: usize) -> ArrayD<f64> {
    let mut shape = num_cells.to_vec();
    shape.push(num_nodes);
    let len: usize = shape.iter().product();
    let data = (0..len).map(|i| ((i as f64) * 0.37).sin()).collect();
    ArrayD::from_shape_vec(IxDyn(&shape), data).expect("shape matches length")
}

/// Benchmark matrix construction without caching.
fn bench_matrix_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_build");

    let cases = [
        ("ms_2d_p2", 2, 2, BasisFamily::ModalSerendipity),
        ("ns_2d_p2", 2, 2, BasisFamily::NodalSerendipity),
        ("mo_3d_p3", 3, 3, BasisFamily::ModalMaxOrder),
        ("mt_3d_p2", 3, 2, BasisFamily::TensorProduct),
        ("hyb_1x2v", 3, 1, BasisFamily::Hybrid { config_dims: 1 }),
        ("ms_5d_p1", 5, 1, BasisFamily::ModalSerendipity),
    ];

    for (name, dims, order, family) in cases {
        let spec = BasisSpec::new(dims, order, family).expect("supported basis");
        group.bench_function(name, |b| {
            b.iter(|| InterpolationMatrix::build(black_box(spec)))
        });
    }

    group.finish();
}

/// Benchmark a cache hit against a fresh build.
fn bench_matrix_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_cache");
    let spec = BasisSpec::new(3, 2, BasisFamily::ModalSerendipity).expect("supported basis");
    let cache = MatrixCache::new();
    cache.get(spec).expect("matrix builds");

    group.bench_function("hit", |b| b.iter(|| cache.get(black_box(spec))));
    group.bench_function("miss", |b| {
        b.iter(|| {
            cache.clear();
            cache.get(black_box(spec))
        })
    });

    group.finish();
}

/// Benchmark reconstruction for growing 2D grids.
fn bench_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruction_2d");
    let spec = BasisSpec::new(2, 2, BasisFamily::ModalSerendipity).expect("supported basis");
    let matrix = InterpolationMatrix::build(spec).expect("matrix builds");

    for n in [16, 64, 256] {
        let block = coefficients(&[n, n], spec.num_nodes());
        group.bench_with_input(BenchmarkId::new("ms_p2", n), &block, |b, block| {
            b.iter(|| interpolate_values(&matrix, black_box(block.view())))
        });
    }

    group.finish();
}

/// Benchmark the full extract + reconstruct pipeline on a multi-equation field.
fn bench_project_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_all");

    let grid = UniformGrid::unit(2, 64).expect("valid grid");
    let spec = BasisSpec::new(2, 1, BasisFamily::NodalSerendipity).expect("supported basis");
    // 3 equations
    let data = FieldDataset::new(grid, coefficients(&[64, 64], 3 * spec.num_nodes()))
        .expect("consistent dataset");
    let config = InterpolationConfig::new(spec.family(), spec.poly_order());
    let interp = DgInterpolator::new(&data, &config).expect("interpolator");

    group.bench_function("ns_p1_3eq_64x64", |b| b.iter(|| interp.project_all()));

    group.finish();
}

criterion_group!(
    benches,
    bench_matrix_build,
    bench_matrix_cache,
    bench_reconstruction,
    bench_project_all
);
criterion_main!(benches);
