//! Criterion micro-benchmarks for 1D stencils, Kronecker assembly and
//! operator application.

use criterion::{criterion_group, criterion_main, Criterion};
use finvol_bench::{line_mesh, reference_mesh_3d};
use finvol_core::sparse::{kron3, mul_vec, speye};
use finvol_core::stencil::{av_extrap, ddx};
use finvol_mesh::MeshGeometry;
use finvol_ops::DiffOperators;
use nalgebra::DVector;
use std::hint::black_box;

/// Benchmark: 1D difference and extrapolating average on 100K cells.
fn bench_stencils_1d(c: &mut Criterion) {
    c.bench_function("ddx_100k", |b| {
        b.iter(|| black_box(ddx(black_box(100_000)).unwrap()));
    });
    c.bench_function("av_extrap_100k", |b| {
        b.iter(|| black_box(av_extrap(black_box(100_000)).unwrap()));
    });
}

/// Benchmark: expand a 1D stencil to a 3D directional operator.
fn bench_kron3_expand(c: &mut Criterion) {
    let d = ddx(64).unwrap();
    let (iy, iz) = (speye(64), speye(64));

    c.bench_function("kron3_ddx_64cubed", |b| {
        b.iter(|| black_box(kron3(&iz, &iy, &d)));
    });
}

/// Benchmark: apply the 3D face divergence to a face field.
fn bench_apply_divergence(c: &mut Criterion) {
    let ops = DiffOperators::new(reference_mesh_3d().unwrap()).unwrap();
    let div = ops.face_divergence().unwrap();
    let w = DVector::from_fn(ops.mesh().n_faces(), |i, _| (i as f64).sin());

    c.bench_function("apply_face_divergence_32cubed", |b| {
        b.iter(|| black_box(mul_vec(&div, &w).unwrap()));
    });
}

/// Benchmark: full nodal Laplacian on a long line.
fn bench_nodal_laplacian_1d(c: &mut Criterion) {
    let mesh = line_mesh(100_000).unwrap();

    c.bench_function("nodal_laplacian_line_100k", |b| {
        b.iter(|| {
            let ops = DiffOperators::new(mesh.clone()).unwrap();
            black_box(ops.nodal_laplacian().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_stencils_1d,
    bench_kron3_expand,
    bench_apply_divergence,
    bench_nodal_laplacian_1d
);
criterion_main!(benches);
