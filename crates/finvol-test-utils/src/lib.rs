//! Test fixtures and matrix assertions for finvol development.
//!
//! Meshes and fields come from a seeded ChaCha8 RNG so every failing case
//! can be reproduced from its seed.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use finvol_core::SparseMatrix;
use finvol_mesh::TensorMesh;
use nalgebra::{DMatrix, DVector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Smallest and largest cell width produced by [`random_mesh`].
pub const WIDTH_RANGE: (f64, f64) = (0.25, 2.0);

/// Nonuniform tensor mesh with random widths and a random origin.
pub fn random_mesh(seed: u64, cells: &[usize]) -> TensorMesh {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let widths = cells
        .iter()
        .map(|&n| {
            (0..n)
                .map(|_| rng.random_range(WIDTH_RANGE.0..WIDTH_RANGE.1))
                .collect()
        })
        .collect();
    let origin: Vec<f64> = cells.iter().map(|_| rng.random_range(-1.0..1.0)).collect();
    TensorMesh::new(widths, &origin).expect("random widths are positive")
}

/// Field of `n` values drawn uniformly from `[-1, 1)`.
pub fn random_field(seed: u64, n: usize) -> DVector<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DVector::from_fn(n, |_, _| rng.random_range(-1.0..1.0))
}

/// Dense copy of a sparse matrix.
pub fn dense(m: &SparseMatrix) -> DMatrix<f64> {
    DMatrix::from(m)
}

/// Panics unless `a` and `b` have equal shape and agree entrywise within `tol`.
#[track_caller]
pub fn assert_matrix_close(a: &DMatrix<f64>, b: &DMatrix<f64>, tol: f64) {
    assert_eq!(a.shape(), b.shape(), "shape mismatch");
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            let (x, y) = (a[(i, j)], b[(i, j)]);
            assert!((x - y).abs() <= tol, "entry ({i}, {j}): {x} vs {y}");
        }
    }
}

/// Panics unless `a` and `b` have equal length and agree within `tol`.
#[track_caller]
pub fn assert_vector_close(a: &DVector<f64>, b: &DVector<f64>, tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!((x - y).abs() <= tol, "entry {i}: {x} vs {y}");
    }
}

/// Panics unless every entry of `v` is within `tol` of zero.
#[track_caller]
pub fn assert_near_zero(v: &DVector<f64>, tol: f64) {
    let worst = v.amax();
    assert!(worst <= tol, "max |entry| = {worst}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use finvol_mesh::MeshGeometry;

    #[test]
    fn random_mesh_is_reproducible() {
        let a = random_mesh(7, &[3, 2]);
        let b = random_mesh(7, &[3, 2]);
        assert_eq!(a.cell_volumes(), b.cell_volumes());
        assert_ne!(a.cell_volumes(), random_mesh(8, &[3, 2]).cell_volumes());
    }

    #[test]
    fn random_widths_stay_in_range() {
        let mesh = random_mesh(1, &[50]);
        let h = mesh.cell_widths(finvol_core::Axis::X).unwrap();
        assert!(h.iter().all(|w| (WIDTH_RANGE.0..WIDTH_RANGE.1).contains(w)));
    }
}
