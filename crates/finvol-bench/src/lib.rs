//! Benchmark profiles for finvol operator construction.
//!
//! Provides pre-built meshes so that every benchmark measures the same
//! problem sizes:
//!
//! - [`reference_mesh_3d`]: 32 x 32 x 32 uniform cells
//! - [`stretched_mesh_2d`]: 256 x 256 cells, geometrically graded along x
//! - [`line_mesh`]: a long 1D mesh for stencil micro-benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use finvol_mesh::{MeshError, TensorMesh};

/// Grading ratio between neighbouring cells of [`stretched_mesh_2d`].
pub const STRETCH_RATIO: f64 = 1.01;

/// Uniform 32^3 mesh on the unit cube (~33K cells).
pub fn reference_mesh_3d() -> Result<TensorMesh, MeshError> {
    TensorMesh::unit(&[32, 32, 32])
}

/// 256^2 mesh with cell widths growing by [`STRETCH_RATIO`] along x.
pub fn stretched_mesh_2d() -> Result<TensorMesh, MeshError> {
    let hx = graded_widths(256, 0.01, STRETCH_RATIO);
    let hy = vec![1.0 / 256.0; 256];
    TensorMesh::new(vec![hx, hy], &[0.0, 0.0])
}

/// Uniform 1D mesh of `n` cells on `[0, 1]`.
pub fn line_mesh(n: usize) -> Result<TensorMesh, MeshError> {
    TensorMesh::unit(&[n])
}

/// `n` widths starting at `h0`, each `ratio` times the previous.
pub fn graded_widths(n: usize, h0: f64, ratio: f64) -> Vec<f64> {
    std::iter::successors(Some(h0), |h| Some(h * ratio))
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use finvol_mesh::MeshGeometry;

    #[test]
    fn profiles_build() {
        assert_eq!(reference_mesh_3d().unwrap().n_cells(), 32 * 32 * 32);
        assert_eq!(stretched_mesh_2d().unwrap().n_cells(), 256 * 256);
        assert_eq!(line_mesh(10).unwrap().n_faces(), 11);
    }

    #[test]
    fn graded_widths_grow_geometrically() {
        let h = graded_widths(3, 1.0, 2.0);
        assert_eq!(h, vec![1.0, 2.0, 4.0]);
    }
}
