//! Nodal Laplacian (nodes to nodes).

use crate::cache::OperatorKind;
use crate::operators::{axis_name, DiffOperators};
use finvol_core::sparse::{add, matmul, scale, sdiag_inv, spzeros, SparseMatrix};
use finvol_core::stencil::ddx;
use finvol_core::tensor::{directional, Extent};
use finvol_core::{Axis, OperatorError};
use finvol_mesh::MeshGeometry;
use std::sync::Arc;

impl<M: MeshGeometry> DiffOperators<M> {
    /// Nodal Laplacian with zero-Neumann ends, shape `(n_nodes, n_nodes)`.
    ///
    /// The sum over axes of the 1D second difference
    /// `-diag(1 / h_dual) . D^T . diag(1 / h) . D`, where `h_dual` is the
    /// half-width sum around each node (half a cell at the ends). Each
    /// term is expanded by node identities on the other axes.
    ///
    /// Needs per-axis cell widths; meshes that do not report them get
    /// [`OperatorError::NotImplemented`].
    pub fn nodal_laplacian(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::NodalLaplacian, || {
            let n = self.mesh().n_nodes();
            self.shape().axes().try_fold(spzeros(n, n), |acc, axis| {
                let h = self.mesh().cell_widths(axis).ok_or(OperatorError::NotImplemented {
                    feature: "nodal laplacian on meshes without per-axis cell widths",
                })?;
                let term = directional(self.shape(), axis, Extent::Nodes, |_| {
                    second_difference(h)
                })?;
                add(&acc, &term)
            })
        })
    }

    /// The single-axis contribution to [`nodal_laplacian`](Self::nodal_laplacian).
    pub fn nodal_laplacian_axis(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        self.require_axis(axis, axis_name(axis, NODAL_LAPLACIAN))?;
        let h = self.mesh().cell_widths(axis).ok_or(OperatorError::NotImplemented {
            feature: "nodal laplacian on meshes without per-axis cell widths",
        })?;
        directional(self.shape(), axis, Extent::Nodes, |_| second_difference(h))
    }
}

const NODAL_LAPLACIAN: [&str; 3] = [
    "nodal_laplacian_x",
    "nodal_laplacian_y",
    "nodal_laplacian_z",
];

/// 1D nodal second difference over cells of width `h`.
fn second_difference(h: &[f64]) -> Result<SparseMatrix, OperatorError> {
    let d = ddx(h.len())?;
    let mut dual = vec![0.0; h.len() + 1];
    for (i, w) in h.iter().enumerate() {
        dual[i] += 0.5 * w;
        dual[i + 1] += 0.5 * w;
    }
    let flux = matmul(&sdiag_inv(h), &d)?;
    let dt = d.transpose();
    let l = matmul(&matmul(&sdiag_inv(&dual), &dt)?, &flux)?;
    Ok(scale(&l, -1.0))
}
