//! Face divergence (faces to cells).
//!
//! The stencil is the direction-wise [`ddx`] expanded over cells and
//! concatenated column-wise in face order (x block, then y, then z):
//!
//! ```text
//! D = [ D_x | D_y | D_z ]
//! div = diag(1 / V) . D . diag(S)
//! ```

use crate::cache::OperatorKind;
use crate::operators::{axis_name, DiffOperators};
use finvol_core::sparse::{hstack, matmul, sdiag, sdiag_inv};
use finvol_core::stencil::ddx;
use finvol_core::tensor::{directional, Extent};
use finvol_core::{Axis, OperatorError, SparseMatrix};
use finvol_mesh::MeshGeometry;
use std::sync::Arc;

const FACE_DIVERGENCE: [&str; 3] = [
    "face_x_divergence",
    "face_y_divergence",
    "face_z_divergence",
];

impl<M: MeshGeometry> DiffOperators<M> {
    /// Topological divergence of the faces normal to `axis`.
    ///
    /// Shape `(n_cells, n_faces_along(axis))`.
    pub fn face_axis_divergence_stencil(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        self.require_axis(axis, axis_name(axis, FACE_DIVERGENCE))?;
        directional(self.shape(), axis, Extent::Cells, ddx)
    }

    /// Topological face divergence, shape `(n_cells, n_faces)`.
    pub fn face_divergence_stencil(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::FaceDivergenceStencil, || {
            let blocks = self
                .shape()
                .axes()
                .map(|a| self.face_axis_divergence_stencil(a))
                .collect::<Result<Vec<_>, _>>()?;
            hstack(&blocks.iter().collect::<Vec<_>>())
        })
    }

    /// Face divergence, shape `(n_cells, n_faces)`.
    pub fn face_divergence(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::FaceDivergence, || {
            let d = self.face_divergence_stencil()?;
            let v_inv = sdiag_inv(self.mesh().cell_volumes());
            let s = sdiag(self.mesh().face_areas());
            matmul(&matmul(&v_inv, &d)?, &s)
        })
    }

    /// Divergence contribution of the faces normal to `axis`,
    /// shape `(n_cells, n_faces_along(axis))`.
    pub fn face_axis_divergence(&self, axis: Axis) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.require_axis(axis, axis_name(axis, FACE_DIVERGENCE))?;
        self.cached(OperatorKind::FaceAxisDivergence(axis), || {
            let d = self.face_axis_divergence_stencil(axis)?;
            let v_inv = sdiag_inv(self.mesh().cell_volumes());
            let s = sdiag(self.face_areas_along(axis));
            matmul(&matmul(&v_inv, &d)?, &s)
        })
    }
}
