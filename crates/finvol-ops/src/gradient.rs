//! Nodal gradient (nodes to edges) and cell-centered gradient (cells to faces).
//!
//! Both are vertical stacks of direction-wise stencils. The nodal
//! gradient uses the plain [`ddx`] expanded over nodes; the cell gradient
//! uses the ghost-point stencil [`ddx_cell_grad`] under the configured
//! [`CellGradientBc`](crate::CellGradientBc).
//!
//! ```text
//! grad_n = diag(1 / L) . [G_x; G_y; G_z]
//! grad_c = diag(S / (A_cf . V)) . [G_x; G_y; G_z]
//! ```
//!
//! `A_cf` is the cell-to-face average, so each face is scaled by the
//! mean volume of the two cells it separates.

use crate::cache::OperatorKind;
use crate::operators::{axis_name, DiffOperators};
use finvol_core::boundary::{ddx_cell_grad, ddx_cell_grad_bc};
use finvol_core::sparse::{block_diag, matmul, mul_vec, sdiag, sdiag_inv, vstack};
use finvol_core::stencil::{av_extrap, ddx};
use finvol_core::tensor::{directional, Extent};
use finvol_core::{Axis, AxisBc, OperatorError, SparseMatrix};
use finvol_mesh::MeshGeometry;
use nalgebra::DVector;
use std::sync::Arc;

const NODAL_GRADIENT: [&str; 3] = [
    "nodal_gradient_x",
    "nodal_gradient_y",
    "nodal_gradient_z",
];

const CELL_GRADIENT: [&str; 3] = ["cell_gradient_x", "cell_gradient_y", "cell_gradient_z"];

impl<M: MeshGeometry> DiffOperators<M> {
    /// Topological gradient along `axis`, from nodes to the edges
    /// parallel to `axis`.
    pub fn nodal_gradient_axis_stencil(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        self.require_axis(axis, axis_name(axis, NODAL_GRADIENT))?;
        directional(self.shape(), axis, Extent::Nodes, ddx)
    }

    /// Topological nodal gradient, shape `(n_edges, n_nodes)`.
    pub fn nodal_gradient_stencil(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::NodalGradientStencil, || {
            let blocks = self
                .shape()
                .axes()
                .map(|a| self.nodal_gradient_axis_stencil(a))
                .collect::<Result<Vec<_>, _>>()?;
            vstack(&blocks.iter().collect::<Vec<_>>())
        })
    }

    /// Nodal gradient, shape `(n_edges, n_nodes)`.
    pub fn nodal_gradient(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::NodalGradient, || {
            let g = self.nodal_gradient_stencil()?;
            matmul(&sdiag_inv(self.mesh().edge_lengths()), &g)
        })
    }

    /// Ghost-point gradient stencil along `axis` with explicit end conditions.
    fn cell_gradient_axis_stencil_with(
        &self,
        axis: Axis,
        bc: AxisBc,
    ) -> Result<SparseMatrix, OperatorError> {
        self.require_axis(axis, axis_name(axis, CELL_GRADIENT))?;
        directional(self.shape(), axis, Extent::Cells, |n| ddx_cell_grad(n, bc))
    }

    /// Topological cell gradient along `axis` with Neumann ends,
    /// shape `(n_faces_along(axis), n_cells)`.
    pub fn cell_gradient_axis_stencil(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        self.cell_gradient_axis_stencil_with(axis, AxisBc::default())
    }

    /// Topological cell gradient under the configured BC,
    /// shape `(n_faces, n_cells)`.
    pub fn cell_gradient_stencil(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::CellGradientStencil, || {
            let bc = self.cell_gradient_bc_config();
            let blocks = self
                .shape()
                .axes()
                .zip(bc.axes())
                .map(|(a, &axis_bc)| self.cell_gradient_axis_stencil_with(a, axis_bc))
                .collect::<Result<Vec<_>, _>>()?;
            vstack(&blocks.iter().collect::<Vec<_>>())
        })
    }

    /// Cell-centered gradient under the configured BC,
    /// shape `(n_faces, n_cells)`.
    pub fn cell_gradient(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::CellGradient, || {
            let g = self.cell_gradient_stencil()?;
            let scale = self.face_over_volume()?;
            matmul(&sdiag(scale.as_slice()), &g)
        })
    }

    /// Cell-centered gradient along `axis` with Neumann ends,
    /// shape `(n_faces_along(axis), n_cells)`.
    pub fn cell_gradient_axis(&self, axis: Axis) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.require_axis(axis, axis_name(axis, CELL_GRADIENT))?;
        self.cached(OperatorKind::CellGradientAxis(axis), || {
            let g = self.cell_gradient_axis_stencil(axis)?;
            let scale = self.face_over_volume()?;
            let off = self.shape().face_offset(axis);
            let n = self.shape().n_faces_along(axis);
            matmul(&sdiag(&scale.as_slice()[off..off + n]), &g)
        })
    }

    /// Boundary-value companion of the cell gradient.
    ///
    /// Maps the two end values of every grid line (lower, upper, for each
    /// line in x-fastest order, axis blocks x then y then z) onto faces.
    /// Dirichlet ends carry `-2` / `+2` before geometric scaling, Neumann
    /// ends carry nothing.
    pub fn cell_gradient_bc(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::CellGradientBc, || {
            let bc = self.cell_gradient_bc_config();
            let blocks = self
                .shape()
                .axes()
                .zip(bc.axes())
                .map(|(a, &axis_bc)| {
                    directional(self.shape(), a, Extent::Cells, |n| ddx_cell_grad_bc(n, axis_bc))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let g = block_diag(&blocks.iter().collect::<Vec<_>>());
            let scale = self.face_over_volume()?;
            matmul(&sdiag(scale.as_slice()), &g)
        })
    }

    /// `S / (A_cf . V)` on every face.
    fn face_over_volume(&self) -> Result<DVector<f64>, OperatorError> {
        let blocks = self
            .shape()
            .axes()
            .map(|a| directional(self.shape(), a, Extent::Cells, av_extrap))
            .collect::<Result<Vec<_>, _>>()?;
        let ave = vstack(&blocks.iter().collect::<Vec<_>>())?;
        let v_face = mul_vec(&ave, &DVector::from_column_slice(self.mesh().cell_volumes()))?;
        let s = self.mesh().face_areas();
        Ok(DVector::from_iterator(
            s.len(),
            s.iter().zip(v_face.iter()).map(|(a, v)| a / v),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CellGradientBc;
    use finvol_mesh::TensorMesh;
    use nalgebra::DMatrix;

    fn ops_1d(n: usize) -> DiffOperators<TensorMesh> {
        DiffOperators::new(TensorMesh::uniform(&[n], 1.0).unwrap()).unwrap()
    }

    #[test]
    fn nodal_gradient_of_linear_field_is_constant() {
        let mesh = TensorMesh::new(vec![vec![0.5, 1.0, 2.0], vec![1.0, 0.25]], &[0.0, 0.0]).unwrap();
        let ops = DiffOperators::new(mesh).unwrap();
        let g = DMatrix::from(&*ops.nodal_gradient().unwrap());
        let phi = DVector::from_iterator(
            ops.mesh().n_nodes(),
            ops.mesh().nodes().iter().map(|p| 3.0 * p.x - 2.0 * p.y),
        );
        let grad = g * phi;
        let nex = ops.shape().n_edges_along(Axis::X);
        for (i, v) in grad.iter().enumerate() {
            let expected = if i < nex { 3.0 } else { -2.0 };
            assert!((v - expected).abs() < 1e-12, "edge {i}: {v}");
        }
    }

    #[test]
    fn nodal_gradient_shape_3d() {
        let ops = DiffOperators::new(TensorMesh::unit(&[2, 3, 4]).unwrap()).unwrap();
        let g = ops.nodal_gradient().unwrap();
        assert_eq!(g.nrows(), ops.mesh().n_edges());
        assert_eq!(g.ncols(), 3 * 4 * 5);
    }

    #[test]
    fn dirichlet_first_row_is_two() {
        let mut ops = ops_1d(4);
        ops.set_cell_gradient_bc(CellGradientBc::dirichlet(1).unwrap())
            .unwrap();
        let g = DMatrix::from(&*ops.cell_gradient_stencil().unwrap());
        assert_eq!(g.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 0.0, 0.0, 0.0]);
        assert_eq!(g.row(4).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, -2.0]);
        // end faces take the volume of the single adjacent cell
        let scaled = DMatrix::from(&*ops.cell_gradient().unwrap());
        assert_eq!(scaled[(0, 0)], 2.0);
    }

    #[test]
    fn neumann_boundary_rows_vanish() {
        let ops = ops_1d(4);
        let g = DMatrix::from(&*ops.cell_gradient().unwrap());
        assert!(g.row(0).iter().all(|v| *v == 0.0));
        assert!(g.row(4).iter().all(|v| *v == 0.0));
        assert_eq!(g[(1, 0)], -1.0);
        assert_eq!(g[(1, 1)], 1.0);
    }

    #[test]
    fn interior_rows_scale_by_mean_volume() {
        let mesh = TensorMesh::new(vec![vec![1.0, 3.0]], &[0.0]).unwrap();
        let ops = DiffOperators::new(mesh).unwrap();
        let g = DMatrix::from(&*ops.cell_gradient().unwrap());
        assert_eq!(g[(1, 0)], -0.5);
        assert_eq!(g[(1, 1)], 0.5);
    }

    #[test]
    fn axis_gradient_matches_neumann_block() {
        let ops = DiffOperators::new(TensorMesh::unit(&[3, 2]).unwrap()).unwrap();
        let full = DMatrix::from(&*ops.cell_gradient().unwrap());
        let gy = DMatrix::from(&*ops.cell_gradient_axis(Axis::Y).unwrap());
        let off = ops.shape().face_offset(Axis::Y);
        assert_eq!(full.rows(off, gy.nrows()).into_owned(), gy);
    }

    #[test]
    fn axis_gradient_ignores_configured_bc() {
        let mut ops = DiffOperators::new(TensorMesh::unit(&[3, 2]).unwrap()).unwrap();
        ops.set_cell_gradient_bc(CellGradientBc::dirichlet(2).unwrap())
            .unwrap();
        let gx = DMatrix::from(&*ops.cell_gradient_axis(Axis::X).unwrap());
        assert!(gx.row(0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn bc_companion_signs_and_shape() {
        let mut ops = DiffOperators::new(TensorMesh::uniform(&[3, 2], 1.0).unwrap()).unwrap();
        ops.set_cell_gradient_bc(CellGradientBc::dirichlet(2).unwrap())
            .unwrap();
        let b = DMatrix::from(&*ops.cell_gradient_bc().unwrap());
        assert_eq!(b.nrows(), ops.mesh().n_faces());
        assert_eq!(b.ncols(), 2 * 2 + 2 * 3);
        assert_eq!(b[(0, 0)], -2.0);
        assert_eq!(b[(3, 1)], 2.0);

        ops.set_cell_gradient_bc(CellGradientBc::neumann(2).unwrap())
            .unwrap();
        let b = ops.cell_gradient_bc().unwrap();
        assert_eq!(b.nnz(), 0);
    }

    #[test]
    fn missing_axis_is_unsupported() {
        let ops = ops_1d(3);
        assert!(matches!(
            ops.cell_gradient_axis(Axis::Z),
            Err(OperatorError::Unsupported {
                operator: "cell_gradient_z",
                dim: 1
            })
        ));
        assert!(ops.nodal_gradient_axis_stencil(Axis::Y).is_err());
    }
}
