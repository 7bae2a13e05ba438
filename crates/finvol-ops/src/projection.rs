//! Boundary selection matrices and cell-centered BC projections.
//!
//! A projection is the identity with non-boundary rows removed, so
//! `P . u` picks the boundary entries of `u` in their original order and
//! `P^T` scatters boundary values back.
//!
//! Boundary membership per location:
//!
//! - face normal to `a`: first or last index along `a`
//! - edge parallel to `a`: first or last index along any other axis
//! - node: first or last index along any axis

use crate::cache::OperatorKind;
use crate::config::CellGradientBc;
use crate::operators::DiffOperators;
use finvol_core::boundary::{
    boundary_mask, proj_dirichlet, proj_ends, proj_neumann_in, proj_neumann_out,
};
use finvol_core::sparse::{block_diag, matmul, mul_vec, sdiag, select_rows, speye};
use finvol_core::tensor::{directional, Extent};
use finvol_core::{Axis, AxisBc, BoundaryCondition, OperatorError, SparseMatrix};
use finvol_mesh::MeshGeometry;
use nalgebra::DVector;
use smallvec::SmallVec;
use std::sync::Arc;

/// Projections for imposing mixed Dirichlet/Neumann conditions on a
/// cell-centered weak form.
#[derive(Clone, Debug, PartialEq)]
pub struct BcProjections {
    /// Area-weighted, outward-signed map from boundary values to the
    /// Dirichlet faces, shape `(n_faces, n_boundary_faces)`.
    pub dirichlet: SparseMatrix,
    /// Selects every face that is not a Neumann end.
    pub neumann_in: SparseMatrix,
    /// Selects the Neumann end faces, two rows per grid line.
    pub neumann_out: SparseMatrix,
}

impl<M: MeshGeometry> DiffOperators<M> {
    /// Selects boundary faces, shape `(n_boundary_faces, n_faces)`.
    pub fn project_face_to_boundary_face(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::ProjectFaceToBoundaryFace, || {
            let shape = self.shape();
            let mut keep = Vec::with_capacity(shape.n_faces());
            for axis in shape.axes() {
                keep.extend(boundary_mask(&shape.face_shape(axis), &[axis]));
            }
            select_rows(&speye(shape.n_faces()), &keep)
        })
    }

    /// Selects boundary edges, shape `(n_boundary_edges, n_edges)`.
    ///
    /// Every edge of a 1D mesh lies inside the domain, so this is
    /// [`OperatorError::Unsupported`] there.
    pub fn project_edge_to_boundary_edge(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.require_min_dim(2, "project_edge_to_boundary_edge")?;
        self.cached(OperatorKind::ProjectEdgeToBoundaryEdge, || {
            let shape = self.shape();
            let mut keep = Vec::with_capacity(shape.n_edges());
            for axis in shape.axes() {
                let across: SmallVec<[Axis; 3]> = shape.axes().filter(|b| *b != axis).collect();
                keep.extend(boundary_mask(&shape.edge_shape(axis), &across));
            }
            select_rows(&speye(shape.n_edges()), &keep)
        })
    }

    /// Selects boundary nodes, shape `(n_boundary_nodes, n_nodes)`.
    pub fn project_node_to_boundary_node(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::ProjectNodeToBoundaryNode, || {
            let shape = self.shape();
            let keep = boundary_mask(&shape.nodes(), &Axis::ALL);
            select_rows(&speye(shape.n_nodes()), &keep)
        })
    }

    /// Areas of the boundary faces, in boundary-face order.
    pub(crate) fn boundary_face_areas(&self) -> Result<DVector<f64>, OperatorError> {
        let pf = self.project_face_to_boundary_face()?;
        mul_vec(&pf, &DVector::from_column_slice(self.mesh().face_areas()))
    }

    /// One 1D end-condition matrix per axis, expanded over cells.
    fn bc_blocks<F>(&self, bc: &CellGradientBc, f: F) -> Result<Vec<SparseMatrix>, OperatorError>
    where
        F: Fn(usize, AxisBc) -> Result<SparseMatrix, OperatorError>,
    {
        let shape = self.shape();
        shape
            .axes()
            .zip(bc.axes())
            .map(|(a, &axis_bc)| directional(shape, a, Extent::Cells, |n| f(n, axis_bc)))
            .collect()
    }

    /// Mixed-condition projections for the given per-axis conditions.
    ///
    /// `bc` must cover every mesh axis. Boundary values are ordered as
    /// the boundary faces are: per axis, per grid line, lower then upper.
    pub fn bc_projections(&self, bc: &CellGradientBc) -> Result<BcProjections, OperatorError> {
        bc.check_dim(self.dim())?;
        let dirichlet = self.bc_blocks(bc, |n, b| Ok(proj_dirichlet(n, b)))?;
        let neumann_in = self.bc_blocks(bc, proj_neumann_in)?;
        let neumann_out = self.bc_blocks(bc, |n, b| Ok(proj_neumann_out(n, b)))?;

        let areas = self.boundary_face_areas()?;
        let dirichlet = matmul(
            &block_diag(&dirichlet.iter().collect::<Vec<_>>()),
            &sdiag(areas.as_slice()),
        )?;
        Ok(BcProjections {
            dirichlet,
            neumann_in: block_diag(&neumann_in.iter().collect::<Vec<_>>()),
            neumann_out: block_diag(&neumann_out.iter().collect::<Vec<_>>()),
        })
    }

    /// All-Dirichlet projection and the plain boundary selector.
    ///
    /// Returns `(dirichlet, boundary)` where `dirichlet` is as in
    /// [`bc_projections`](Self::bc_projections) with Dirichlet everywhere
    /// and `boundary` selects both end faces of every grid line, shape
    /// `(n_boundary_faces, n_faces)`.
    pub fn bc_projections_simple(&self) -> Result<(SparseMatrix, SparseMatrix), OperatorError> {
        let all_dirichlet = CellGradientBc::uniform(self.dim(), BoundaryCondition::Dirichlet)?;
        let BcProjections { dirichlet, .. } = self.bc_projections(&all_dirichlet)?;
        let shape = self.shape();
        let ends = shape
            .axes()
            .map(|a| directional(shape, a, Extent::Cells, |n| Ok(proj_ends(n))))
            .collect::<Result<Vec<_>, _>>()?;
        let boundary = block_diag(&ends.iter().collect::<Vec<_>>()).transpose();
        Ok((dirichlet, boundary))
    }
}
