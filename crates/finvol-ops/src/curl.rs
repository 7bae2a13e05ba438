//! Edge curl (edges to faces in 3D, edges to cells in 2D).
//!
//! In 3D each face block collects the two cross-derivatives of the
//! tangential edge components, with one of each pair negated:
//!
//! ```text
//!          e_x      e_y      e_z
//! f_x [    0     -dz(e_y)  dy(e_z) ]
//! f_y [ dz(e_x)     0     -dx(e_z) ]
//! f_z [-dy(e_x)  dx(e_y)     0     ]
//! ```
//!
//! Each derivative is a [`ddx`] along its axis, identity on the other two
//! axes sized to the location it passes through. In 2D only the `f_z` row
//! survives and lands on cells.

use crate::cache::OperatorKind;
use crate::operators::DiffOperators;
use finvol_core::sparse::{bmat, hstack, kron, kron3, matmul, scale, sdiag, sdiag_inv, speye, spzeros};
use finvol_core::stencil::ddx;
use finvol_core::{Axis, OperatorError, SparseMatrix};
use finvol_mesh::MeshGeometry;
use std::sync::Arc;

impl<M: MeshGeometry> DiffOperators<M> {
    /// Topological edge curl.
    ///
    /// Shape `(n_faces, n_edges)` in 3D and `(n_cells, n_edges)` in 2D.
    /// Not available on 1D meshes.
    pub fn edge_curl_stencil(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::EdgeCurlStencil, || {
            let shape = self.shape();
            match shape.dim() {
                2 => {
                    let (n1, n2) = (shape.cells_along(Axis::X), shape.cells_along(Axis::Y));
                    let dy_ex = scale(&kron(&ddx(n2)?, &speye(n1)), -1.0);
                    let dx_ey = kron(&speye(n2), &ddx(n1)?);
                    hstack(&[&dy_ex, &dx_ey])
                }
                3 => curl_stencil_3d(
                    shape.cells_along(Axis::X),
                    shape.cells_along(Axis::Y),
                    shape.cells_along(Axis::Z),
                ),
                _ => Err(OperatorError::NotImplemented {
                    feature: "edge curl on 1D meshes",
                }),
            }
        })
    }

    /// Edge curl.
    ///
    /// 3D: `diag(1 / S) . C . diag(L)`. 2D: `diag(1 / V) . C . diag(L)`,
    /// the circulation around each cell divided by its area.
    pub fn edge_curl(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::EdgeCurl, || {
            let c = self.edge_curl_stencil()?;
            let mesh = self.mesh();
            let outer = if mesh.dim() == 3 {
                sdiag_inv(mesh.face_areas())
            } else {
                sdiag_inv(mesh.cell_volumes())
            };
            matmul(&matmul(&outer, &c)?, &sdiag(mesh.edge_lengths()))
        })
    }
}

fn curl_stencil_3d(n1: usize, n2: usize, n3: usize) -> Result<SparseMatrix, OperatorError> {
    let (d1, d2, d3) = (ddx(n1)?, ddx(n2)?, ddx(n3)?);
    let i = speye;

    // face_x rows
    let d32 = scale(&kron3(&d3, &i(n2), &i(n1 + 1)), -1.0);
    let d23 = kron3(&i(n3), &d2, &i(n1 + 1));
    // face_y rows
    let d31 = kron3(&d3, &i(n2 + 1), &i(n1));
    let d13 = scale(&kron3(&i(n3), &i(n2 + 1), &d1), -1.0);
    // face_z rows
    let d21 = scale(&kron3(&i(n3 + 1), &d2, &i(n1)), -1.0);
    let d12 = kron3(&i(n3 + 1), &i(n2), &d1);

    let o1 = spzeros(d23.nrows(), d31.ncols());
    let o2 = spzeros(d31.nrows(), d12.ncols());
    let o3 = spzeros(d21.nrows(), d23.ncols());

    bmat(&[
        &[&o1, &d32, &d23],
        &[&d31, &o2, &d13],
        &[&d21, &d12, &o3],
    ])
}
