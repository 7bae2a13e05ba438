//! Averaging operators between cells, faces, edges and nodes.
//!
//! Every operator is a tensor product of per-axis factors, one of:
//! identity (the location does not move along that axis), [`av`] (nodes
//! to cells) or [`av_extrap`] (cells to nodes, copying the end cells).
//!
//! | Operator | Factor on axis `b` for block `a` |
//! |----------|----------------------------------|
//! | face `a` to cell | `av` if `b == a`, else `I` |
//! | edge `a` to cell | `I` if `b == a`, else `av` |
//! | cell to face `a` | `av_extrap` if `b == a`, else `I` |
//! | cell to edge `a` | `I` if `b == a`, else `av_extrap` |
//! | node to cell | `av` |
//! | node to edge `a` | `av` if `b == a`, else `I` (nodes) |
//! | node to face `a` | `I` (nodes) if `b == a`, else `av` |
//!
//! Scalar averages over several blocks divide by the number of blocks,
//! so a constant field maps to the same constant. Vector averages are
//! block diagonal.

use crate::cache::OperatorKind;
use crate::operators::{axis_name, DiffOperators};
use finvol_core::sparse::{bmat, block_diag, hstack, scale, speye, spzeros, vstack};
use finvol_core::stencil::{av, av_extrap};
use finvol_core::tensor::{assemble, eye, Extent};
use finvol_core::{Axis, OperatorError, SparseMatrix};
use finvol_mesh::MeshGeometry;
use std::sync::Arc;

const FACE_TO_CELL: [&str; 3] = [
    "average_face_x_to_cell",
    "average_face_y_to_cell",
    "average_face_z_to_cell",
];

const EDGE_TO_CELL: [&str; 3] = [
    "average_edge_x_to_cell",
    "average_edge_y_to_cell",
    "average_edge_z_to_cell",
];

fn refs(blocks: &[SparseMatrix]) -> Vec<&SparseMatrix> {
    blocks.iter().collect()
}

impl<M: MeshGeometry> DiffOperators<M> {
    fn per_axis<F>(&self, build: F) -> Result<Vec<SparseMatrix>, OperatorError>
    where
        F: Fn(Axis) -> Result<SparseMatrix, OperatorError>,
    {
        self.shape().axes().map(build).collect()
    }

    fn face_axis_to_cell(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        assemble(self.shape(), |b, n| if b == axis { av(n) } else { Ok(speye(n)) })
    }

    fn edge_axis_to_cell(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        assemble(self.shape(), |b, n| if b == axis { Ok(speye(n)) } else { av(n) })
    }

    fn cell_to_face_axis(&self, axis: Axis) -> Result<SparseMatrix, OperatorError> {
        assemble(self.shape(), |b, n| if b == axis { av_extrap(n) } else { Ok(speye(n)) })
    }

    /// Face-to-cell average of the faces normal to `axis`,
    /// shape `(n_cells, n_faces_along(axis))`.
    pub fn average_face_axis_to_cell(&self, axis: Axis) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.require_axis(axis, axis_name(axis, FACE_TO_CELL))?;
        self.cached(OperatorKind::AverageFaceAxisToCell(axis), || {
            self.face_axis_to_cell(axis)
        })
    }

    /// Scalar face-to-cell average, shape `(n_cells, n_faces)`.
    pub fn average_face_to_cell(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageFaceToCell, || {
            let blocks = self.per_axis(|a| self.face_axis_to_cell(a))?;
            let stacked = hstack(&refs(&blocks))?;
            Ok(scale(&stacked, 1.0 / self.dim() as f64))
        })
    }

    /// Vector face-to-cell average, shape `(dim * n_cells, n_faces)`.
    pub fn average_face_to_cell_vector(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageFaceToCellVector, || {
            let blocks = self.per_axis(|a| self.face_axis_to_cell(a))?;
            Ok(block_diag(&refs(&blocks)))
        })
    }

    /// Scalar cell-to-face average, shape `(n_faces, n_cells)`.
    ///
    /// End faces take the value of their single adjacent cell.
    pub fn average_cell_to_face(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageCellToFace, || {
            let blocks = self.per_axis(|a| self.cell_to_face_axis(a))?;
            vstack(&refs(&blocks))
        })
    }

    /// Vector cell-to-face average, shape `(n_faces, dim * n_cells)`.
    pub fn average_cell_vector_to_face(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageCellVectorToFace, || {
            let blocks = self.per_axis(|a| self.cell_to_face_axis(a))?;
            Ok(block_diag(&refs(&blocks)))
        })
    }

    /// Scalar cell-to-edge average, shape `(n_edges, n_cells)`.
    pub fn average_cell_to_edge(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageCellToEdge, || {
            let blocks = self.per_axis(|axis| {
                assemble(self.shape(), |b, n| if b == axis { Ok(speye(n)) } else { av_extrap(n) })
            })?;
            vstack(&refs(&blocks))
        })
    }

    /// Edge-to-cell average of the edges parallel to `axis`,
    /// shape `(n_cells, n_edges_along(axis))`.
    pub fn average_edge_axis_to_cell(&self, axis: Axis) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.require_axis(axis, axis_name(axis, EDGE_TO_CELL))?;
        self.cached(OperatorKind::AverageEdgeAxisToCell(axis), || {
            self.edge_axis_to_cell(axis)
        })
    }

    /// Scalar edge-to-cell average, shape `(n_cells, n_edges)`.
    pub fn average_edge_to_cell(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageEdgeToCell, || {
            let blocks = self.per_axis(|a| self.edge_axis_to_cell(a))?;
            let stacked = hstack(&refs(&blocks))?;
            Ok(scale(&stacked, 1.0 / self.dim() as f64))
        })
    }

    /// Vector edge-to-cell average, shape `(dim * n_cells, n_edges)`.
    pub fn average_edge_to_cell_vector(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageEdgeToCellVector, || {
            let blocks = self.per_axis(|a| self.edge_axis_to_cell(a))?;
            Ok(block_diag(&refs(&blocks)))
        })
    }

    /// Vector edge-to-face average, shape `(n_faces, n_edges)`.
    ///
    /// Each face block gathers the edge components tangential to it. In
    /// 2D a face normal to x carries the y edge at the same position, and
    /// vice versa. In 3D a face normal to `a` averages edges parallel to
    /// `b` along the third axis. In 1D this is the cell-to-face average.
    pub fn average_edge_to_face_vector(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageEdgeToFaceVector, || {
            let shape = self.shape();
            if shape.dim() == 1 {
                return self.cell_to_face_axis(Axis::X);
            }
            let mut rows: Vec<Vec<SparseMatrix>> = Vec::with_capacity(shape.dim());
            for face in shape.axes() {
                let mut row = Vec::with_capacity(shape.dim());
                for edge in shape.axes() {
                    if face == edge {
                        row.push(spzeros(shape.n_faces_along(face), shape.n_edges_along(edge)));
                    } else {
                        row.push(assemble(shape, |b, n| {
                            if b == face {
                                Ok(eye(Extent::Nodes, n))
                            } else if b == edge {
                                Ok(eye(Extent::Cells, n))
                            } else {
                                av(n)
                            }
                        })?);
                    }
                }
                rows.push(row);
            }
            let row_refs: Vec<Vec<&SparseMatrix>> = rows.iter().map(|r| refs(r)).collect();
            let grid: Vec<&[&SparseMatrix]> = row_refs.iter().map(Vec::as_slice).collect();
            bmat(&grid)
        })
    }

    /// Node-to-cell average, shape `(n_cells, n_nodes)`.
    pub fn average_node_to_cell(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageNodeToCell, || {
            assemble(self.shape(), |_, n| av(n))
        })
    }

    /// Node-to-edge average, shape `(n_edges, n_nodes)`.
    pub fn average_node_to_edge(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageNodeToEdge, || {
            let blocks = self.per_axis(|axis| {
                assemble(self.shape(), |b, n| {
                    if b == axis { av(n) } else { Ok(eye(Extent::Nodes, n)) }
                })
            })?;
            vstack(&refs(&blocks))
        })
    }

    /// Node-to-face average, shape `(n_faces, n_nodes)`.
    pub fn average_node_to_face(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::AverageNodeToFace, || {
            let blocks = self.per_axis(|axis| {
                assemble(self.shape(), |b, n| {
                    if b == axis { Ok(eye(Extent::Nodes, n)) } else { av(n) }
                })
            })?;
            vstack(&refs(&blocks))
        })
    }
}
