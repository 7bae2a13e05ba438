//! The `MeshGeometry` trait: what operator construction consumes from a mesh.

use finvol_core::{Axis, GridShape};
use nalgebra::Vector3;

/// Geometry and topology of a structured mesh.
///
/// Operator builders read counts from [`shape`](Self::shape) and scale
/// their stencils with the geometric arrays below. All arrays use the
/// workspace ordering: x-fastest within a location kind, and for faces
/// and edges the x block first, then y, then z.
///
/// Coordinates and directions are always 3-vectors; components beyond
/// the mesh dimension are zero.
///
/// # Thread Safety
///
/// `Sync` is required so that a shared operator set can be read from
/// several threads once built.
pub trait MeshGeometry: Send + Sync {
    /// Cell counts per axis.
    fn shape(&self) -> &GridShape;

    /// Cell widths along `axis`, or `None` if the mesh has no such axis
    /// or is not rectilinear along it.
    fn cell_widths(&self, axis: Axis) -> Option<&[f64]>;

    /// Volume of each cell (length in 1D, area in 2D).
    fn cell_volumes(&self) -> &[f64];

    /// Area of each face (1 in 1D, length in 2D).
    fn face_areas(&self) -> &[f64];

    /// Length of each edge.
    fn edge_lengths(&self) -> &[f64];

    /// Cell-center coordinates.
    fn cell_centers(&self) -> &[Vector3<f64>];

    /// Node coordinates.
    fn nodes(&self) -> &[Vector3<f64>];

    /// Face-center coordinates.
    fn faces(&self) -> &[Vector3<f64>];

    /// Unit normal of each face, pointing toward increasing index.
    fn face_normals(&self) -> &[Vector3<f64>];

    /// Unit tangent of each edge, pointing toward increasing index.
    fn edge_tangents(&self) -> &[Vector3<f64>];

    /// Outward unit normal of each boundary face, in boundary-face order.
    fn boundary_face_outward_normals(&self) -> &[Vector3<f64>];

    /// Number of axes.
    fn dim(&self) -> usize {
        self.shape().dim()
    }

    /// Total number of cells.
    fn n_cells(&self) -> usize {
        self.shape().n_cells()
    }

    /// Total number of nodes.
    fn n_nodes(&self) -> usize {
        self.shape().n_nodes()
    }

    /// Total number of faces.
    fn n_faces(&self) -> usize {
        self.shape().n_faces()
    }

    /// Total number of edges.
    fn n_edges(&self) -> usize {
        self.shape().n_edges()
    }
}
