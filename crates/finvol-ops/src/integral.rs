//! Boundary surface integrals.
//!
//! Each operator pairs a test function on all locations of one kind with
//! a quantity given on the boundary only:
//!
//! | Operator | Integral | Shape |
//! |----------|----------|-------|
//! | [`boundary_face_scalar_integral`](DiffOperators::boundary_face_scalar_integral) | `∫ u (w . n)` | `(n_faces, n_bf)` |
//! | [`boundary_edge_vector_integral`](DiffOperators::boundary_edge_vector_integral) | `∫ w . (u x n)` | `(n_edges, n_be)` 2D, `(n_edges, 3 n_be)` 3D |
//! | [`boundary_node_vector_integral`](DiffOperators::boundary_node_vector_integral) | `∫ w (u . n)` | `(n_nodes, dim n_bn)` |
//!
//! Vector inputs are component-major: all x values, then all y, then z.

use crate::cache::OperatorKind;
use crate::operators::DiffOperators;
use finvol_core::sparse::{from_triplets, matmul, sdiag, SparseMatrix};
use finvol_core::OperatorError;
use finvol_mesh::MeshGeometry;
use nalgebra::Vector3;
use std::sync::Arc;

/// Column index of the single entry in each row of a selection matrix.
fn selected(p: &SparseMatrix) -> Vec<usize> {
    p.triplet_iter().map(|(_, j, _)| j).collect()
}

/// `A^T . v` for a sparse `A` and one 3-vector per row of `A`.
fn transpose_apply(a: &SparseMatrix, v: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut out = vec![Vector3::zeros(); a.ncols()];
    for (i, j, &w) in a.triplet_iter() {
        out[j] += v[i] * w;
    }
    out
}

/// `(n, k * n)` matrix holding component `c` of `values[r]` at `(r, c * n + r)`.
fn component_diagonals(values: &[Vector3<f64>], components: usize) -> SparseMatrix {
    let n = values.len();
    from_triplets(
        n,
        components * n,
        values
            .iter()
            .enumerate()
            .flat_map(|(r, v)| (0..components).map(move |c| (r, c * n + r, v[c]))),
    )
}

impl<M: MeshGeometry> DiffOperators<M> {
    /// Outward area vectors of the boundary faces.
    fn boundary_area_vectors(&self) -> Result<Vec<Vector3<f64>>, OperatorError> {
        let areas = self.boundary_face_areas()?;
        let normals = self.mesh().boundary_face_outward_normals();
        if normals.len() != areas.len() {
            return Err(OperatorError::ShapeMismatch {
                context: "boundary face outward normals",
                expected: areas.len(),
                actual: normals.len(),
            });
        }
        Ok(normals.iter().zip(areas.iter()).map(|(n, a)| n * *a).collect())
    }

    /// Integral of a boundary scalar times the normal component of a
    /// face vector, shape `(n_faces, n_boundary_faces)`.
    ///
    /// For a face field `w` and boundary values `u_b`, `w^T . A . u_b`
    /// sums `area * (w . n_out) * u_b` over the boundary faces.
    pub fn boundary_face_scalar_integral(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::BoundaryFaceScalarIntegral, || {
            let pf = self.project_face_to_boundary_face()?;
            let faces = selected(&pf);
            let normals = self.mesh().face_normals();
            let outward = self.mesh().boundary_face_outward_normals();
            let signs: Vec<f64> = faces
                .iter()
                .zip(outward)
                .map(|(&f, out)| normals[f].dot(out))
                .collect();
            let scatter = matmul(&sdiag(self.mesh().face_areas()), &pf.transpose())?;
            matmul(&scatter, &sdiag(&signs))
        })
    }

    /// Integral of a test edge field dotted with `u x n` over the boundary.
    ///
    /// In 2D the boundary input is one value per boundary edge; in 3D it
    /// holds all three components per boundary edge. Not defined on 1D
    /// meshes.
    pub fn boundary_edge_vector_integral(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.require_min_dim(2, "boundary_edge_vector_integral")?;
        self.cached(OperatorKind::BoundaryEdgeVectorIntegral, || {
            let pe = self.project_edge_to_boundary_edge()?;
            let pf = self.project_face_to_boundary_face()?;
            let d_a = self.boundary_area_vectors()?;

            let tangents = self.mesh().edge_tangents();
            let edges = selected(&pe);
            let ave = self.average_edge_to_face_vector()?;
            let av = matmul(&matmul(&pf, &ave)?, &pe.transpose())?;
            let swept = transpose_apply(&av, &d_a);

            let w_cross_n: Vec<Vector3<f64>> = edges
                .iter()
                .zip(&swept)
                .map(|(&e, s)| (-tangents[e]).cross(s))
                .collect();

            let inner = if self.dim() == 2 {
                sdiag(&w_cross_n.iter().map(|v| v.z).collect::<Vec<_>>())
            } else {
                component_diagonals(&w_cross_n, 3)
            };
            matmul(&pe.transpose(), &inner)
        })
    }

    /// Integral of a test node field times `u . n` over the boundary,
    /// shape `(n_nodes, dim * n_boundary_nodes)`.
    pub fn boundary_node_vector_integral(&self) -> Result<Arc<SparseMatrix>, OperatorError> {
        self.cached(OperatorKind::BoundaryNodeVectorIntegral, || {
            let n_nodes = self.mesh().n_nodes();
            if self.dim() == 1 {
                return Ok(from_triplets(
                    n_nodes,
                    2,
                    [(0, 0, -1.0), (n_nodes - 1, 1, 1.0)],
                ));
            }
            let pn = self.project_node_to_boundary_node()?;
            let pf = self.project_face_to_boundary_face()?;
            let d_a = self.boundary_area_vectors()?;
            let ave = self.average_node_to_face()?;
            let av = matmul(&matmul(&pf, &ave)?, &pn.transpose())?;
            let u_dot_ds = transpose_apply(&av, &d_a);
            matmul(&pn.transpose(), &component_diagonals(&u_dot_ds, self.dim()))
        })
    }
}
