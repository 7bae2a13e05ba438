//! Robin boundary terms for weak-form assembly.
//!
//! A Robin condition `alpha * phi + beta * dphi/dn = gamma` is imposed
//! through an affine boundary contribution `(B, b)` that the caller adds
//! to the BC-free bilinear form. These builders return only that
//! contribution.

use crate::operators::DiffOperators;
use finvol_core::sparse::{matmul, mul_vec, sdiag, SparseMatrix};
use finvol_core::OperatorError;
use finvol_mesh::MeshGeometry;
use nalgebra::{DVector, Vector3};

/// One Robin coefficient: a constant, or one value per boundary location.
#[derive(Clone, Debug, PartialEq)]
pub enum RobinCoefficient {
    /// The same value everywhere on the boundary.
    Scalar(f64),
    /// One value per boundary face (or boundary node, where accepted).
    PerLocation(Vec<f64>),
}

impl RobinCoefficient {
    /// Number of values, or `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::PerLocation(v) => Some(v.len()),
        }
    }

    /// Whether this coefficient holds no values. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::PerLocation(v) => v,
        }
    }

    fn broadcast(&self, n: usize, name: &str) -> Result<Vec<f64>, OperatorError> {
        match self {
            Self::Scalar(v) => Ok(vec![*v; n]),
            Self::PerLocation(v) if v.len() == n => Ok(v.clone()),
            Self::PerLocation(v) => Err(OperatorError::invalid(format!(
                "{name} has {} values, expected {n}",
                v.len()
            ))),
        }
    }
}

impl From<f64> for RobinCoefficient {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for RobinCoefficient {
    fn from(v: Vec<f64>) -> Self {
        Self::PerLocation(v)
    }
}

impl From<&[f64]> for RobinCoefficient {
    fn from(v: &[f64]) -> Self {
        Self::PerLocation(v.to_vec())
    }
}

/// `A . v` for a sparse `A` and one 3-vector per column of `A`.
fn apply(a: &SparseMatrix, v: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut out = vec![Vector3::zeros(); a.nrows()];
    for (i, j, &w) in a.triplet_iter() {
        out[i] += v[j] * w;
    }
    out
}

impl<M: MeshGeometry> DiffOperators<M> {
    /// Robin term for the cell-centered weak form `<u, grad phi>`.
    ///
    /// Each boundary value is eliminated through the ghost relation
    /// `phi_b = a * phi_c + b'`, with `h` the distance from the adjacent
    /// cell center to the boundary face:
    ///
    /// ```text
    /// a  = (beta / h) / (alpha + beta / h)
    /// b' = gamma / (alpha + beta / h)
    /// ```
    ///
    /// Returns `(M . diag(a) . A_cb, M . b')` with `A_cb` the cell to
    /// boundary-face average and `M` the
    /// [`boundary_face_scalar_integral`](Self::boundary_face_scalar_integral).
    /// Shapes `(n_faces, n_cells)` and `n_faces`.
    ///
    /// Coefficients are scalars or have one value per boundary face.
    pub fn cell_gradient_weak_form_robin(
        &self,
        alpha: impl Into<RobinCoefficient>,
        beta: impl Into<RobinCoefficient>,
        gamma: impl Into<RobinCoefficient>,
    ) -> Result<(SparseMatrix, DVector<f64>), OperatorError> {
        let pf = self.project_face_to_boundary_face()?;
        let n_bf = pf.nrows();
        let alpha = alpha.into().broadcast(n_bf, "alpha")?;
        let beta = beta.into().broadcast(n_bf, "beta")?;
        let gamma = gamma.into().broadcast(n_bf, "gamma")?;

        let ave = matmul(&pf, &*self.average_cell_to_face()?)?;
        let centers = apply(&ave, self.mesh().cell_centers());
        let faces = apply(&pf, self.mesh().faces());

        let mut a = Vec::with_capacity(n_bf);
        let mut b = Vec::with_capacity(n_bf);
        for k in 0..n_bf {
            let h = (faces[k] - centers[k]).norm();
            let denom = alpha[k] + beta[k] / h;
            if denom == 0.0 || !denom.is_finite() {
                return Err(OperatorError::invalid(format!(
                    "alpha + beta / h vanishes or is not finite at boundary face {k}"
                )));
            }
            a.push(beta[k] / h / denom);
            b.push(gamma[k] / denom);
        }

        let m = self.boundary_face_scalar_integral()?;
        let lhs = matmul(&matmul(&m, &sdiag(&a))?, &ave)?;
        let rhs = mul_vec(&m, &DVector::from_vec(b))?;
        Ok((lhs, rhs))
    }

    /// Robin term for the nodal weak form `<psi, div u>` with
    /// `u = grad phi` on edges.
    ///
    /// On the boundary `u . n = (gamma - alpha * phi) / beta`, so `beta`
    /// must be non-zero everywhere. Coefficients are scalars or share one
    /// length, either the number of boundary faces or of boundary nodes;
    /// all scalars are taken per boundary face. Face values are weighted
    /// by face area and spread to the face's nodes; node values are
    /// weighted by the area each node gathers from its faces.
    ///
    /// Returns `(B, b)`: `B` is diagonal `(n_nodes, n_nodes)`, `b` has
    /// length `n_nodes`.
    pub fn edge_divergence_weak_form_robin(
        &self,
        alpha: impl Into<RobinCoefficient>,
        beta: impl Into<RobinCoefficient>,
        gamma: impl Into<RobinCoefficient>,
    ) -> Result<(SparseMatrix, DVector<f64>), OperatorError> {
        let (alpha, beta, gamma) = (alpha.into(), beta.into(), gamma.into());
        if beta.values().iter().any(|v| *v == 0.0) {
            return Err(OperatorError::invalid("beta cannot have a zero value"));
        }

        let pbn = self.project_node_to_boundary_node()?;
        let pbf = self.project_face_to_boundary_face()?;
        let (n_bf, n_bn) = (pbf.nrows(), pbn.nrows());

        let mut n = None;
        for c in [&alpha, &beta, &gamma] {
            match (n, c.len()) {
                (_, None) => {}
                (None, Some(len)) => n = Some(len),
                (Some(prev), Some(len)) if prev != len => {
                    return Err(OperatorError::invalid(
                        "alpha, beta, and gamma must have the same length",
                    ));
                }
                _ => {}
            }
        }
        let n = n.unwrap_or(n_bf);
        if n != n_bf && n != n_bn {
            return Err(OperatorError::invalid(format!(
                "Robin coefficients need {n_bf} (boundary faces) or {n_bn} (boundary nodes) values, got {n}"
            )));
        }
        let alpha = alpha.broadcast(n, "alpha")?;
        let beta = beta.broadcast(n, "beta")?;
        let gamma = gamma.broadcast(n, "gamma")?;

        let areas = self.boundary_face_areas()?;
        let ave = matmul(&matmul(&pbf, &*self.average_node_to_face()?)?, &pbn.transpose())?;
        let ave_t = ave.transpose();
        let pbn_t = pbn.transpose();

        let ratio = |num: &[f64], sign: f64| -> Vec<f64> {
            num.iter().zip(&beta).map(|(x, b)| sign * x / b).collect()
        };
        let (diag, b) = if n == n_bf {
            let weigh = |r: Vec<f64>| -> Result<DVector<f64>, OperatorError> {
                let on_faces = DVector::from_iterator(n_bf, r.iter().zip(areas.iter()).map(|(r, a)| r * a));
                mul_vec(&pbn_t, &mul_vec(&ave_t, &on_faces)?)
            };
            (weigh(ratio(&alpha, -1.0))?, weigh(ratio(&gamma, 1.0))?)
        } else {
            let gathered = mul_vec(&ave_t, &areas)?;
            let weigh = |r: Vec<f64>| -> Result<DVector<f64>, OperatorError> {
                let on_nodes = DVector::from_iterator(n_bn, r.iter().zip(gathered.iter()).map(|(r, a)| r * a));
                mul_vec(&pbn_t, &on_nodes)
            };
            (weigh(ratio(&alpha, -1.0))?, weigh(ratio(&gamma, 1.0))?)
        };
        Ok((sdiag(diag.as_slice()), b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finvol_mesh::TensorMesh;
    use finvol_test_utils::assert_vector_close;
    use nalgebra::DMatrix;

    fn ops(cells: &[usize]) -> DiffOperators<TensorMesh> {
        DiffOperators::new(TensorMesh::uniform(cells, 1.0).unwrap()).unwrap()
    }

    #[test]
    fn dirichlet_limit_has_no_boundary_matrix() {
        let ops = ops(&[4, 3]);
        let (a, b) = ops.cell_gradient_weak_form_robin(1.0, 0.0, 0.0).unwrap();
        assert_eq!((a.nrows(), a.ncols()), (ops.mesh().n_faces(), ops.mesh().n_cells()));
        assert!(DMatrix::from(&a).iter().all(|v| *v == 0.0));
        assert!(b.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn neumann_limit_cancels_the_divergence_boundary_term() {
        let ops = ops(&[3, 2]);
        let (a, b) = ops.cell_gradient_weak_form_robin(0.0, 1.0, 0.0).unwrap();
        let div = DMatrix::from(&*ops.face_divergence().unwrap());
        let mc = DMatrix::from_diagonal(&DVector::from_column_slice(ops.mesh().cell_volumes()));
        let form = -(div.transpose() * mc) + DMatrix::from(&a);
        let out = form * DVector::from_element(ops.mesh().n_cells(), 1.0);
        assert!(out.amax() < 1e-12);
        assert!(b.amax() == 0.0);
    }

    #[test]
    fn mixed_robin_1d_values() {
        let ops = ops(&[4]);
        let (a, b) = ops.cell_gradient_weak_form_robin(1.0, 1.0, 2.0).unwrap();
        let a = DMatrix::from(&a);
        // h = 0.5, alpha + beta / h = 3
        assert!((a[(0, 0)] + 2.0 / 3.0).abs() < 1e-15);
        assert!((a[(4, 3)] - 2.0 / 3.0).abs() < 1e-15);
        let third = 2.0 / 3.0;
        assert_vector_close(&b, &DVector::from_vec(vec![-third, 0.0, 0.0, 0.0, third]), 1e-15);
    }

    #[test]
    fn per_face_coefficients_must_match_boundary_faces() {
        let ops = ops(&[2, 2]);
        let n_bf = ops.project_face_to_boundary_face().unwrap().nrows();
        assert!(ops
            .cell_gradient_weak_form_robin(vec![1.0; n_bf], 1.0, 0.0)
            .is_ok());
        assert!(matches!(
            ops.cell_gradient_weak_form_robin(vec![1.0; n_bf + 1], 1.0, 0.0),
            Err(OperatorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let ops = ops(&[2]);
        // h = 0.5: alpha + beta / h = -2 + 2
        assert!(ops.cell_gradient_weak_form_robin(-2.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn vanishing_alpha_and_beta_is_rejected() {
        let ops = ops(&[3, 2]);
        assert!(matches!(
            ops.cell_gradient_weak_form_robin(0.0, 0.0, 1.0),
            Err(OperatorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn edge_form_takes_per_node_gamma_in_2d() {
        let ops = ops(&[3, 2]);
        let n_bn = ops.project_node_to_boundary_node().unwrap().nrows();
        let (bm, b) = ops
            .edge_divergence_weak_form_robin(1.0, 1.0, vec![1.0; n_bn])
            .unwrap();
        let n = ops.mesh().n_nodes();
        assert_eq!((bm.nrows(), bm.ncols(), b.len()), (n, n, n));
        // perimeter of the 3 x 2 box
        assert!((b.sum() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn edge_form_rejects_zero_beta() {
        let ops = ops(&[2, 2]);
        assert!(ops.edge_divergence_weak_form_robin(1.0, 0.0, 0.0).is_err());
        let n_bf = ops.project_face_to_boundary_face().unwrap().nrows();
        let mut beta = vec![1.0; n_bf];
        beta[3] = 0.0;
        assert!(ops.edge_divergence_weak_form_robin(1.0, beta, 0.0).is_err());
    }

    #[test]
    fn edge_form_neumann_is_zero() {
        let ops = ops(&[3, 2]);
        let (bm, b) = ops.edge_divergence_weak_form_robin(0.0, 1.0, 0.0).unwrap();
        assert_eq!((bm.nrows(), bm.ncols()), (ops.mesh().n_nodes(), ops.mesh().n_nodes()));
        assert_eq!(bm.nnz(), 0);
        assert!(b.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn edge_form_flux_sums_to_boundary_area() {
        let mesh = TensorMesh::new(vec![vec![1.0, 2.0], vec![0.5, 0.5, 1.0]], &[0.0, 0.0]).unwrap();
        let ops = DiffOperators::new(mesh).unwrap();
        let perimeter = 2.0 * (3.0 + 2.0);
        let (_, b) = ops.edge_divergence_weak_form_robin(0.0, 1.0, 1.0).unwrap();
        assert!((b.sum() - perimeter).abs() < 1e-12);
    }

    #[test]
    fn edge_form_accepts_per_node_values() {
        // 2 x 2 x 1 cells: 16 boundary faces, 18 boundary nodes
        let mesh = TensorMesh::new(vec![vec![1.0, 2.0], vec![0.5, 1.5], vec![2.0]], &[0.0; 3]).unwrap();
        let ops = DiffOperators::new(mesh).unwrap();
        let n_bn = ops.project_node_to_boundary_node().unwrap().nrows();
        assert_eq!(n_bn, 18);
        let surface = 2.0 * (3.0 * 2.0 + 3.0 * 2.0 + 2.0 * 2.0);
        let (bm, b) = ops
            .edge_divergence_weak_form_robin(vec![2.0; n_bn], 1.0, 1.0)
            .unwrap();
        assert!((b.sum() - surface).abs() < 1e-12);
        let diag_sum: f64 = DMatrix::from(&bm).diagonal().sum();
        assert!((diag_sum + 2.0 * surface).abs() < 1e-12);
    }

    #[test]
    fn edge_form_length_checks() {
        let ops = ops(&[3, 2]);
        assert!(matches!(
            ops.edge_divergence_weak_form_robin(vec![1.0; 3], 1.0, 0.0),
            Err(OperatorError::InvalidArgument { .. })
        ));
        assert!(ops
            .edge_divergence_weak_form_robin(vec![1.0; 10], vec![1.0; 9], 0.0)
            .is_err());
    }

    #[test]
    fn coefficient_conversions() {
        assert_eq!(RobinCoefficient::from(2.0).len(), None);
        let c: RobinCoefficient = [1.0, 2.0].as_slice().into();
        assert_eq!(c.len(), Some(2));
        assert!(!c.is_empty());
        assert!(RobinCoefficient::PerLocation(vec![]).is_empty());
    }
}
