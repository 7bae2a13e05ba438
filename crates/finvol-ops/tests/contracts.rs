//! Operator shapes, exact 1D rows, caching and BC configuration.

use finvol_core::{Axis, AxisBc, BoundaryCondition, OperatorError};
use finvol_mesh::{MeshGeometry, TensorMesh};
use finvol_ops::{AxisSpec, BcSpec, CellGradientBc, DiffOperators, OperatorKind};
use finvol_test_utils::{assert_matrix_close, dense};
use nalgebra::DMatrix;
use std::sync::Arc;

fn ops(cells: &[usize]) -> DiffOperators<TensorMesh> {
    DiffOperators::new(TensorMesh::unit(cells).unwrap()).unwrap()
}

#[test]
fn operator_shapes_in_every_dimension() {
    for cells in [&[4][..], &[3, 2], &[2, 3, 4]] {
        let ops = ops(cells);
        let m = ops.mesh();
        let (nc, nf, ne, nn) = (m.n_cells(), m.n_faces(), m.n_edges(), m.n_nodes());
        let shape = |a: Arc<finvol_core::SparseMatrix>| (a.nrows(), a.ncols());

        assert_eq!(shape(ops.face_divergence().unwrap()), (nc, nf));
        assert_eq!(shape(ops.nodal_gradient().unwrap()), (ne, nn));
        assert_eq!(shape(ops.cell_gradient().unwrap()), (nf, nc));
        assert_eq!(shape(ops.nodal_laplacian().unwrap()), (nn, nn));
        assert_eq!(shape(ops.average_face_to_cell().unwrap()), (nc, nf));
        assert_eq!(shape(ops.average_cell_to_face().unwrap()), (nf, nc));
        assert_eq!(shape(ops.average_node_to_cell().unwrap()), (nc, nn));
        assert_eq!(shape(ops.average_node_to_face().unwrap()), (nf, nn));
        assert_eq!(
            shape(ops.average_face_to_cell_vector().unwrap()),
            (ops.dim() * nc, nf)
        );
        assert_eq!(
            shape(ops.average_cell_vector_to_face().unwrap()),
            (nf, ops.dim() * nc)
        );
        if ops.dim() > 1 {
            assert_eq!(shape(ops.average_node_to_edge().unwrap()), (ne, nn));
            assert_eq!(shape(ops.average_cell_to_edge().unwrap()), (ne, nc));
            assert_eq!(shape(ops.average_edge_to_cell().unwrap()), (nc, ne));
            assert_eq!(shape(ops.average_edge_to_face_vector().unwrap()), (nf, ne));
        }
        match ops.dim() {
            1 => assert!(matches!(
                ops.edge_curl(),
                Err(OperatorError::NotImplemented { .. })
            )),
            2 => assert_eq!(shape(ops.edge_curl().unwrap()), (nc, ne)),
            _ => assert_eq!(shape(ops.edge_curl().unwrap()), (nf, ne)),
        }
    }
}

#[test]
fn one_dimensional_rows() {
    let ops = DiffOperators::new(TensorMesh::uniform(&[4], 0.25).unwrap()).unwrap();
    let div = dense(&ops.face_divergence().unwrap());
    assert_eq!(div.row(1).iter().copied().collect::<Vec<_>>(), vec![0.0, -4.0, 4.0, 0.0, 0.0]);

    let g = dense(&ops.cell_gradient().unwrap());
    assert_eq!(g.row(0).iter().copied().collect::<Vec<_>>(), vec![0.0; 4]);
    assert_eq!(g.row(2).iter().copied().collect::<Vec<_>>(), vec![0.0, -4.0, 4.0, 0.0]);

    let ave = dense(&ops.average_cell_to_face().unwrap());
    assert_eq!(ave.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0, 0.0, 0.0]);
    assert_eq!(ave.row(2).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.5, 0.5, 0.0]);
    assert_eq!(ave.row(4).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn repeated_requests_share_one_matrix() {
    let ops = ops(&[3, 3]);
    let a = ops.face_divergence().unwrap();
    let b = ops.face_divergence().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(ops.cache().contains(OperatorKind::FaceDivergence).unwrap());
}

#[test]
fn bc_change_rebuilds_cell_gradient_only() {
    let mut ops = DiffOperators::new(TensorMesh::uniform(&[3], 0.5).unwrap()).unwrap();
    let div = ops.face_divergence().unwrap();
    let neumann = ops.cell_gradient().unwrap();

    ops.set_cell_gradient_bc_spec(&BcSpec::all("dirichlet")).unwrap();
    let dirichlet = ops.cell_gradient().unwrap();
    assert!(!Arc::ptr_eq(&neumann, &dirichlet));
    assert!(Arc::ptr_eq(&div, &ops.face_divergence().unwrap()));

    let d = dense(&dirichlet);
    // zero boundary value: the ghost cell mirrors -phi_0
    assert_eq!(d[(0, 0)], 4.0);
    assert_eq!(d[(3, 2)], -4.0);
    assert_eq!(dense(&neumann)[(0, 0)], 0.0);
}

#[test]
fn mixed_token_spec_resolves_per_axis() {
    let mut ops = ops(&[2, 2]);
    let spec = BcSpec::PerAxis(vec![
        AxisSpec::Sides(vec!["dirichlet".into(), "neumann".into()]),
        AxisSpec::Both("neumann".into()),
    ]);
    ops.set_cell_gradient_bc_spec(&spec).unwrap();
    let expected = CellGradientBc::per_axis(&[
        AxisBc::new(BoundaryCondition::Dirichlet, BoundaryCondition::Neumann),
        AxisBc::both(BoundaryCondition::Neumann),
    ])
    .unwrap();
    assert_eq!(ops.cell_gradient_bc_config(), &expected);

    let wrong_len = BcSpec::PerAxis(vec![AxisSpec::Both("neumann".into())]);
    assert!(ops.set_cell_gradient_bc_spec(&wrong_len).is_err());
    assert!(ops.set_cell_gradient_bc_spec(&BcSpec::all("periodic")).is_err());
    assert_eq!(ops.cell_gradient_bc_config(), &expected);
}

#[test]
fn missing_axes_are_unsupported() {
    let ops = ops(&[3, 3]);
    let err = ops.face_axis_divergence(Axis::Z).unwrap_err();
    assert_eq!(
        err,
        OperatorError::Unsupported {
            operator: "face_z_divergence",
            dim: 2
        }
    );
    assert!(ops.cell_gradient_axis(Axis::Z).is_err());
    assert!(ops.average_face_axis_to_cell(Axis::Z).is_err());
    assert!(ops.nodal_laplacian_axis(Axis::Z).is_err());
}

#[test]
fn axis_operators_assemble_the_full_ones() {
    let ops = DiffOperators::new(
        TensorMesh::new(vec![vec![1.0, 2.0, 0.5], vec![0.25, 1.0]], &[0.0, 0.0]).unwrap(),
    )
    .unwrap();
    let full = dense(&ops.face_divergence().unwrap());
    let x = dense(&ops.face_axis_divergence(Axis::X).unwrap());
    let y = dense(&ops.face_axis_divergence(Axis::Y).unwrap());
    let mut stacked = DMatrix::zeros(full.nrows(), full.ncols());
    stacked.columns_mut(0, x.ncols()).copy_from(&x);
    stacked.columns_mut(x.ncols(), y.ncols()).copy_from(&y);
    assert_matrix_close(&full, &stacked, 1e-14);
}

#[test]
fn cell_gradient_bc_feeds_dirichlet_values() {
    let mut ops = DiffOperators::new(TensorMesh::uniform(&[4], 0.5).unwrap()).unwrap();
    ops.set_cell_gradient_bc(CellGradientBc::dirichlet(1).unwrap()).unwrap();
    let bc = dense(&ops.cell_gradient_bc().unwrap());
    assert_eq!(bc.shape(), (5, 2));
    assert_eq!(bc[(0, 0)], -4.0);
    assert_eq!(bc[(4, 1)], 4.0);
}
