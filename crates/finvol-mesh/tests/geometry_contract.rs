use finvol_core::Axis;
use finvol_mesh::{MeshGeometry, TensorMesh};

fn assert_lengths(mesh: &dyn MeshGeometry) {
    assert_eq!(mesh.cell_volumes().len(), mesh.n_cells());
    assert_eq!(mesh.cell_centers().len(), mesh.n_cells());
    assert_eq!(mesh.nodes().len(), mesh.n_nodes());
    assert_eq!(mesh.face_areas().len(), mesh.n_faces());
    assert_eq!(mesh.faces().len(), mesh.n_faces());
    assert_eq!(mesh.face_normals().len(), mesh.n_faces());
    assert_eq!(mesh.edge_lengths().len(), mesh.n_edges());
    assert_eq!(mesh.edge_tangents().len(), mesh.n_edges());
}

#[test]
fn array_lengths_match_counts_in_every_dimension() {
    assert_lengths(&TensorMesh::uniform(&[5], 0.2).unwrap());
    assert_lengths(&TensorMesh::uniform(&[3, 4], 1.0).unwrap());
    assert_lengths(&TensorMesh::unit(&[2, 3, 4]).unwrap());
}

#[test]
fn boundary_normal_count_matches_outer_faces() {
    let m = TensorMesh::unit(&[2, 3, 4]).unwrap();
    let expected = 2 * (3 * 4) + 2 * (2 * 4) + 2 * (2 * 3);
    assert_eq!(m.boundary_face_outward_normals().len(), expected);
}

#[test]
fn cell_widths_only_for_present_axes() {
    let m = TensorMesh::uniform(&[3, 4], 1.0).unwrap();
    assert_eq!(m.cell_widths(Axis::Y).map(<[f64]>::len), Some(4));
    assert!(m.cell_widths(Axis::Z).is_none());
    assert_eq!(m.node_positions(Axis::X), Some(vec![0.0, 1.0, 2.0, 3.0]));
}

#[test]
fn face_and_edge_directions_follow_axis_blocks() {
    let m = TensorMesh::unit(&[2, 2, 2]).unwrap();
    let shape = m.shape();
    for axis in shape.axes() {
        let off = shape.face_offset(axis);
        let n = shape.n_faces_along(axis);
        for normal in &m.face_normals()[off..off + n] {
            assert_eq!(normal[axis.index()], 1.0);
        }
        let off = shape.edge_offset(axis);
        let n = shape.n_edges_along(axis);
        for tangent in &m.edge_tangents()[off..off + n] {
            assert_eq!(tangent[axis.index()], 1.0);
        }
    }
}
