//! Rectilinear tensor-product mesh.

use crate::error::MeshError;
use crate::geometry::MeshGeometry;
use finvol_core::shape::unravel_index;
use finvol_core::{Axis, GridShape};
use nalgebra::Vector3;
use smallvec::SmallVec;

/// A tensor-product mesh defined by per-axis cell widths.
///
/// Cell `(i, j, k)` spans `[x_i, x_{i+1}] x [y_j, y_{j+1}] x [z_k, z_{k+1}]`
/// where the node positions along each axis start at the origin and
/// accumulate the cell widths. All geometric arrays are computed once at
/// construction.
///
/// # Examples
///
/// ```
/// use finvol_mesh::{MeshGeometry, TensorMesh};
///
/// let mesh = TensorMesh::uniform(&[4, 2], 0.5).unwrap();
/// assert_eq!(mesh.n_cells(), 8);
/// assert_eq!(mesh.n_faces(), 5 * 2 + 4 * 3);
/// assert!(mesh.cell_volumes().iter().all(|v| (*v - 0.25).abs() < 1e-15));
/// ```
#[derive(Clone, Debug)]
pub struct TensorMesh {
    shape: GridShape,
    widths: SmallVec<[Vec<f64>; 3]>,
    origin: Vector3<f64>,
    cell_volumes: Vec<f64>,
    face_areas: Vec<f64>,
    edge_lengths: Vec<f64>,
    cell_centers: Vec<Vector3<f64>>,
    nodes: Vec<Vector3<f64>>,
    faces: Vec<Vector3<f64>>,
    face_normals: Vec<Vector3<f64>>,
    edge_tangents: Vec<Vector3<f64>>,
    boundary_normals: Vec<Vector3<f64>>,
}

impl TensorMesh {
    /// Build a mesh from per-axis cell widths and an origin.
    ///
    /// `origin` must have one entry per axis. Widths must be finite and
    /// strictly positive.
    pub fn new(widths: Vec<Vec<f64>>, origin: &[f64]) -> Result<Self, MeshError> {
        let dim = widths.len();
        if dim == 0 || dim > 3 {
            return Err(MeshError::InvalidDimension { dim });
        }
        if origin.len() != dim {
            return Err(MeshError::OriginMismatch {
                expected: dim,
                actual: origin.len(),
            });
        }
        for (axis, h) in widths.iter().enumerate() {
            if h.is_empty() {
                return Err(MeshError::EmptyAxis { axis });
            }
            if let Some((index, &value)) = h
                .iter()
                .enumerate()
                .find(|(_, w)| !(w.is_finite() && **w > 0.0))
            {
                return Err(MeshError::NonPositiveWidth { axis, index, value });
            }
        }
        let counts: SmallVec<[usize; 3]> = widths.iter().map(Vec::len).collect();
        let shape = GridShape::new(&counts).map_err(|_| MeshError::InvalidDimension { dim })?;

        let mut o = Vector3::zeros();
        for (i, &v) in origin.iter().enumerate() {
            o[i] = v;
        }
        let widths: SmallVec<[Vec<f64>; 3]> = widths.into_iter().collect();
        Ok(Self::build(shape, widths, o))
    }

    /// Mesh of `cells` per axis, every cell of width `h`, origin at zero.
    pub fn uniform(cells: &[usize], h: f64) -> Result<Self, MeshError> {
        let widths = cells.iter().map(|&n| vec![h; n]).collect();
        Self::new(widths, &vec![0.0; cells.len()])
    }

    /// Mesh of the unit square/cube split into `cells` per axis.
    pub fn unit(cells: &[usize]) -> Result<Self, MeshError> {
        let widths = cells
            .iter()
            .map(|&n| vec![1.0 / n.max(1) as f64; n])
            .collect();
        Self::new(widths, &vec![0.0; cells.len()])
    }

    /// Origin of the mesh (lowest corner).
    pub fn origin(&self) -> Vector3<f64> {
        self.origin
    }

    /// Node positions along one axis.
    pub fn node_positions(&self, axis: Axis) -> Option<Vec<f64>> {
        let h = self.widths.get(axis.index())?;
        Some(node_positions(self.origin[axis.index()], h))
    }

    fn build(shape: GridShape, widths: SmallVec<[Vec<f64>; 3]>, origin: Vector3<f64>) -> Self {
        let dim = shape.dim();
        let node_pos: Vec<Vec<f64>> = (0..dim)
            .map(|a| node_positions(origin[a], &widths[a]))
            .collect();
        let center_pos: Vec<Vec<f64>> = node_pos
            .iter()
            .map(|x| x.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect())
            .collect();
        let ones: Vec<Vec<f64>> = widths.iter().map(|h| vec![1.0; h.len() + 1]).collect();

        let all_h: Vec<&[f64]> = widths.iter().map(Vec::as_slice).collect();
        let cell_volumes = outer_product(&all_h);
        let cell_centers = grid_points(&center_pos.iter().map(Vec::as_slice).collect::<Vec<_>>());
        let nodes = grid_points(&node_pos.iter().map(Vec::as_slice).collect::<Vec<_>>());

        let mut face_areas = Vec::with_capacity(shape.n_faces());
        let mut faces = Vec::with_capacity(shape.n_faces());
        let mut face_normals = Vec::with_capacity(shape.n_faces());
        let mut edge_lengths = Vec::with_capacity(shape.n_edges());
        let mut edge_tangents = Vec::with_capacity(shape.n_edges());
        let mut boundary_normals = Vec::new();

        for axis in shape.axes() {
            let a = axis.index();
            let unit = Vector3::ith(a, 1.0);

            let area_factors: Vec<&[f64]> = (0..dim)
                .map(|b| if b == a { ones[b].as_slice() } else { all_h[b] })
                .collect();
            face_areas.extend(outer_product(&area_factors));
            let face_coords: Vec<&[f64]> = (0..dim)
                .map(|b| if b == a { node_pos[b].as_slice() } else { center_pos[b].as_slice() })
                .collect();
            faces.extend(grid_points(&face_coords));
            let n_faces = shape.n_faces_along(axis);
            face_normals.extend(std::iter::repeat(unit).take(n_faces));

            let face_shape = shape.face_shape(axis);
            let last = shape.cells_along(axis);
            for flat in 0..n_faces {
                let idx = unravel_index(&face_shape, flat);
                if idx[a] == 0 {
                    boundary_normals.push(-unit);
                } else if idx[a] == last {
                    boundary_normals.push(unit);
                }
            }

            let length_factors: Vec<&[f64]> = (0..dim)
                .map(|b| if b == a { all_h[b] } else { ones[b].as_slice() })
                .collect();
            edge_lengths.extend(outer_product(&length_factors));
            edge_tangents.extend(std::iter::repeat(unit).take(shape.n_edges_along(axis)));
        }

        Self {
            shape,
            widths,
            origin,
            cell_volumes,
            face_areas,
            edge_lengths,
            cell_centers,
            nodes,
            faces,
            face_normals,
            edge_tangents,
            boundary_normals,
        }
    }
}

fn node_positions(origin: f64, h: &[f64]) -> Vec<f64> {
    let mut x = Vec::with_capacity(h.len() + 1);
    let mut acc = origin;
    x.push(acc);
    for w in h {
        acc += w;
        x.push(acc);
    }
    x
}

/// x-fastest outer product of per-axis factors.
fn outer_product(factors: &[&[f64]]) -> Vec<f64> {
    let shape: Vec<usize> = factors.iter().map(|f| f.len()).collect();
    let total: usize = shape.iter().product();
    (0..total)
        .map(|flat| {
            let idx = unravel_index(&shape, flat);
            factors.iter().zip(&idx).map(|(f, &i)| f[i]).product()
        })
        .collect()
}

/// x-fastest tensor grid of coordinates, zero-padded to three components.
fn grid_points(coords: &[&[f64]]) -> Vec<Vector3<f64>> {
    let shape: Vec<usize> = coords.iter().map(|c| c.len()).collect();
    let total: usize = shape.iter().product();
    (0..total)
        .map(|flat| {
            let idx = unravel_index(&shape, flat);
            let mut p = Vector3::zeros();
            for (a, (c, &i)) in coords.iter().zip(&idx).enumerate() {
                p[a] = c[i];
            }
            p
        })
        .collect()
}

impl MeshGeometry for TensorMesh {
    fn shape(&self) -> &GridShape {
        &self.shape
    }

    fn cell_widths(&self, axis: Axis) -> Option<&[f64]> {
        self.widths.get(axis.index()).map(Vec::as_slice)
    }

    fn cell_volumes(&self) -> &[f64] {
        &self.cell_volumes
    }

    fn face_areas(&self) -> &[f64] {
        &self.face_areas
    }

    fn edge_lengths(&self) -> &[f64] {
        &self.edge_lengths
    }

    fn cell_centers(&self) -> &[Vector3<f64>] {
        &self.cell_centers
    }

    fn nodes(&self) -> &[Vector3<f64>] {
        &self.nodes
    }

    fn faces(&self) -> &[Vector3<f64>] {
        &self.faces
    }

    fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    fn edge_tangents(&self) -> &[Vector3<f64>] {
        &self.edge_tangents
    }

    fn boundary_face_outward_normals(&self) -> &[Vector3<f64>] {
        &self.boundary_normals
    }
}
