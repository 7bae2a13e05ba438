//! Cartesian axes and structured-grid shape arithmetic.
//!
//! A [`GridShape`] knows only the per-axis cell counts. Every location
//! kind (cells, nodes, faces, edges) is counted from it:
//!
//! - faces normal to axis `a` carry *nodes* along `a` and *cells* along
//!   every other axis;
//! - edges parallel to axis `a` carry *cells* along `a` and *nodes* along
//!   every other axis.
//!
//! All flattened quantities use x-fastest ordering, and composite
//! face/edge vectors concatenate the x block, then y, then z.

use crate::error::OperatorError;
use smallvec::SmallVec;
use std::fmt;

/// Per-axis counts, inline for up to three axes.
pub type AxisCounts = SmallVec<[usize; 3]>;

/// A Cartesian axis of a structured mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// First axis, varies fastest in flattened ordering.
    X,
    /// Second axis.
    Y,
    /// Third axis, varies slowest.
    Z,
}

impl Axis {
    /// All axes in flattening order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Zero-based position of this axis.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis at position `i`, if any.
    pub const fn from_index(i: usize) -> Option<Axis> {
        match i {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    /// Lower-case axis letter.
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Cell counts of a 1D, 2D or 3D structured grid.
///
/// # Examples
///
/// ```
/// use finvol_core::{Axis, GridShape};
///
/// let shape = GridShape::new(&[2, 3, 4]).unwrap();
/// assert_eq!(shape.n_cells(), 24);
/// assert_eq!(shape.n_faces_along(Axis::X), 3 * 3 * 4);
/// assert_eq!(shape.n_edges_along(Axis::X), 2 * 4 * 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    cells: AxisCounts,
}

impl GridShape {
    /// Create a shape from per-axis cell counts.
    ///
    /// Returns `InvalidArgument` unless there are 1 to 3 axes, each with
    /// at least one cell.
    pub fn new(cells: &[usize]) -> Result<Self, OperatorError> {
        if cells.is_empty() || cells.len() > 3 {
            return Err(OperatorError::invalid(format!(
                "grid must have 1 to 3 axes, got {}",
                cells.len()
            )));
        }
        if let Some(i) = cells.iter().position(|&n| n == 0) {
            return Err(OperatorError::invalid(format!(
                "axis {i} has zero cells"
            )));
        }
        Ok(Self {
            cells: SmallVec::from_slice(cells),
        })
    }

    /// Number of axes.
    pub fn dim(&self) -> usize {
        self.cells.len()
    }

    /// The axes present in this grid, in flattening order.
    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().take(self.dim())
    }

    /// Whether `axis` exists in this grid.
    pub fn has_axis(&self, axis: Axis) -> bool {
        axis.index() < self.dim()
    }

    /// Cell counts per axis.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Cell count along one axis. Zero if the axis is absent.
    pub fn cells_along(&self, axis: Axis) -> usize {
        self.cells.get(axis.index()).copied().unwrap_or(0)
    }

    /// Node counts per axis.
    pub fn nodes(&self) -> AxisCounts {
        self.cells.iter().map(|n| n + 1).collect()
    }

    /// Total number of cells.
    pub fn n_cells(&self) -> usize {
        self.cells.iter().product()
    }

    /// Total number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.cells.iter().map(|n| n + 1).product()
    }

    /// Shape of the faces normal to `axis`.
    pub fn face_shape(&self, axis: Axis) -> AxisCounts {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &n)| if i == axis.index() { n + 1 } else { n })
            .collect()
    }

    /// Shape of the edges parallel to `axis`.
    pub fn edge_shape(&self, axis: Axis) -> AxisCounts {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &n)| if i == axis.index() { n } else { n + 1 })
            .collect()
    }

    /// Number of faces normal to `axis`. Zero if the axis is absent.
    pub fn n_faces_along(&self, axis: Axis) -> usize {
        if !self.has_axis(axis) {
            return 0;
        }
        self.face_shape(axis).iter().product()
    }

    /// Number of edges parallel to `axis`. Zero if the axis is absent.
    pub fn n_edges_along(&self, axis: Axis) -> usize {
        if !self.has_axis(axis) {
            return 0;
        }
        self.edge_shape(axis).iter().product()
    }

    /// Total number of faces.
    pub fn n_faces(&self) -> usize {
        self.axes().map(|a| self.n_faces_along(a)).sum()
    }

    /// Total number of edges.
    pub fn n_edges(&self) -> usize {
        self.axes().map(|a| self.n_edges_along(a)).sum()
    }

    /// Offset of the `axis` block within the concatenated face vector.
    pub fn face_offset(&self, axis: Axis) -> usize {
        self.axes()
            .take_while(|&a| a != axis)
            .map(|a| self.n_faces_along(a))
            .sum()
    }

    /// Offset of the `axis` block within the concatenated edge vector.
    pub fn edge_offset(&self, axis: Axis) -> usize {
        self.axes()
            .take_while(|&a| a != axis)
            .map(|a| self.n_edges_along(a))
            .sum()
    }
}

/// Flat x-fastest index of a multi-index within `shape`.
pub fn flat_index(shape: &[usize], idx: &[usize]) -> usize {
    let mut flat = 0;
    let mut stride = 1;
    for (&i, &n) in idx.iter().zip(shape) {
        flat += i * stride;
        stride *= n;
    }
    flat
}

/// Multi-index of flat x-fastest position `flat` within `shape`.
pub fn unravel_index(shape: &[usize], mut flat: usize) -> AxisCounts {
    let mut idx = AxisCounts::new();
    for &n in shape {
        idx.push(flat % n);
        flat /= n;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_rejects_zero_axis() {
        assert!(matches!(
            GridShape::new(&[3, 0]),
            Err(OperatorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn new_rejects_bad_dimension() {
        assert!(GridShape::new(&[]).is_err());
        assert!(GridShape::new(&[1, 1, 1, 1]).is_err());
    }

    #[test]
    fn counts_3d() {
        let s = GridShape::new(&[2, 3, 4]).unwrap();
        assert_eq!(s.n_cells(), 24);
        assert_eq!(s.n_nodes(), 3 * 4 * 5);
        assert_eq!(s.n_faces_along(Axis::X), 3 * 3 * 4);
        assert_eq!(s.n_faces_along(Axis::Y), 2 * 4 * 4);
        assert_eq!(s.n_faces_along(Axis::Z), 2 * 3 * 5);
        assert_eq!(s.n_edges_along(Axis::X), 2 * 4 * 5);
        assert_eq!(s.n_edges_along(Axis::Y), 3 * 3 * 5);
        assert_eq!(s.n_edges_along(Axis::Z), 3 * 4 * 4);
    }

    #[test]
    fn counts_1d() {
        let s = GridShape::new(&[5]).unwrap();
        assert_eq!(s.n_faces(), 6);
        assert_eq!(s.n_edges(), 5);
        assert_eq!(s.n_faces_along(Axis::Y), 0);
    }

    #[test]
    fn offsets_follow_axis_order() {
        let s = GridShape::new(&[2, 3]).unwrap();
        assert_eq!(s.face_offset(Axis::X), 0);
        assert_eq!(s.face_offset(Axis::Y), 9);
        assert_eq!(s.edge_offset(Axis::Y), 8);
    }

    #[test]
    fn flat_index_is_x_fastest() {
        assert_eq!(flat_index(&[3, 4], &[1, 0]), 1);
        assert_eq!(flat_index(&[3, 4], &[0, 1]), 3);
        assert_eq!(flat_index(&[3, 4, 5], &[2, 3, 4]), 2 + 3 * 3 + 4 * 12);
    }

    proptest! {
        #[test]
        fn unravel_inverts_flat_index(
            nx in 1usize..6,
            ny in 1usize..6,
            nz in 1usize..6,
            seed in 0usize..1000,
        ) {
            let shape = [nx, ny, nz];
            let flat = seed % (nx * ny * nz);
            let idx = unravel_index(&shape, flat);
            prop_assert_eq!(flat_index(&shape, &idx), flat);
        }

        #[test]
        fn face_and_edge_totals_match_formulas(
            nx in 1usize..6,
            ny in 1usize..6,
            nz in 1usize..6,
        ) {
            let s = GridShape::new(&[nx, ny, nz]).unwrap();
            prop_assert_eq!(
                s.n_faces(),
                (nx + 1) * ny * nz + nx * (ny + 1) * nz + nx * ny * (nz + 1)
            );
            prop_assert_eq!(
                s.n_edges(),
                nx * (ny + 1) * (nz + 1) + (nx + 1) * ny * (nz + 1) + (nx + 1) * (ny + 1) * nz
            );
        }
    }
}
