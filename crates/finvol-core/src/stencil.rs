//! 1D stencil primitives.
//!
//! Topology-only matrices for a single axis with `n` cells and `n + 1`
//! nodes. Geometry enters later, as diagonal scalings.
//!
//! | Primitive | Shape | Maps |
//! |-----------|-------|------|
//! | [`ddx`] | `n x (n+1)` | nodes to cells, difference |
//! | [`av`] | `n x (n+1)` | nodes to cells, average |
//! | [`av_extrap`] | `(n+1) x n` | cells to nodes, average with nearest-cell ends |
//! | [`av_extrap_linear`] | `(n+1) x n` | cells to nodes, average with linear ends |

use crate::error::OperatorError;
use crate::sparse::{from_triplets, SparseMatrix};

fn require_cells(n: usize, what: &str) -> Result<(), OperatorError> {
    if n < 1 {
        return Err(OperatorError::invalid(format!(
            "{what} needs at least one cell, got {n}"
        )));
    }
    Ok(())
}

/// Forward difference: `D[i, i] = -1`, `D[i, i + 1] = +1`.
///
/// Always low-to-high. Applied along the active axis it is the face
/// divergence stencil (faces to cells) and the nodal gradient stencil
/// (nodes to edges).
///
/// ```
/// use finvol_core::stencil::ddx;
/// use nalgebra::DMatrix;
///
/// let d = DMatrix::from(&ddx(2).unwrap());
/// assert_eq!(d, DMatrix::from_row_slice(2, 3, &[-1.0, 1.0, 0.0, 0.0, -1.0, 1.0]));
/// ```
pub fn ddx(n: usize) -> Result<SparseMatrix, OperatorError> {
    require_cells(n, "ddx")?;
    Ok(from_triplets(
        n,
        n + 1,
        (0..n).flat_map(|i| [(i, i, -1.0), (i, i + 1, 1.0)]),
    ))
}

/// Two-point average: `A[i, i] = A[i, i + 1] = 0.5`.
pub fn av(n: usize) -> Result<SparseMatrix, OperatorError> {
    require_cells(n, "av")?;
    Ok(from_triplets(
        n,
        n + 1,
        (0..n).flat_map(|i| [(i, i, 0.5), (i, i + 1, 0.5)]),
    ))
}

/// Cell-to-node average that copies the nearest cell onto the two ends.
///
/// Interior rows average the two adjacent cells; the outer rows take
/// weight `1` on the single cell they touch. Every row sums to one and
/// all weights are non-negative, so interpolated volumes stay positive
/// and the end values sit half a cell away from the boundary.
pub fn av_extrap(n: usize) -> Result<SparseMatrix, OperatorError> {
    require_cells(n, "av_extrap")?;
    let mut triplets = Vec::with_capacity(2 * n);
    triplets.push((0, 0, 1.0));
    for i in 1..n {
        triplets.push((i, i - 1, 0.5));
        triplets.push((i, i, 0.5));
    }
    triplets.push((n, n - 1, 1.0));
    Ok(from_triplets(n + 1, n, triplets))
}

/// Cell-to-node average with linear extrapolation at the ends.
///
/// Outer rows use weights `1.5` / `-0.5` on the two nearest cells, which
/// is exact for fields linear in the cell index. With a single cell
/// there is nothing to extrapolate from and the ends copy that cell.
pub fn av_extrap_linear(n: usize) -> Result<SparseMatrix, OperatorError> {
    if n < 2 {
        return av_extrap(n);
    }
    let mut triplets = Vec::with_capacity(2 * n + 2);
    triplets.push((0, 0, 1.5));
    triplets.push((0, 1, -0.5));
    for i in 1..n {
        triplets.push((i, i - 1, 0.5));
        triplets.push((i, i, 0.5));
    }
    triplets.push((n, n - 1, 1.5));
    triplets.push((n, n - 2, -0.5));
    Ok(from_triplets(n + 1, n, triplets))
}
