//! Kronecker assembly of per-axis factors into full-grid operators.
//!
//! An operator on an N-D grid is the Kronecker product of one factor per
//! axis, composed so that x varies fastest:
//!
//! ```text
//! 1D:  F_x
//! 2D:  F_y ⊗ F_x
//! 3D:  F_z ⊗ F_y ⊗ F_x
//! ```
//!
//! The active axis gets the 1D stencil; passive axes get identities sized
//! to the cell or node count along that axis.

use crate::error::OperatorError;
use crate::shape::{Axis, GridShape};
use crate::sparse::{kron, speye, SparseMatrix};

/// Which count a passive identity factor is sized to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    /// `n` along the axis.
    Cells,
    /// `n + 1` along the axis.
    Nodes,
}

impl Extent {
    /// Length of this extent along an axis with `n` cells.
    pub const fn len(self, n: usize) -> usize {
        match self {
            Extent::Cells => n,
            Extent::Nodes => n + 1,
        }
    }
}

/// Identity sized to `extent` along an axis with `n` cells.
pub fn eye(extent: Extent, n: usize) -> SparseMatrix {
    speye(extent.len(n))
}

/// Combine per-axis factors, given x first, into one operator.
pub fn tensor_product(factors: &[SparseMatrix]) -> Result<SparseMatrix, OperatorError> {
    let (first, rest) = factors.split_first().ok_or_else(|| {
        OperatorError::invalid("tensor product needs at least one factor")
    })?;
    Ok(rest.iter().fold(first.clone(), |acc, f| kron(f, &acc)))
}

/// Build one factor per grid axis and combine them.
///
/// `factor` receives each axis and its cell count, in x, y, z order.
pub fn assemble<F>(shape: &GridShape, mut factor: F) -> Result<SparseMatrix, OperatorError>
where
    F: FnMut(Axis, usize) -> Result<SparseMatrix, OperatorError>,
{
    let factors = shape
        .axes()
        .map(|a| factor(a, shape.cells_along(a)))
        .collect::<Result<Vec<_>, _>>()?;
    tensor_product(&factors)
}

/// Operator with `stencil(n_active)` on `axis` and identities elsewhere.
///
/// This is the common directional case: face divergence and cell
/// gradient use [`Extent::Cells`] for passive axes, nodal gradient and
/// node-to-edge averaging use [`Extent::Nodes`].
pub fn directional<S>(
    shape: &GridShape,
    axis: Axis,
    passive: Extent,
    stencil: S,
) -> Result<SparseMatrix, OperatorError>
where
    S: Fn(usize) -> Result<SparseMatrix, OperatorError>,
{
    if !shape.has_axis(axis) {
        return Err(OperatorError::invalid(format!(
            "axis {axis} does not exist in a {}D grid",
            shape.dim()
        )));
    }
    assemble(shape, |a, n| {
        if a == axis {
            stencil(n)
        } else {
            Ok(eye(passive, n))
        }
    })
}
