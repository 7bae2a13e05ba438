//! Boundary-condition types, 1D ghost-point stencils and boundary masks.
//!
//! The cell-centered gradient sees one ghost cell beyond each end of an
//! axis. The condition at that end decides the ghost value:
//!
//! ```text
//! Dirichlet:  u_ghost = -u_1   (boundary value is zero)
//! Neumann:    u_ghost =  u_1   (normal derivative is zero)
//! ```
//!
//! Substituting the ghost value into the difference `u_1 - u_ghost`
//! yields the boundary-row coefficient `2` (Dirichlet) or `0` (Neumann).

use crate::error::OperatorError;
use crate::shape::{unravel_index, Axis};
use crate::sparse::{from_triplets, speye, select_rows, SparseMatrix};
use std::fmt;
use std::str::FromStr;

/// Condition applied at one end of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryCondition {
    /// Prescribed (zero) value at the boundary.
    Dirichlet,
    /// Prescribed (zero) normal derivative at the boundary.
    #[default]
    Neumann,
}

impl FromStr for BoundaryCondition {
    type Err = OperatorError;

    /// Accepts exactly `"dirichlet"` or `"neumann"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dirichlet" => Ok(Self::Dirichlet),
            "neumann" => Ok(Self::Neumann),
            other => Err(OperatorError::invalid(format!(
                "boundary condition must be 'dirichlet' or 'neumann', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dirichlet => write!(f, "dirichlet"),
            Self::Neumann => write!(f, "neumann"),
        }
    }
}

/// Conditions at the lower and upper end of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AxisBc {
    /// Condition at the low-index end.
    pub lower: BoundaryCondition,
    /// Condition at the high-index end.
    pub upper: BoundaryCondition,
}

impl AxisBc {
    /// Both ends share one condition.
    pub const fn both(bc: BoundaryCondition) -> Self {
        Self { lower: bc, upper: bc }
    }

    /// Independent conditions per end.
    pub const fn new(lower: BoundaryCondition, upper: BoundaryCondition) -> Self {
        Self { lower, upper }
    }
}

/// Cell-centered gradient stencil with ghost points substituted.
///
/// Shape `(n + 1) x n`, mapping cells to faces. Interior row `i` is
/// `u_i - u_{i-1}`; the two boundary rows carry the ghost-point
/// coefficient for the chosen condition.
///
/// ```
/// use finvol_core::boundary::{ddx_cell_grad, AxisBc, BoundaryCondition};
/// use nalgebra::DMatrix;
///
/// let g = DMatrix::from(&ddx_cell_grad(2, AxisBc::both(BoundaryCondition::Dirichlet)).unwrap());
/// assert_eq!(g, DMatrix::from_row_slice(3, 2, &[2.0, 0.0, -1.0, 1.0, 0.0, -2.0]));
/// ```
pub fn ddx_cell_grad(n: usize, bc: AxisBc) -> Result<SparseMatrix, OperatorError> {
    if n < 1 {
        return Err(OperatorError::invalid("ddx_cell_grad needs at least one cell"));
    }
    let mut triplets = Vec::with_capacity(2 * n);
    let lower = match bc.lower {
        BoundaryCondition::Dirichlet => 2.0,
        BoundaryCondition::Neumann => 0.0,
    };
    triplets.push((0, 0, lower));
    for i in 1..n {
        triplets.push((i, i - 1, -1.0));
        triplets.push((i, i, 1.0));
    }
    let upper = match bc.upper {
        BoundaryCondition::Dirichlet => -2.0,
        BoundaryCondition::Neumann => 0.0,
    };
    triplets.push((n, n - 1, upper));
    Ok(from_triplets(n + 1, n, triplets))
}

/// Boundary-value companion of [`ddx_cell_grad`].
///
/// Shape `(n + 1) x 2`: column 0 feeds the lower boundary value into face
/// 0, column 1 feeds the upper value into face `n`. Dirichlet ends carry
/// `-2` / `+2`; Neumann ends carry nothing.
pub fn ddx_cell_grad_bc(n: usize, bc: AxisBc) -> Result<SparseMatrix, OperatorError> {
    if n < 1 {
        return Err(OperatorError::invalid(
            "ddx_cell_grad_bc needs at least one cell",
        ));
    }
    let lower = match bc.lower {
        BoundaryCondition::Dirichlet => -2.0,
        BoundaryCondition::Neumann => 0.0,
    };
    let upper = match bc.upper {
        BoundaryCondition::Dirichlet => 2.0,
        BoundaryCondition::Neumann => 0.0,
    };
    Ok(from_triplets(n + 1, 2, [(0, 0, lower), (n, 1, upper)]))
}

/// Outward-signed selector of the Dirichlet ends, shape `(n + 1) x 2`.
pub fn proj_dirichlet(n: usize, bc: AxisBc) -> SparseMatrix {
    let lower = if bc.lower == BoundaryCondition::Dirichlet { -1.0 } else { 0.0 };
    let upper = if bc.upper == BoundaryCondition::Dirichlet { 1.0 } else { 0.0 };
    from_triplets(n + 1, 2, [(0, 0, lower), (n, 1, upper)])
}

/// Selector of the faces that stay unknown: every face except Neumann ends.
pub fn proj_neumann_in(n: usize, bc: AxisBc) -> Result<SparseMatrix, OperatorError> {
    let mut keep = vec![true; n + 1];
    if bc.lower == BoundaryCondition::Neumann {
        keep[0] = false;
    }
    if bc.upper == BoundaryCondition::Neumann {
        keep[n] = false;
    }
    select_rows(&speye(n + 1), &keep)
}

/// Selector of the Neumann end faces, shape `2 x (n + 1)`.
pub fn proj_neumann_out(n: usize, bc: AxisBc) -> SparseMatrix {
    let lower = if bc.lower == BoundaryCondition::Neumann { 1.0 } else { 0.0 };
    let upper = if bc.upper == BoundaryCondition::Neumann { 1.0 } else { 0.0 };
    from_triplets(2, n + 1, [(0, 0, lower), (1, n, upper)])
}

/// Selector of both end faces regardless of condition, shape `(n + 1) x 2`.
pub fn proj_ends(n: usize) -> SparseMatrix {
    from_triplets(n + 1, 2, [(0, 0, 1.0), (n, 1, 1.0)])
}

/// Boundary membership for an x-fastest array of the given `shape`.
///
/// An entry is on the boundary if its index is the first or last along
/// any of the axes in `dirs`. Axes in `dirs` beyond `shape.len()` are
/// ignored.
pub fn boundary_mask(shape: &[usize], dirs: &[Axis]) -> Vec<bool> {
    let total: usize = shape.iter().product();
    (0..total)
        .map(|flat| {
            let idx = unravel_index(shape, flat);
            dirs.iter().any(|a| {
                let i = a.index();
                i < shape.len() && (idx[i] == 0 || idx[i] + 1 == shape[i])
            })
        })
        .collect()
}
