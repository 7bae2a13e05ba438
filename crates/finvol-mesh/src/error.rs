//! Error types for mesh construction.

use std::fmt;

/// Errors arising from mesh construction.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshError {
    /// The mesh must have 1, 2 or 3 axes.
    InvalidDimension {
        /// Number of axes supplied.
        dim: usize,
    },
    /// An axis was given no cells.
    EmptyAxis {
        /// Index of the empty axis.
        axis: usize,
    },
    /// A cell width is zero, negative or not finite.
    NonPositiveWidth {
        /// Axis of the offending cell.
        axis: usize,
        /// Position of the cell along that axis.
        index: usize,
        /// The rejected width.
        value: f64,
    },
    /// The origin does not have one entry per axis.
    OriginMismatch {
        /// Number of axes of the mesh.
        expected: usize,
        /// Length of the supplied origin.
        actual: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { dim } => {
                write!(f, "mesh must have 1 to 3 axes, got {dim}")
            }
            Self::EmptyAxis { axis } => write!(f, "axis {axis} has no cells"),
            Self::NonPositiveWidth { axis, index, value } => {
                write!(f, "cell {index} on axis {axis} has invalid width {value}")
            }
            Self::OriginMismatch { expected, actual } => {
                write!(f, "origin has {actual} entries, mesh has {expected} axes")
            }
        }
    }
}

impl std::error::Error for MeshError {}
