//! Error types for operator construction.
//!
//! Every failure in the operator layer is synchronous and local: there is
//! no I/O, so nothing is retried. Errors are grouped by cause: invalid
//! configuration, dimensionality, missing features, and internal shape
//! consistency.

use std::error::Error;
use std::fmt;

/// Errors arising from stencil assembly or operator construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorError {
    /// An argument or configuration value was rejected.
    ///
    /// Covers bad boundary-condition tokens, wrong-length BC lists,
    /// stencil sizes below one, and inconsistent Robin coefficients.
    InvalidArgument {
        /// What went wrong.
        reason: String,
    },
    /// The requested operator does not exist for this mesh dimension.
    ///
    /// Raised uniformly for every axis-specific operator whose axis lies
    /// beyond the mesh dimension (e.g. `face_z_divergence` on a 2D mesh).
    Unsupported {
        /// Name of the requested operator.
        operator: &'static str,
        /// Dimension of the mesh it was requested on.
        dim: usize,
    },
    /// The operator is not implemented for this configuration.
    NotImplemented {
        /// Description of the missing feature.
        feature: &'static str,
    },
    /// Blocks handed to a sparse assembly routine have incompatible shapes.
    ShapeMismatch {
        /// Which assembly step detected the mismatch.
        context: &'static str,
        /// The dimension every block was expected to share.
        expected: usize,
        /// The dimension actually found.
        actual: usize,
    },
    /// The operator cache lock was poisoned by a panicking builder.
    CachePoisoned,
}

impl OperatorError {
    /// Shorthand for [`OperatorError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::Unsupported { operator, dim } => {
                write!(f, "operator '{operator}' is not defined for a {dim}D mesh")
            }
            Self::NotImplemented { feature } => write!(f, "not implemented: {feature}"),
            Self::ShapeMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "shape mismatch in {context}: expected {expected}, got {actual}"
            ),
            Self::CachePoisoned => write!(f, "operator cache lock poisoned"),
        }
    }
}

impl Error for OperatorError {}
