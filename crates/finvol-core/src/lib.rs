//! Core building blocks for finvol operators.
//!
//! This crate holds everything that depends only on grid *topology*:
//!
//! - [`GridShape`] and [`Axis`]: per-axis cell counts and the derived
//!   counts of nodes, faces and edges, all in x-fastest ordering.
//! - [`sparse`]: CSR construction, Kronecker products and block assembly.
//! - [`stencil`]: 1D difference and averaging primitives.
//! - [`tensor`]: Kronecker composition of 1D stencils into N-D operators.
//! - [`boundary`]: boundary-condition types, ghost-point stencils and
//!   boundary-membership masks.
//!
//! Geometry (volumes, areas, lengths) lives in `finvol-mesh`; operators
//! that combine the two live in `finvol-ops`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod shape;
pub mod sparse;
pub mod stencil;
pub mod tensor;

pub use boundary::{AxisBc, BoundaryCondition};
pub use error::OperatorError;
pub use shape::{Axis, AxisCounts, GridShape};
pub use sparse::SparseMatrix;
pub use tensor::Extent;
