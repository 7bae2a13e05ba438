//! Differential, averaging and boundary operators for finite-volume meshes.
//!
//! [`DiffOperators`] wraps a [`MeshGeometry`](finvol_mesh::MeshGeometry)
//! and builds sparse operators on demand, memoizing each one in an
//! [`OperatorCache`]. Every operator is a
//! [`SparseMatrix`](finvol_core::SparseMatrix) in the mesh's x-fastest
//! ordering.
//!
//! | Family | Methods |
//! |--------|---------|
//! | Divergence | `face_divergence`, `face_axis_divergence` |
//! | Gradient | `nodal_gradient`, `cell_gradient`, `cell_gradient_axis`, `cell_gradient_bc` |
//! | Curl | `edge_curl` |
//! | Laplacian | `nodal_laplacian` |
//! | Averaging | `average_*` |
//! | Boundary | `project_*_to_boundary_*`, `bc_projections`, `boundary_*_integral` |
//! | Robin | `cell_gradient_weak_form_robin`, `edge_divergence_weak_form_robin` |
//!
//! Stencil forms (`*_stencil`) carry only the difference structure; the
//! full operators fold in volumes, areas and lengths.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod averaging;
pub mod cache;
pub mod config;
pub mod curl;
pub mod divergence;
pub mod gradient;
pub mod integral;
pub mod laplacian;
pub mod operators;
pub mod projection;
pub mod robin;

pub use cache::{OperatorCache, OperatorKind};
pub use config::{AxisSpec, BcSpec, CellGradientBc};
pub use operators::DiffOperators;
pub use projection::BcProjections;
pub use robin::RobinCoefficient;
