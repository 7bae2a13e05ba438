//! finvol: sparse finite-volume operators for structured meshes.
//!
//! This is the facade crate that re-exports the public API from the
//! finvol sub-crates. Most users only need `finvol` as a dependency.
//!
//! # Quick start
//!
//! ```rust
//! use finvol::prelude::*;
//!
//! // 8 x 4 cells on [0, 2] x [0, 1]
//! let mesh = TensorMesh::uniform(&[8, 4], 0.25).unwrap();
//! let ops = DiffOperators::new(mesh).unwrap();
//!
//! let div = ops.face_divergence().unwrap();
//! let grad = ops.cell_gradient().unwrap();
//! assert_eq!((div.nrows(), div.ncols()), (32, grad.nrows()));
//!
//! // Dirichlet on every side rebuilds only the cell-gradient family
//! let mut ops = ops;
//! ops.set_cell_gradient_bc_spec(&BcSpec::all("dirichlet")).unwrap();
//! assert!(ops.cache().contains(OperatorKind::FaceDivergence).unwrap());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `finvol-core` | Grid shapes, sparse helpers, 1D stencils, BC types |
//! | [`mesh`] | `finvol-mesh` | The mesh geometry trait and the tensor mesh |
//! | [`ops`] | `finvol-ops` | Operator construction, caching, boundary terms |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid topology, sparse assembly and 1D stencils (`finvol-core`).
pub use finvol_core as core;

/// Mesh geometry (`finvol-mesh`).
///
/// Implement [`mesh::MeshGeometry`] to drive the operators from your own
/// mesh type, or use [`mesh::TensorMesh`].
pub use finvol_mesh as mesh;

/// Operator construction (`finvol-ops`).
///
/// Everything hangs off [`ops::DiffOperators`].
pub use finvol_ops as ops;

/// Common imports for typical finvol usage.
///
/// ```rust
/// use finvol::prelude::*;
/// ```
pub mod prelude {
    // Topology and errors
    pub use finvol_core::{Axis, AxisBc, BoundaryCondition, GridShape, OperatorError, SparseMatrix};

    // Mesh
    pub use finvol_mesh::{MeshError, MeshGeometry, TensorMesh};

    // Operators
    pub use finvol_ops::{
        BcProjections, BcSpec, CellGradientBc, DiffOperators, OperatorKind, RobinCoefficient,
    };
}
