//! Mesh geometry for finvol operators.
//!
//! Operator construction never computes geometry itself. It consumes a
//! [`MeshGeometry`] implementation, which supplies counts, cell volumes,
//! face areas, edge lengths, coordinates and orientation vectors.
//!
//! # Backends
//!
//! - [`TensorMesh`]: rectilinear tensor-product mesh from per-axis widths

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod tensor;

pub use error::MeshError;
pub use geometry::MeshGeometry;
pub use tensor::TensorMesh;
