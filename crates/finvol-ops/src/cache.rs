//! Per-mesh operator cache with BC-based invalidation.
//!
//! [`OperatorCache`] memoizes built operators by [`OperatorKind`]. Mesh
//! geometry is immutable, so most entries live as long as the owning
//! [`DiffOperators`](crate::DiffOperators). Entries whose
//! [`depends_on_cell_gradient_bc`](OperatorKind::depends_on_cell_gradient_bc)
//! is true are evicted whenever the cell-gradient BC changes.
//!
//! # Locking
//!
//! The map sits behind a `Mutex`. Lookups take the lock briefly; builders
//! run *without* the lock because they recurse into other cached
//! operators. If two threads race to build the same operator, the first
//! insert wins and both callers receive that instance.

use finvol_core::{Axis, OperatorError, SparseMatrix};
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Identity of a cached operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Topological face divergence.
    FaceDivergenceStencil,
    /// Scaled face divergence.
    FaceDivergence,
    /// Scaled face divergence of one face orientation.
    FaceAxisDivergence(Axis),
    /// Topological nodal gradient.
    NodalGradientStencil,
    /// Scaled nodal gradient.
    NodalGradient,
    /// Nodal Laplacian.
    NodalLaplacian,
    /// Cell-gradient stencil under the configured BC.
    CellGradientStencil,
    /// Scaled cell gradient under the configured BC.
    CellGradient,
    /// Scaled cell gradient along one axis (Neumann ends).
    CellGradientAxis(Axis),
    /// Boundary-value companion of the cell gradient.
    CellGradientBc,
    /// Topological edge curl.
    EdgeCurlStencil,
    /// Scaled edge curl.
    EdgeCurl,
    /// Scalar face-to-cell average.
    AverageFaceToCell,
    /// Vector face-to-cell average.
    AverageFaceToCellVector,
    /// Face-to-cell average of one face orientation.
    AverageFaceAxisToCell(Axis),
    /// Scalar cell-to-face average.
    AverageCellToFace,
    /// Vector cell-to-face average.
    AverageCellVectorToFace,
    /// Scalar cell-to-edge average.
    AverageCellToEdge,
    /// Scalar edge-to-cell average.
    AverageEdgeToCell,
    /// Vector edge-to-cell average.
    AverageEdgeToCellVector,
    /// Edge-to-cell average of one edge orientation.
    AverageEdgeAxisToCell(Axis),
    /// Vector edge-to-face average.
    AverageEdgeToFaceVector,
    /// Node-to-cell average.
    AverageNodeToCell,
    /// Node-to-edge average.
    AverageNodeToEdge,
    /// Node-to-face average.
    AverageNodeToFace,
    /// Face to boundary-face selection.
    ProjectFaceToBoundaryFace,
    /// Edge to boundary-edge selection.
    ProjectEdgeToBoundaryEdge,
    /// Node to boundary-node selection.
    ProjectNodeToBoundaryNode,
    /// Boundary integral of a scalar times the normal flux.
    BoundaryFaceScalarIntegral,
    /// Boundary integral of a tangential cross product on edges.
    BoundaryEdgeVectorIntegral,
    /// Boundary integral of a normal component on nodes.
    BoundaryNodeVectorIntegral,
}

impl OperatorKind {
    /// Whether this operator must be rebuilt after a cell-gradient BC change.
    pub const fn depends_on_cell_gradient_bc(self) -> bool {
        matches!(
            self,
            Self::CellGradientStencil | Self::CellGradient | Self::CellGradientBc
        )
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FaceAxisDivergence(a) => write!(f, "face_{a}_divergence"),
            Self::CellGradientAxis(a) => write!(f, "cell_gradient_{a}"),
            Self::AverageFaceAxisToCell(a) => write!(f, "average_face_{a}_to_cell"),
            Self::AverageEdgeAxisToCell(a) => write!(f, "average_edge_{a}_to_cell"),
            Self::FaceDivergenceStencil => f.write_str("face_divergence_stencil"),
            Self::FaceDivergence => f.write_str("face_divergence"),
            Self::NodalGradientStencil => f.write_str("nodal_gradient_stencil"),
            Self::NodalGradient => f.write_str("nodal_gradient"),
            Self::NodalLaplacian => f.write_str("nodal_laplacian"),
            Self::CellGradientStencil => f.write_str("cell_gradient_stencil"),
            Self::CellGradient => f.write_str("cell_gradient"),
            Self::CellGradientBc => f.write_str("cell_gradient_bc"),
            Self::EdgeCurlStencil => f.write_str("edge_curl_stencil"),
            Self::EdgeCurl => f.write_str("edge_curl"),
            Self::AverageFaceToCell => f.write_str("average_face_to_cell"),
            Self::AverageFaceToCellVector => f.write_str("average_face_to_cell_vector"),
            Self::AverageCellToFace => f.write_str("average_cell_to_face"),
            Self::AverageCellVectorToFace => f.write_str("average_cell_vector_to_face"),
            Self::AverageCellToEdge => f.write_str("average_cell_to_edge"),
            Self::AverageEdgeToCell => f.write_str("average_edge_to_cell"),
            Self::AverageEdgeToCellVector => f.write_str("average_edge_to_cell_vector"),
            Self::AverageEdgeToFaceVector => f.write_str("average_edge_to_face_vector"),
            Self::AverageNodeToCell => f.write_str("average_node_to_cell"),
            Self::AverageNodeToEdge => f.write_str("average_node_to_edge"),
            Self::AverageNodeToFace => f.write_str("average_node_to_face"),
            Self::ProjectFaceToBoundaryFace => f.write_str("project_face_to_boundary_face"),
            Self::ProjectEdgeToBoundaryEdge => f.write_str("project_edge_to_boundary_edge"),
            Self::ProjectNodeToBoundaryNode => f.write_str("project_node_to_boundary_node"),
            Self::BoundaryFaceScalarIntegral => f.write_str("boundary_face_scalar_integral"),
            Self::BoundaryEdgeVectorIntegral => f.write_str("boundary_edge_vector_integral"),
            Self::BoundaryNodeVectorIntegral => f.write_str("boundary_node_vector_integral"),
        }
    }
}

/// Memo table of built operators, keyed by [`OperatorKind`].
#[derive(Debug, Default)]
pub struct OperatorCache {
    entries: Mutex<IndexMap<OperatorKind, Arc<SparseMatrix>>>,
}

impl OperatorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached operator for `kind`, building it on first use.
    ///
    /// Build errors are returned unchanged and leave the cache untouched.
    pub fn get_or_build<F>(
        &self,
        kind: OperatorKind,
        build: F,
    ) -> Result<Arc<SparseMatrix>, OperatorError>
    where
        F: FnOnce() -> Result<SparseMatrix, OperatorError>,
    {
        if let Some(hit) = self.get(kind)? {
            trace!(operator = %kind, "operator cache hit");
            return Ok(hit);
        }

        let built = build()?;
        debug!(
            operator = %kind,
            rows = built.nrows(),
            cols = built.ncols(),
            nnz = built.nnz(),
            "built operator"
        );

        let mut entries = self.entries.lock().map_err(|_| OperatorError::CachePoisoned)?;
        let entry = entries.entry(kind).or_insert_with(|| Arc::new(built));
        Ok(Arc::clone(entry))
    }

    /// The cached operator for `kind`, if built.
    pub fn get(&self, kind: OperatorKind) -> Result<Option<Arc<SparseMatrix>>, OperatorError> {
        let entries = self.entries.lock().map_err(|_| OperatorError::CachePoisoned)?;
        Ok(entries.get(&kind).cloned())
    }

    /// Whether an operator for `kind` is cached.
    pub fn contains(&self, kind: OperatorKind) -> Result<bool, OperatorError> {
        let entries = self.entries.lock().map_err(|_| OperatorError::CachePoisoned)?;
        Ok(entries.contains_key(&kind))
    }

    /// Number of cached operators.
    pub fn len(&self) -> Result<usize, OperatorError> {
        let entries = self.entries.lock().map_err(|_| OperatorError::CachePoisoned)?;
        Ok(entries.len())
    }

    /// Whether the cache holds no operators.
    pub fn is_empty(&self) -> Result<bool, OperatorError> {
        Ok(self.len()? == 0)
    }

    /// Evict every entry whose kind matches `pred`. Returns the count evicted.
    ///
    /// Takes `&mut self`: eviction only happens while the owner holds
    /// exclusive access, so no reader can observe a half-invalidated set.
    pub fn invalidate_where<P>(&mut self, pred: P) -> usize
    where
        P: Fn(OperatorKind) -> bool,
    {
        let entries = match self.entries.get_mut() {
            Ok(e) => e,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = entries.len();
        entries.retain(|k, _| !pred(*k));
        before - entries.len()
    }

    /// Evict everything.
    pub fn clear(&mut self) {
        self.invalidate_where(|_| true);
    }
}
