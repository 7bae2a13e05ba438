//! The per-mesh operator set.

use crate::cache::{OperatorCache, OperatorKind};
use crate::config::{BcSpec, CellGradientBc};
use finvol_core::{Axis, GridShape, OperatorError, SparseMatrix};
use finvol_mesh::MeshGeometry;
use std::sync::Arc;
use tracing::debug;

/// Differential, averaging and boundary operators for one mesh.
///
/// Operators are built lazily on first request and memoized for the
/// lifetime of this value. Mesh geometry is owned and immutable; the only
/// mutable configuration is the [`CellGradientBc`], and changing it
/// evicts exactly the cell-gradient family from the cache.
///
/// Any method that names an axis the mesh does not have returns
/// [`OperatorError::Unsupported`].
///
/// # Examples
///
/// ```
/// use finvol_mesh::TensorMesh;
/// use finvol_ops::DiffOperators;
/// use nalgebra::DMatrix;
///
/// let ops = DiffOperators::new(TensorMesh::uniform(&[2], 1.0).unwrap()).unwrap();
/// let div = DMatrix::from(&*ops.face_divergence().unwrap());
/// assert_eq!(div, DMatrix::from_row_slice(2, 3, &[-1.0, 1.0, 0.0, 0.0, -1.0, 1.0]));
/// ```
#[derive(Debug)]
pub struct DiffOperators<M> {
    mesh: M,
    cell_gradient_bc: CellGradientBc,
    cache: OperatorCache,
}

impl<M: MeshGeometry> DiffOperators<M> {
    /// Operator set with the default cell-gradient BC (Neumann everywhere).
    pub fn new(mesh: M) -> Result<Self, OperatorError> {
        let bc = CellGradientBc::neumann(mesh.dim())?;
        Ok(Self::from_parts(mesh, bc))
    }

    /// Operator set with an explicit cell-gradient BC.
    pub fn with_bc(mesh: M, bc: CellGradientBc) -> Result<Self, OperatorError> {
        bc.check_dim(mesh.dim())?;
        Ok(Self::from_parts(mesh, bc))
    }

    fn from_parts(mesh: M, cell_gradient_bc: CellGradientBc) -> Self {
        Self {
            mesh,
            cell_gradient_bc,
            cache: OperatorCache::new(),
        }
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Give back the mesh, dropping every cached operator.
    pub fn into_mesh(self) -> M {
        self.mesh
    }

    /// Cell counts of the underlying mesh.
    pub fn shape(&self) -> &GridShape {
        self.mesh.shape()
    }

    /// Number of mesh axes.
    pub fn dim(&self) -> usize {
        self.mesh.dim()
    }

    /// Current cell-gradient BC.
    pub fn cell_gradient_bc_config(&self) -> &CellGradientBc {
        &self.cell_gradient_bc
    }

    /// The operator memo table.
    pub fn cache(&self) -> &OperatorCache {
        &self.cache
    }

    /// Replace the cell-gradient BC in place.
    ///
    /// Evicts the cached cell-gradient family; every other operator stays.
    /// Setting the current value again is a no-op.
    pub fn set_cell_gradient_bc(&mut self, bc: CellGradientBc) -> Result<(), OperatorError> {
        bc.check_dim(self.dim())?;
        if bc == self.cell_gradient_bc {
            return Ok(());
        }
        self.cell_gradient_bc = bc;
        let evicted = self
            .cache
            .invalidate_where(OperatorKind::depends_on_cell_gradient_bc);
        debug!(
            evicted,
            bc = ?self.cell_gradient_bc,
            "cell gradient boundary conditions changed"
        );
        Ok(())
    }

    /// Resolve a token specification and apply it with
    /// [`set_cell_gradient_bc`](Self::set_cell_gradient_bc).
    pub fn set_cell_gradient_bc_spec(&mut self, spec: &BcSpec) -> Result<(), OperatorError> {
        let bc = spec.resolve(self.dim())?;
        self.set_cell_gradient_bc(bc)
    }

    /// Consume this set and return one configured with `bc`.
    pub fn with_cell_gradient_bc(mut self, bc: CellGradientBc) -> Result<Self, OperatorError> {
        self.set_cell_gradient_bc(bc)?;
        Ok(self)
    }

    pub(crate) fn cached<F>(
        &self,
        kind: OperatorKind,
        build: F,
    ) -> Result<Arc<SparseMatrix>, OperatorError>
    where
        F: FnOnce() -> Result<SparseMatrix, OperatorError>,
    {
        self.cache.get_or_build(kind, build)
    }

    pub(crate) fn require_axis(
        &self,
        axis: Axis,
        operator: &'static str,
    ) -> Result<(), OperatorError> {
        if !self.shape().has_axis(axis) {
            return Err(OperatorError::Unsupported {
                operator,
                dim: self.dim(),
            });
        }
        Ok(())
    }

    pub(crate) fn require_min_dim(
        &self,
        min: usize,
        operator: &'static str,
    ) -> Result<(), OperatorError> {
        if self.dim() < min {
            return Err(OperatorError::Unsupported {
                operator,
                dim: self.dim(),
            });
        }
        Ok(())
    }

    /// Face areas of the faces normal to `axis`.
    pub(crate) fn face_areas_along(&self, axis: Axis) -> &[f64] {
        let shape = self.shape();
        let off = shape.face_offset(axis);
        &self.mesh.face_areas()[off..off + shape.n_faces_along(axis)]
    }
}

/// Pick the per-axis name of a directional operator.
pub(crate) const fn axis_name(axis: Axis, names: [&'static str; 3]) -> &'static str {
    names[axis.index()]
}
