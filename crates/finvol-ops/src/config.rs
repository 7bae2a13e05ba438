//! Cell-gradient boundary-condition configuration.
//!
//! [`BcSpec`] is the token-based surface: a single token, or one entry
//! per axis that is either a token or a `[lower, upper]` pair. It is
//! resolved once into a typed [`CellGradientBc`] and never consulted
//! again.

use finvol_core::{AxisBc, BoundaryCondition, OperatorError};
use smallvec::SmallVec;

/// Token-based per-axis entry of a [`BcSpec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AxisSpec {
    /// One token for both ends of the axis.
    Both(String),
    /// One token per end; must have exactly two entries.
    Sides(Vec<String>),
}

/// Token-based boundary-condition specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BcSpec {
    /// The same token on every side of every axis.
    All(String),
    /// One entry per axis; length must equal the mesh dimension.
    PerAxis(Vec<AxisSpec>),
}

impl BcSpec {
    /// Shorthand for [`BcSpec::All`].
    pub fn all(token: impl Into<String>) -> Self {
        Self::All(token.into())
    }

    /// Validate against a `dim`-dimensional mesh and resolve to typed form.
    pub fn resolve(&self, dim: usize) -> Result<CellGradientBc, OperatorError> {
        match self {
            Self::All(token) => {
                let bc: BoundaryCondition = token.parse()?;
                CellGradientBc::uniform(dim, bc)
            }
            Self::PerAxis(axes) => {
                if axes.len() != dim {
                    return Err(OperatorError::invalid(format!(
                        "boundary condition list must have one entry per axis ({dim}), got {}",
                        axes.len()
                    )));
                }
                let resolved = axes
                    .iter()
                    .map(AxisSpec::resolve)
                    .collect::<Result<SmallVec<[AxisBc; 3]>, _>>()?;
                CellGradientBc::per_axis(&resolved)
            }
        }
    }
}

impl AxisSpec {
    fn resolve(&self) -> Result<AxisBc, OperatorError> {
        match self {
            Self::Both(token) => Ok(AxisBc::both(token.parse()?)),
            Self::Sides(tokens) => match tokens.as_slice() {
                [lower, upper] => Ok(AxisBc::new(lower.parse()?, upper.parse()?)),
                other => Err(OperatorError::invalid(format!(
                    "per-axis boundary condition needs exactly 2 entries, got {}",
                    other.len()
                ))),
            },
        }
    }
}

/// Validated cell-gradient BC: one [`AxisBc`] per mesh axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGradientBc {
    axes: SmallVec<[AxisBc; 3]>,
}

impl CellGradientBc {
    /// Same condition on every side of a `dim`-dimensional mesh.
    pub fn uniform(dim: usize, bc: BoundaryCondition) -> Result<Self, OperatorError> {
        check_dim(dim)?;
        Ok(Self {
            axes: std::iter::repeat(AxisBc::both(bc)).take(dim).collect(),
        })
    }

    /// Neumann on every side.
    pub fn neumann(dim: usize) -> Result<Self, OperatorError> {
        Self::uniform(dim, BoundaryCondition::Neumann)
    }

    /// Dirichlet on every side.
    pub fn dirichlet(dim: usize) -> Result<Self, OperatorError> {
        Self::uniform(dim, BoundaryCondition::Dirichlet)
    }

    /// Explicit conditions, one entry per axis.
    pub fn per_axis(axes: &[AxisBc]) -> Result<Self, OperatorError> {
        check_dim(axes.len())?;
        Ok(Self {
            axes: axes.iter().copied().collect(),
        })
    }

    /// Number of axes covered.
    pub fn dim(&self) -> usize {
        self.axes.len()
    }

    /// Per-axis conditions, x first.
    pub fn axes(&self) -> &[AxisBc] {
        &self.axes
    }

    /// Error unless this configuration covers exactly `dim` axes.
    pub fn check_dim(&self, dim: usize) -> Result<(), OperatorError> {
        if self.axes.len() != dim {
            return Err(OperatorError::invalid(format!(
                "boundary condition covers {} axes but the mesh has {dim}",
                self.axes.len()
            )));
        }
        Ok(())
    }
}

fn check_dim(dim: usize) -> Result<(), OperatorError> {
    if !(1..=3).contains(&dim) {
        return Err(OperatorError::invalid(format!(
            "boundary conditions need 1 to 3 axes, got {dim}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use BoundaryCondition::{Dirichlet, Neumann};

    fn sides(lo: &str, hi: &str) -> AxisSpec {
        AxisSpec::Sides(vec![lo.to_string(), hi.to_string()])
    }

    #[test]
    fn single_token_expands_to_every_axis() {
        let bc = BcSpec::all("dirichlet").resolve(3).unwrap();
        assert_eq!(bc.dim(), 3);
        assert!(bc.axes().iter().all(|a| *a == AxisBc::both(Dirichlet)));
    }

    #[test]
    fn mixed_per_axis_spec() {
        let spec = BcSpec::PerAxis(vec![
            AxisSpec::Both("neumann".into()),
            sides("dirichlet", "neumann"),
        ]);
        let bc = spec.resolve(2).unwrap();
        assert_eq!(bc.axes()[0], AxisBc::both(Neumann));
        assert_eq!(bc.axes()[1], AxisBc::new(Dirichlet, Neumann));
    }

    #[test]
    fn wrong_axis_count_is_rejected() {
        let spec = BcSpec::PerAxis(vec![AxisSpec::Both("neumann".into())]);
        assert!(matches!(
            spec.resolve(2),
            Err(OperatorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn wrong_side_count_is_rejected() {
        let spec = BcSpec::PerAxis(vec![AxisSpec::Sides(vec!["neumann".into()])]);
        assert!(spec.resolve(1).is_err());
        let spec = BcSpec::PerAxis(vec![AxisSpec::Sides(vec![
            "neumann".into(),
            "neumann".into(),
            "neumann".into(),
        ])]);
        assert!(spec.resolve(1).is_err());
    }

    #[test]
    fn bad_token_is_rejected() {
        assert!(BcSpec::all("periodic").resolve(1).is_err());
        assert!(BcSpec::PerAxis(vec![sides("dirichlet", "Neumann")])
            .resolve(1)
            .is_err());
    }

    #[test]
    fn dimension_bounds() {
        assert!(CellGradientBc::neumann(0).is_err());
        assert!(CellGradientBc::neumann(4).is_err());
        let bc = CellGradientBc::dirichlet(2).unwrap();
        assert!(bc.check_dim(2).is_ok());
        assert!(bc.check_dim(3).is_err());
    }
}
