//! Element trait and implementations.
//!
//! The Element trait defines the interface for finite elements, so the solver
//! only relies on stiffness, stress recovery and area.
//!
//! # Submodules
//!
//! - [`gauss`] - Gauss quadrature rules for numerical integration
//! - [`quad4`] - bilinear rectangular plane stress element

use crate::error::Result;
use crate::material::Material;
use crate::types::{Coordinate, PlaneStress, Real};
use nalgebra::DMatrix;

pub mod gauss;
pub mod quad4;

pub use gauss::{gauss_1d, gauss_quad, GaussPoint};
pub use quad4::{GaussPointMapping, Quad4PlaneStress, Rectangle};

/// Plane element seen by the structural solver.
///
/// Implementors are `Send + Sync` so Gauss points can be reduced on the rayon pool.
pub trait Element<T: Real>: Send + Sync {
    /// Number of nodes in this element.
    fn n_nodes(&self) -> usize;

    /// Degrees of freedom per node (2 for plane elements).
    fn dofs_per_node(&self) -> usize;

    /// Total degrees of freedom for this element.
    fn n_dofs(&self) -> usize {
        self.n_nodes() * self.dofs_per_node()
    }

    /// Element stiffness, `n_dofs × n_dofs`, ordered `[u0, v0, u1, v1, ...]`.
    ///
    /// `coords` holds one corner per node in counter-clockwise order.
    fn stiffness(&self, coords: &[Coordinate<T>], material: &Material<T>) -> Result<DMatrix<T>>;

    /// Stresses at the integration points for nodal `displacements` of length `n_dofs()`.
    fn stress(
        &self,
        coords: &[Coordinate<T>],
        displacements: &[T],
        material: &Material<T>,
    ) -> Result<Vec<PlaneStress<T>>>;

    /// Compute element area.
    fn area(&self, coords: &[Coordinate<T>]) -> Result<T>;
}
