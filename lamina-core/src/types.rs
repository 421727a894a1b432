//! Core data types and topology constants.
//!
//! This module defines:
//! - The [`Real`] scalar bound (all numeric code is generic over `f32`/`f64`)
//! - Element topology constants and DOF indexing
//! - Plane stress and strain states in Voigt notation

use nalgebra::{Matrix3, RealField, SMatrix, Vector2, Vector3};

/// Floating-point scalar accepted by the formulator and solver.
pub trait Real: RealField + Copy + Send + Sync {}

impl<T: RealField + Copy + Send + Sync> Real for T {}

/// A point in the plane, `(x, y)`.
pub type Coordinate<T> = Vector2<T>;

/// Nodes of one quadrilateral element.
pub const NODES_PER_ELEMENT: usize = 4;

/// Displacement components per node: `u` (x) and `v` (y).
pub const DOFS_PER_NODE: usize = 2;

/// Degrees of freedom of one element.
pub const ELEMENT_DOFS: usize = NODES_PER_ELEMENT * DOFS_PER_NODE;

/// Strain components `[ε_xx, ε_yy, γ_xy]`.
pub const STRAIN_COMPONENTS: usize = 3;

/// Direction index of the x component.
pub const X: usize = 0;

/// Direction index of the y component.
pub const Y: usize = 1;

/// Dense element stiffness matrix (8x8).
pub type ElementStiffness<T> = SMatrix<T, ELEMENT_DOFS, ELEMENT_DOFS>;

/// Strain-displacement matrix B (3x8).
pub type StrainDisplacement<T> = SMatrix<T, STRAIN_COMPONENTS, ELEMENT_DOFS>;

/// Plane constitutive matrix D (3x3), `σ = D * ε`.
pub type ConstitutiveMatrix<T> = Matrix3<T>;

/// Global DOF index of `direction` at `node`.
#[inline]
pub fn dof_index(node: usize, direction: usize) -> usize {
    DOFS_PER_NODE * node + direction
}

/// In-plane stress in Voigt notation.
///
/// Components are ordered as: [σ_xx, σ_yy, τ_xy]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStress<T: Real>(pub Vector3<T>);

impl<T: Real> PlaneStress<T> {
    /// Create a new stress state from Voigt components.
    pub fn new(components: [T; 3]) -> Self {
        Self(Vector3::from_row_slice(&components))
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    /// von Mises equivalent stress with σ_zz = 0.
    pub fn von_mises(&self) -> T {
        let s_xx = self.0[0];
        let s_yy = self.0[1];
        let t_xy = self.0[2];
        let three = T::one() + T::one() + T::one();

        (s_xx * s_xx - s_xx * s_yy + s_yy * s_yy + three * t_xy * t_xy).sqrt()
    }

    /// Principal stresses `(σ_1, σ_2)` with σ_1 ≥ σ_2.
    pub fn principal(&self) -> (T, T) {
        let two = T::one() + T::one();
        let center = (self.0[0] + self.0[1]) / two;
        let half_diff = (self.0[0] - self.0[1]) / two;
        let radius = (half_diff * half_diff + self.0[2] * self.0[2]).sqrt();
        (center + radius, center - radius)
    }
}

/// In-plane strain in Voigt notation.
///
/// Components are ordered as: [ε_xx, ε_yy, γ_xy]
/// where γ = 2ε for engineering shear strain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStrain<T: Real>(pub Vector3<T>);

impl<T: Real> PlaneStrain<T> {
    /// Create a new strain state from Voigt components.
    pub fn new(components: [T; 3]) -> Self {
        Self(Vector3::from_row_slice(&components))
    }

    /// In-plane area change ε_xx + ε_yy.
    pub fn areal(&self) -> T {
        self.0[0] + self.0[1]
    }
}
