//! Material property definitions.
//!
//! Isotropic linear elastic material under the plane stress assumption.

use crate::error::{Error, Result};
use crate::types::{ConstitutiveMatrix, Real};
use nalgebra::convert;

/// Isotropic linear elastic material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material<T: Real> {
    /// Young's modulus E.
    pub youngs_modulus: T,
    /// Poisson's ratio ν (dimensionless).
    pub poissons_ratio: T,
}

impl<T: Real> Material<T> {
    /// Create a new isotropic linear elastic material.
    ///
    /// # Arguments
    ///
    /// * `youngs_modulus` - Young's modulus E
    /// * `poissons_ratio` - Poisson's ratio ν (dimensionless, -1 < ν < 0.5)
    ///
    /// # Errors
    ///
    /// Returns error if material properties are physically invalid.
    pub fn new(youngs_modulus: T, poissons_ratio: T) -> Result<Self> {
        if !youngs_modulus.is_finite() || youngs_modulus <= T::zero() {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive and finite".into(),
            ));
        }
        let half: T = convert(0.5);
        if !poissons_ratio.is_finite() || poissons_ratio <= -T::one() || poissons_ratio >= half {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
        })
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> T {
        let two: T = convert(2.0);
        self.youngs_modulus / (two * (T::one() + self.poissons_ratio))
    }

    /// Plane stress constitutive matrix.
    ///
    /// Returns a 3x3 matrix for [σ_xx, σ_yy, τ_xy] = D * [ε_xx, ε_yy, γ_xy].
    pub fn constitutive_plane_stress(&self) -> ConstitutiveMatrix<T> {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;
        let zero = T::zero();
        let two: T = convert(2.0);

        let factor = e / (T::one() - nu * nu);

        ConstitutiveMatrix::new(
            factor,      factor * nu, zero,
            factor * nu, factor,      zero,
            zero,        zero,        factor * (T::one() - nu) / two,
        )
    }
}
