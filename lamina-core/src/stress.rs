//! Stress recovery from the displacement solution.
//!
//! After solving Ku = f for displacements, this module computes element
//! strains and stresses:
//! 1. Extract the element nodal displacements
//! 2. Compute strain: ε = B * u_e (strain-displacement relation)
//! 3. Compute stress: σ = D * ε (plane stress constitutive relation)
//!
//! Values are reported at the 2×2 Gauss points, placed the way the element
//! placed them for its stiffness, and at the centroid.

use crate::element::gauss::gauss_quad;
use crate::element::quad4::{element_displacements, GaussPointMapping, Rectangle};
use crate::error::Result;
use crate::material::Material;
use crate::types::{Coordinate, PlaneStrain, PlaneStress, Real};
use nalgebra::{convert, Vector3};

/// Strain and stress at one sampling point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressSample<T: Real> {
    /// Physical location of the sample.
    pub position: Coordinate<T>,
    pub strain: PlaneStrain<T>,
    pub stress: PlaneStress<T>,
}

/// Stress result for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStress<T: Real> {
    /// Samples at the Gauss points, in quadrature order.
    pub integration_points: Vec<StressSample<T>>,
    /// Sample at the element centroid.
    pub centroid: StressSample<T>,
}

impl<T: Real> ElementStress<T> {
    /// Recover strains and stresses for one element.
    ///
    /// # Arguments
    ///
    /// * `coords` - Element corner coordinates
    /// * `displacements` - Nodal displacements `[u1, v1, ..., u4, v4]`
    /// * `material` - Material properties
    /// * `mapping` - Gauss point placement, as used for the stiffness
    pub fn compute(
        coords: &[Coordinate<T>],
        displacements: &[T],
        material: &Material<T>,
        mapping: GaussPointMapping,
    ) -> Result<Self> {
        let rect = Rectangle::from_corners(coords)?;
        let u = element_displacements(displacements)?;
        let d = material.constitutive_plane_stress();
        let origin = rect.centroid();

        let sample = |xi: T, eta: T| -> StressSample<T> {
            let strain = rect.strain_at(xi, eta, &u);
            StressSample {
                position: Coordinate::new(origin.x + xi, origin.y + eta),
                strain,
                stress: PlaneStress(d * strain.0),
            }
        };

        let integration_points = gauss_quad()
            .iter()
            .map(|gp| {
                let (xi, eta) = rect.gauss_point_local(gp, mapping);
                sample(xi, eta)
            })
            .collect();

        Ok(Self {
            integration_points,
            centroid: sample(T::zero(), T::zero()),
        })
    }

    /// Average stress across the integration points.
    pub fn average_stress(&self) -> PlaneStress<T> {
        if self.integration_points.is_empty() {
            return PlaneStress::zero();
        }
        let sum = self
            .integration_points
            .iter()
            .fold(Vector3::zeros(), |acc, s| acc + s.stress.0);
        let n: T = convert(self.integration_points.len() as f64);
        PlaneStress(sum / n)
    }

    /// Maximum von Mises stress among the integration points.
    pub fn max_von_mises(&self) -> T {
        self.integration_points
            .iter()
            .map(|s| s.stress.von_mises())
            .fold(T::zero(), |acc, vm| acc.max(vm))
    }
}
