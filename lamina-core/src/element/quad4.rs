//! Bilinear rectangular plane stress element.
//!
//! This module provides:
//! - [`Rectangle`] - validated element geometry with shape functions and the B-matrix
//! - [`Quad4PlaneStress`] - 4-node quadrilateral integrated with a 2×2 Gauss rule
//!
//! # Local Coordinates
//!
//! Shape functions are written in local coordinates (ξ, η) measured from the
//! rectangle centroid in physical units, so ξ ∈ [-a/2, a/2] and η ∈ [-b/2, b/2]
//! where `a` and `b` are the rectangle width and height. Derivatives with
//! respect to (ξ, η) are therefore derivatives with respect to (x, y) and no
//! Jacobian inversion is needed.
//!
//! # Gauss Points
//!
//! By default the stiffness is sampled with the natural points `±1/√3` taken
//! directly as (ξ, η), and the sum is scaled by `a·b/4`. For any rectangle
//! other than 2×2 these points do not sit at the physical Gauss points, so K
//! depends on the element size. [`GaussPointMapping::Scaled`] maps them to
//! `(g·a/2, g·b/2)` instead, which integrates the bilinear field exactly.
//!
//! # Node Numbering
//!
//! ```text
//! 4 --- 3
//! |     |
//! 1 --- 2
//! ```
//! Counter-clockwise from the bottom-left corner.

use crate::element::gauss::{gauss_quad, GaussPoint};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{
    Coordinate, ElementStiffness, PlaneStrain, PlaneStress, Real, StrainDisplacement,
    DOFS_PER_NODE, ELEMENT_DOFS, NODES_PER_ELEMENT,
};
use nalgebra::{convert, DMatrix, SVector};
use rayon::prelude::*;
use tracing::trace;

/// Allowed corner offset from the bounding box, relative to the larger side.
const CORNER_TOLERANCE: f64 = 1e-6;

/// Nodal displacement vector of one element, `[u1, v1, ..., u4, v4]`.
pub type ElementDisplacements<T> = SVector<T, ELEMENT_DOFS>;

/// Where the natural Gauss coordinates are evaluated in the element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GaussPointMapping {
    /// `±1/√3` used directly as the centred local coordinates (ξ, η).
    #[default]
    Natural,
    /// `±1/√3` scaled by the half extents: `ξ = g·a/2`, `η = g·b/2`.
    Scaled,
}

/// Axis-aligned rectangular element geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle<T: Real> {
    /// Bottom-left corner.
    pub min: Coordinate<T>,
    /// Extent along x (`a`).
    pub width: T,
    /// Extent along y (`b`).
    pub height: T,
}

impl<T: Real> Rectangle<T> {
    /// Build the rectangle spanned by four element corners.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `coords` does not hold exactly 4 points
    /// - `InvalidGeometry` if a coordinate is not finite, the bounding box has
    ///   zero width or height, or the corners are not the bounding box corners
    ///   in counter-clockwise order starting at the bottom-left
    pub fn from_corners(coords: &[Coordinate<T>]) -> Result<Self> {
        if coords.len() != NODES_PER_ELEMENT {
            return Err(Error::DimensionMismatch(format!(
                "Quad4 requires exactly {} nodal coordinates, got {}",
                NODES_PER_ELEMENT,
                coords.len()
            )));
        }

        if let Some(i) = coords
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(Error::InvalidGeometry(format!(
                "node {} has non-finite coordinates",
                i
            )));
        }

        let mut min = coords[0];
        let mut max = coords[0];
        for c in &coords[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }

        let width = max.x - min.x;
        let height = max.y - min.y;
        if width <= T::zero() || height <= T::zero() {
            return Err(Error::InvalidGeometry(format!(
                "bounding box has zero extent (width {:?}, height {:?})",
                width, height
            )));
        }

        let rect = Self { min, width, height };

        let tolerance = convert::<f64, T>(CORNER_TOLERANCE) * width.max(height);
        for (i, (actual, expected)) in coords.iter().zip(rect.corners()).enumerate() {
            if (actual.x - expected.x).abs() > tolerance
                || (actual.y - expected.y).abs() > tolerance
            {
                return Err(Error::InvalidGeometry(format!(
                    "node {} at ({:?}, {:?}) should be at ({:?}, {:?}); corners must form an \
                     axis-aligned rectangle ordered counter-clockwise from the bottom-left",
                    i, actual.x, actual.y, expected.x, expected.y
                )));
            }
        }

        Ok(rect)
    }

    /// Corners in node order.
    pub fn corners(&self) -> [Coordinate<T>; NODES_PER_ELEMENT] {
        let x0 = self.min.x;
        let y0 = self.min.y;
        let x1 = x0 + self.width;
        let y1 = y0 + self.height;
        [
            Coordinate::new(x0, y0),
            Coordinate::new(x1, y0),
            Coordinate::new(x1, y1),
            Coordinate::new(x0, y1),
        ]
    }

    /// Area `a·b`.
    pub fn area(&self) -> T {
        self.width * self.height
    }

    /// Centre of the rectangle, the origin of the local coordinates.
    pub fn centroid(&self) -> Coordinate<T> {
        let two: T = convert(2.0);
        Coordinate::new(
            self.min.x + self.width / two,
            self.min.y + self.height / two,
        )
    }

    /// Local coordinates (ξ, η) of a physical point.
    pub fn to_local(&self, point: &Coordinate<T>) -> (T, T) {
        let c = self.centroid();
        (point.x - c.x, point.y - c.y)
    }

    /// Whether a physical point lies inside the rectangle or on its boundary.
    pub fn contains(&self, point: &Coordinate<T>) -> bool {
        let (xi, eta) = self.to_local(point);
        let (ha, hb) = self.half_extents();
        let tolerance = convert::<f64, T>(CORNER_TOLERANCE) * self.width.max(self.height);
        xi.abs() <= ha + tolerance && eta.abs() <= hb + tolerance
    }

    /// Local coordinates (ξ, η) at which a Gauss point is evaluated.
    pub fn gauss_point_local(&self, gp: &GaussPoint, mapping: GaussPointMapping) -> (T, T) {
        let xi = convert::<f64, T>(gp.xi);
        let eta = convert::<f64, T>(gp.eta);
        match mapping {
            GaussPointMapping::Natural => (xi, eta),
            GaussPointMapping::Scaled => {
                let (ha, hb) = self.half_extents();
                (xi * ha, eta * hb)
            }
        }
    }

    fn half_extents(&self) -> (T, T) {
        let two: T = convert(2.0);
        (self.width / two, self.height / two)
    }

    /// Evaluate shape functions at local coordinates (ξ, η).
    ///
    /// N1 = (a/2 − ξ)(b/2 − η)/(ab), N2 = (a/2 + ξ)(b/2 − η)/(ab),
    /// N3 = (a/2 + ξ)(b/2 + η)/(ab), N4 = (a/2 − ξ)(b/2 + η)/(ab)
    pub fn shape_functions(&self, xi: T, eta: T) -> [T; NODES_PER_ELEMENT] {
        let (ha, hb) = self.half_extents();
        let ab = self.area();
        [
            (ha - xi) * (hb - eta) / ab,
            (ha + xi) * (hb - eta) / ab,
            (ha + xi) * (hb + eta) / ab,
            (ha - xi) * (hb + eta) / ab,
        ]
    }

    /// Shape function derivatives `(dN/dξ, dN/dη)` for each node.
    pub fn shape_function_derivatives(&self, xi: T, eta: T) -> [(T, T); NODES_PER_ELEMENT] {
        let (ha, hb) = self.half_extents();
        let ab = self.area();
        [
            (-(hb - eta) / ab, -(ha - xi) / ab),
            ((hb - eta) / ab, -(ha + xi) / ab),
            ((hb + eta) / ab, (ha + xi) / ab),
            (-(hb + eta) / ab, (ha - xi) / ab),
        ]
    }

    /// Strain-displacement matrix at local coordinates (ξ, η).
    ///
    /// ε = [ε_xx, ε_yy, γ_xy]^T = B * [u1, v1, ..., u4, v4]^T
    pub fn b_matrix(&self, xi: T, eta: T) -> StrainDisplacement<T> {
        let dn = self.shape_function_derivatives(xi, eta);

        let mut b = StrainDisplacement::zeros();
        for (i, &(dn_dx, dn_dy)) in dn.iter().enumerate() {
            let col = DOFS_PER_NODE * i;
            b[(0, col)] = dn_dx; // ε_xx = ∂u/∂x
            b[(1, col + 1)] = dn_dy; // ε_yy = ∂v/∂y
            b[(2, col)] = dn_dy; // γ_xy = ∂u/∂y + ∂v/∂x
            b[(2, col + 1)] = dn_dx;
        }

        b
    }

    /// Strain at local coordinates (ξ, η) for the given nodal displacements.
    pub fn strain_at(&self, xi: T, eta: T, displacements: &ElementDisplacements<T>) -> PlaneStrain<T> {
        PlaneStrain(self.b_matrix(xi, eta) * displacements)
    }
}

/// Check and copy an element displacement slice.
pub fn element_displacements<T: Real>(displacements: &[T]) -> Result<ElementDisplacements<T>> {
    if displacements.len() != ELEMENT_DOFS {
        return Err(Error::DimensionMismatch(format!(
            "Quad4 requires {} displacement DOFs, got {}",
            ELEMENT_DOFS,
            displacements.len()
        )));
    }
    Ok(ElementDisplacements::from_column_slice(displacements))
}

/// 4-node rectangular plane stress element.
///
/// A 2D element with:
/// - 4 nodes at corners
/// - 2 DOFs per node (u, v displacements)
/// - 8 total DOFs
/// - Bilinear shape functions
/// - 2×2 Gauss quadrature (4 integration points)
///
/// The stiffness matrix is
/// `K = t · (a·b/4) · Σ w_i w_j · B_ijᵀ · D · B_ij`
/// with `B_ij` evaluated where [`GaussPointMapping`] places the Gauss points.
#[derive(Debug, Clone, Copy)]
pub struct Quad4PlaneStress<T: Real> {
    /// Out-of-plane thickness.
    thickness: T,
    /// Evaluate Gauss point contributions on the rayon pool.
    parallel: bool,
    mapping: GaussPointMapping,
}

impl<T: Real> Quad4PlaneStress<T> {
    /// Create a new element with specified thickness.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if thickness is not positive and finite.
    pub fn new(thickness: T) -> Result<Self> {
        if !thickness.is_finite() || thickness <= T::zero() {
            return Err(Error::InvalidGeometry(
                "Thickness must be positive and finite".into(),
            ));
        }
        Ok(Self {
            thickness,
            ..Self::default()
        })
    }

    /// Toggle parallel accumulation of the Gauss point contributions.
    pub fn with_parallel_integration(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Choose where the Gauss points are evaluated.
    pub fn with_gauss_mapping(mut self, mapping: GaussPointMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Out-of-plane thickness `t`.
    pub fn thickness(&self) -> T {
        self.thickness
    }

    /// Gauss point placement used for stiffness and stress.
    pub fn gauss_mapping(&self) -> GaussPointMapping {
        self.mapping
    }

    /// Compute the 8x8 element stiffness matrix.
    pub fn element_stiffness(
        &self,
        coords: &[Coordinate<T>],
        material: &Material<T>,
    ) -> Result<ElementStiffness<T>> {
        let rect = Rectangle::from_corners(coords)?;
        let d = material.constitutive_plane_stress();
        let gauss_points = gauss_quad();

        // w * B^T * D * B at one Gauss point
        let contribution = |gp: &GaussPoint| -> ElementStiffness<T> {
            let (xi, eta) = rect.gauss_point_local(gp, self.mapping);
            let b = rect.b_matrix(xi, eta);
            b.transpose() * d * b * convert::<f64, T>(gp.weight)
        };

        let sum = if self.parallel {
            gauss_points[..]
                .par_iter()
                .map(contribution)
                .reduce(|| ElementStiffness::zeros(), |acc, k| acc + k)
        } else {
            gauss_points
                .iter()
                .map(contribution)
                .fold(ElementStiffness::zeros(), |acc, k| acc + k)
        };

        let four: T = convert(4.0);
        let k = sum * (rect.area() / four * self.thickness);

        trace!(
            width = ?rect.width,
            height = ?rect.height,
            mapping = ?self.mapping,
            k00 = ?k[(0, 0)],
            "formulated quad4 stiffness"
        );

        Ok(k)
    }
}

impl<T: Real> Default for Quad4PlaneStress<T> {
    fn default() -> Self {
        Self {
            thickness: T::one(),
            parallel: false,
            mapping: GaussPointMapping::Natural,
        }
    }
}

impl<T: Real> Element<T> for Quad4PlaneStress<T> {
    fn n_nodes(&self) -> usize {
        NODES_PER_ELEMENT
    }

    fn dofs_per_node(&self) -> usize {
        DOFS_PER_NODE
    }

    fn stiffness(&self, coords: &[Coordinate<T>], material: &Material<T>) -> Result<DMatrix<T>> {
        let k = self.element_stiffness(coords, material)?;
        Ok(DMatrix::from_column_slice(ELEMENT_DOFS, ELEMENT_DOFS, k.as_slice()))
    }

    fn stress(
        &self,
        coords: &[Coordinate<T>],
        displacements: &[T],
        material: &Material<T>,
    ) -> Result<Vec<PlaneStress<T>>> {
        let rect = Rectangle::from_corners(coords)?;
        let u = element_displacements(displacements)?;
        let d = material.constitutive_plane_stress();

        Ok(gauss_quad()
            .iter()
            .map(|gp| {
                let (xi, eta) = rect.gauss_point_local(gp, self.mapping);
                PlaneStress(d * rect.strain_at(xi, eta, &u).0)
            })
            .collect())
    }

    fn area(&self, coords: &[Coordinate<T>]) -> Result<T> {
        Ok(Rectangle::from_corners(coords)?.area())
    }
}
