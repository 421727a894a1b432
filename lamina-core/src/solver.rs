//! Structural solver for one plane-stress element.
//!
//! The solve runs in three phases, each overwriting the solver state:
//!
//! 1. [`StructuralSolver::compute_stiffness`] - formulate the element and
//!    scatter it into the global stiffness matrix
//! 2. [`StructuralSolver::compute_force_vector`] - write nodal forces
//! 3. [`StructuralSolver::compute_displacement_vector`] - eliminate prescribed
//!    displacements and solve `K * u = f`
//!
//! Linear system backends live in [`linear`].

pub mod linear;

pub use linear::{select_solver, CholeskySolver, DenseLuSolver, LinearSolver, SolverKind};

use crate::assembly::{apply_displacements, assemble_forces, element_dof_indices, scatter_add};
use crate::element::quad4::{GaussPointMapping, Quad4PlaneStress, Rectangle};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::material::Material;
use crate::node::Node;
use crate::stress::ElementStress;
use crate::types::{dof_index, Coordinate, Real, DOFS_PER_NODE, NODES_PER_ELEMENT, X, Y};
use nalgebra::{convert, DMatrix, DVector};
use tracing::debug;

/// Element connectivity: the single element uses every node in order.
const CONNECTIVITY: [usize; NODES_PER_ELEMENT] = [0, 1, 2, 3];

/// Solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Linear system backend.
    pub backend: SolverKind,
    /// Relative eigenvalue threshold below which the free-DOF stiffness is
    /// treated as singular. `None` uses the square root of machine epsilon.
    pub singularity_tolerance: Option<f64>,
    /// Evaluate Gauss point contributions in parallel.
    pub parallel_integration: bool,
    /// Where the element samples its Gauss points.
    pub gauss_mapping: GaussPointMapping,
    /// Move `column * value` of each prescribed displacement to the
    /// right-hand side before eliminating it.
    pub lift_prescribed_values: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverKind::DenseLu,
            singularity_tolerance: None,
            parallel_integration: false,
            gauss_mapping: GaussPointMapping::Natural,
            lift_prescribed_values: false,
        }
    }
}

impl SolverConfig {
    /// Apply the integration settings to an element.
    fn configure<T: Real>(&self, element: Quad4PlaneStress<T>) -> Quad4PlaneStress<T> {
        element
            .with_parallel_integration(self.parallel_integration)
            .with_gauss_mapping(self.gauss_mapping)
    }
}

/// Single-element plane-stress solver.
///
/// Owns the nodes, the global stiffness matrix, the force vector and the
/// displacement vector. All three are zero until their compute phase runs.
#[derive(Debug, Clone)]
pub struct StructuralSolver<T: Real> {
    nodes: Vec<Node<T>>,
    element: Quad4PlaneStress<T>,
    config: SolverConfig,
    stiffness: DMatrix<T>,
    forces: DVector<T>,
    displacements: DVector<T>,
    constrained: Vec<bool>,
}

impl<T: Real> StructuralSolver<T> {
    /// Create a solver for four nodes ordered counter-clockwise from the
    /// bottom-left corner.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless exactly 4 nodes are given.
    pub fn new(nodes: Vec<Node<T>>) -> Result<Self> {
        if nodes.len() != NODES_PER_ELEMENT {
            return Err(Error::DimensionMismatch(format!(
                "a single quad element needs {} nodes, got {}",
                NODES_PER_ELEMENT,
                nodes.len()
            )));
        }

        let n_dofs = DOFS_PER_NODE * nodes.len();
        Ok(Self {
            nodes,
            element: Quad4PlaneStress::default(),
            config: SolverConfig::default(),
            stiffness: DMatrix::zeros(n_dofs, n_dofs),
            forces: DVector::zeros(n_dofs),
            displacements: DVector::zeros(n_dofs),
            constrained: vec![false; n_dofs],
        })
    }

    /// Use a specific element formulation (e.g. non-unit thickness).
    ///
    /// Integration settings still come from the solver configuration.
    pub fn with_element(mut self, element: Quad4PlaneStress<T>) -> Self {
        self.element = self.config.configure(element);
        self
    }

    /// Replace the configuration and reconfigure the element.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.element = config.configure(self.element);
        self.config = config;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Element formulation used by [`compute_stiffness`](Self::compute_stiffness).
    pub fn element(&self) -> &Quad4PlaneStress<T> {
        &self.element
    }

    /// Nodes in construction order.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Number of nodes, always 4 for a constructed solver.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// System size, `2 * n_nodes()`.
    pub fn n_dofs(&self) -> usize {
        DOFS_PER_NODE * self.nodes.len()
    }

    /// Node coordinates in node order.
    pub fn coordinates(&self) -> Vec<Coordinate<T>> {
        self.nodes.iter().map(|n| n.coords).collect()
    }

    /// Validated element geometry spanned by the nodes.
    pub fn rectangle(&self) -> Result<Rectangle<T>> {
        Rectangle::from_corners(&self.coordinates())
    }

    /// Global stiffness matrix, without boundary conditions.
    pub fn stiffness_matrix(&self) -> &DMatrix<T> {
        &self.stiffness
    }

    /// Nodal load vector from the last force phase.
    pub fn force_vector(&self) -> &DVector<T> {
        &self.forces
    }

    /// Solution of the last displacement phase, zero before it runs.
    pub fn displacement_vector(&self) -> &DVector<T> {
        &self.displacements
    }

    /// DOFs fixed by a prescribed displacement in the last solve.
    pub fn constrained_dofs(&self) -> &[bool] {
        &self.constrained
    }

    /// Displacement `(u, v)` of node `i`, or `None` if out of range.
    pub fn node_displacement(&self, i: usize) -> Option<Coordinate<T>> {
        if i >= self.nodes.len() {
            return None;
        }
        Some(Coordinate::new(
            self.displacements[dof_index(i, X)],
            self.displacements[dof_index(i, Y)],
        ))
    }

    /// Formulate the element and store it as the global stiffness matrix.
    pub fn compute_stiffness(&mut self, material: &Material<T>) -> Result<()> {
        let coords = self.coordinates();
        let k_elem = self.element.stiffness(&coords, material)?;

        let n_dofs = self.n_dofs();
        let mut k = DMatrix::zeros(n_dofs, n_dofs);
        scatter_add(&mut k, &element_dof_indices(&CONNECTIVITY), &k_elem)?;
        self.stiffness = k;

        debug!(
            n_dofs,
            youngs_modulus = ?material.youngs_modulus,
            poissons_ratio = ?material.poissons_ratio,
            "assembled stiffness matrix"
        );
        Ok(())
    }

    /// Rebuild the force vector from the nodal forces.
    pub fn compute_force_vector(&mut self) -> Result<()> {
        assemble_forces(&self.nodes, &mut self.forces)?;
        let n_forces: usize = self.nodes.iter().map(|n| n.forces.len()).sum();
        debug!(n_forces, "assembled force vector");
        Ok(())
    }

    /// Apply the prescribed displacements and solve with the configured backend.
    pub fn compute_displacement_vector(&mut self) -> Result<()> {
        let backend = select_solver::<T>(self.config.backend);
        self.compute_displacement_vector_with(backend.as_ref())
    }

    /// Apply the prescribed displacements and solve with `solver`.
    ///
    /// # Errors
    ///
    /// Returns `UnderconstrainedSystem` if the constraints leave a rigid-body
    /// mode, before the backend is called.
    pub fn compute_displacement_vector_with(&mut self, solver: &dyn LinearSolver<T>) -> Result<()> {
        let mut k = self.stiffness.clone();
        let mut f = self.forces.clone();
        let constrained =
            apply_displacements(&self.nodes, &mut k, &mut f, self.config.lift_prescribed_values)?;

        self.check_constraints(&constrained)?;

        let u = solver.solve(&k, &f)?;
        debug!(
            solver = solver.name(),
            n_constrained = constrained.iter().filter(|&&c| c).count(),
            "solved displacement vector"
        );

        self.displacements = u;
        self.constrained = constrained;
        Ok(())
    }

    /// Run all three phases and return the displacements.
    pub fn solve(&mut self, material: &Material<T>) -> Result<&DVector<T>> {
        self.compute_stiffness(material)?;
        self.compute_force_vector()?;
        self.compute_displacement_vector()?;
        Ok(&self.displacements)
    }

    /// Fail if the stiffness restricted to the free DOFs is singular.
    fn check_constraints(&self, constrained: &[bool]) -> Result<()> {
        let free: Vec<usize> = (0..constrained.len()).filter(|&i| !constrained[i]).collect();
        if free.is_empty() {
            return Ok(());
        }

        let k_free = self.stiffness.select_rows(&free).select_columns(&free);
        let eigenvalues = k_free.symmetric_eigenvalues();
        let max = eigenvalues.iter().fold(T::zero(), |acc, &l| acc.max(l.abs()));
        let min = eigenvalues.iter().fold(max, |acc, &l| acc.min(l));

        let tolerance = match self.config.singularity_tolerance {
            Some(tol) => convert::<f64, T>(tol),
            None => T::default_epsilon().sqrt(),
        };

        if max <= T::zero() || min <= tolerance * max {
            return Err(Error::UnderconstrainedSystem(format!(
                "{} free DOFs with eigenvalue ratio {:?}; prescribe displacements that remove \
                 rigid-body translation and rotation",
                free.len(),
                if max > T::zero() { min / max } else { T::zero() }
            )));
        }
        Ok(())
    }

    /// Support reactions `K * u - f` at the constrained DOFs, zero elsewhere.
    pub fn reactions(&self) -> DVector<T> {
        let mut r = &self.stiffness * &self.displacements - &self.forces;
        for (i, &c) in self.constrained.iter().enumerate() {
            if !c {
                r[i] = T::zero();
            }
        }
        r
    }

    /// Interpolate the displacement field at a point of the element.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if the nodes do not form a valid rectangle or
    /// the point lies outside it.
    pub fn displacement_at(&self, point: &Coordinate<T>) -> Result<Coordinate<T>> {
        let rect = self.rectangle()?;
        if !rect.contains(point) {
            return Err(Error::InvalidGeometry(format!(
                "point ({:?}, {:?}) lies outside the element",
                point.x, point.y
            )));
        }

        let (xi, eta) = rect.to_local(point);
        let n = rect.shape_functions(xi, eta);
        let mut u = Coordinate::zeros();
        for (i, &weight) in n.iter().enumerate() {
            u.x += weight * self.displacements[dof_index(i, X)];
            u.y += weight * self.displacements[dof_index(i, Y)];
        }
        Ok(u)
    }

    /// Strains and stresses of the current displacement field.
    pub fn stress(&self, material: &Material<T>) -> Result<ElementStress<T>> {
        ElementStress::compute(
            &self.coordinates(),
            self.displacements.as_slice(),
            material,
            self.element.gauss_mapping(),
        )
    }
}
