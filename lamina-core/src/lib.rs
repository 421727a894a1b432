//! Lamina Core - plane-stress bilinear quadrilateral analysis
//!
//! Linear-elastic plane-stress analysis of one 4-node rectangular element:
//! - Element stiffness from bilinear shape functions and 2×2 Gauss quadrature
//! - Nodal load vector and prescribed displacements by row/column elimination
//! - Direct dense LU or faer Cholesky solves
//! - Stress recovery, regular grids and legacy VTK export
//! - Sub-area solves that carry a coarse solution onto grid cells
//!
//! # Architecture
//!
//! - [`Element`] trait: element stiffness, stress recovery and area
//! - [`Quad4PlaneStress`]: the bilinear rectangular element
//! - [`Material`]: isotropic elastic constants
//! - [`StructuralSolver`]: assembly, boundary conditions and solve
//! - [`LinearSolver`] trait: linear system backends
//!
//! # Example
//!
//! ```
//! use lamina_core::{Material, Node, StructuralSolver, Y};
//!
//! let nodes = vec![
//!     Node::new(0.0, 0.0).fixed(),
//!     Node::new(1.0, 0.0).fixed(),
//!     Node::new(1.0, 1.0).with_force(Y, -1000.0),
//!     Node::new(0.0, 1.0).with_force(Y, -1000.0),
//! ];
//! let material = Material::new(200_000.0, 0.3)?;
//!
//! let mut solver = StructuralSolver::new(nodes)?;
//! let u = solver.solve(&material)?;
//! assert!(u[5] < 0.0);
//! # Ok::<(), lamina_core::Error>(())
//! ```

pub mod types;
pub mod element;
pub mod material;
pub mod node;
pub mod assembly;
pub mod solver;
pub mod stress;
pub mod grid;
pub mod areas;
pub mod vtk;
pub mod report;
pub mod error;

pub use types::{Coordinate, PlaneStrain, PlaneStress, Real, X, Y};
pub use element::{Element, GaussPointMapping, Quad4PlaneStress, Rectangle};
pub use material::Material;
pub use node::{Condition, Node};
pub use solver::{LinearSolver, SolverConfig, SolverKind, StructuralSolver};
pub use stress::ElementStress;
pub use grid::RegularGrid;
pub use areas::{solve_areas, SubArea};
pub use error::{Error, Result};
