//! Nodes and their boundary conditions.
//!
//! A node is identified by its position in the ordered node list handed to the
//! solver. It carries its coordinates plus zero or more applied forces and
//! prescribed displacements, each a `(direction, value)` pair.

use crate::types::{Coordinate, Real, DOFS_PER_NODE, X, Y};
use serde::{Deserialize, Serialize};

/// A force or displacement acting on one direction of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition<T: Real> {
    /// 0 for x, 1 for y.
    pub direction: usize,
    /// Force magnitude or prescribed displacement.
    pub value: T,
}

impl<T: Real> Condition<T> {
    pub fn new(direction: usize, value: T) -> Self {
        Self { direction, value }
    }

    /// Whether `direction` addresses a DOF of a 2D node.
    pub fn has_valid_direction(&self) -> bool {
        self.direction < DOFS_PER_NODE
    }
}

/// Finite element node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T: Real> {
    /// Nodal coordinates.
    pub coords: Coordinate<T>,
    /// Applied forces (natural boundary conditions).
    #[serde(default)]
    pub forces: Vec<Condition<T>>,
    /// Prescribed displacements (essential boundary conditions).
    #[serde(default, alias = "disps")]
    pub displacements: Vec<Condition<T>>,
}

impl<T: Real> Node<T> {
    /// Create a free, unloaded node at `(x, y)`.
    pub fn new(x: T, y: T) -> Self {
        Self {
            coords: Coordinate::new(x, y),
            forces: Vec::new(),
            displacements: Vec::new(),
        }
    }

    /// Add an applied force.
    pub fn with_force(mut self, direction: usize, value: T) -> Self {
        self.forces.push(Condition::new(direction, value));
        self
    }

    /// Add a prescribed displacement.
    pub fn with_displacement(mut self, direction: usize, value: T) -> Self {
        self.displacements.push(Condition::new(direction, value));
        self
    }

    /// Clamp both directions to zero displacement.
    pub fn fixed(self) -> Self {
        self.with_displacement(X, T::zero())
            .with_displacement(Y, T::zero())
    }

    pub fn x(&self) -> T {
        self.coords.x
    }

    pub fn y(&self) -> T {
        self.coords.y
    }
}
