//! Regular rectangular grids.
//!
//! A [`RegularGrid`] splits a rectangle into `nx × ny` equal cells. Points are
//! numbered row by row from the bottom-left corner:
//!
//! ```text
//! 6 --- 7 --- 8
//! |     |     |
//! 3 --- 4 --- 5
//! |     |     |
//! 0 --- 1 --- 2
//! ```
//!
//! Each cell yields four corners in element node order, so every cell can be
//! handed to its own [`StructuralSolver`](crate::solver::StructuralSolver).

use crate::error::{Error, Result};
use crate::node::Node;
use crate::types::{Coordinate, Real, NODES_PER_ELEMENT};
use nalgebra::convert;

/// Uniform grid over an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularGrid<T: Real> {
    origin: Coordinate<T>,
    cell_width: T,
    cell_height: T,
    nx: usize,
    ny: usize,
}

impl<T: Real> RegularGrid<T> {
    /// Grid of `nx × ny` cells between `(x0, y0)` and `(x1, y1)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if a division count is zero, a bound is not
    /// finite, or the upper corner is not strictly above and right of the lower.
    pub fn new(x0: T, y0: T, x1: T, y1: T, nx: usize, ny: usize) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidGeometry(format!(
                "grid needs at least one cell per axis, got {}x{}",
                nx, ny
            )));
        }
        if [x0, y0, x1, y1].iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidGeometry("grid bounds must be finite".into()));
        }
        if x1 <= x0 || y1 <= y0 {
            return Err(Error::InvalidGeometry(format!(
                "grid extent ({:?}, {:?}) to ({:?}, {:?}) is empty or inverted",
                x0, y0, x1, y1
            )));
        }

        Ok(Self {
            origin: Coordinate::new(x0, y0),
            cell_width: (x1 - x0) / convert::<f64, T>(nx as f64),
            cell_height: (y1 - y0) / convert::<f64, T>(ny as f64),
            nx,
            ny,
        })
    }

    /// Cells along x.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along y.
    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn n_points(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    pub fn n_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Index of the grid point in column `i`, row `j`.
    pub fn point_index(&self, i: usize, j: usize) -> usize {
        j * (self.nx + 1) + i
    }

    /// Coordinates of the grid point in column `i`, row `j`.
    pub fn point(&self, i: usize, j: usize) -> Coordinate<T> {
        Coordinate::new(
            self.origin.x + self.cell_width * convert::<f64, T>(i as f64),
            self.origin.y + self.cell_height * convert::<f64, T>(j as f64),
        )
    }

    /// All grid points, row by row from the bottom-left.
    pub fn points(&self) -> Vec<Coordinate<T>> {
        (0..=self.ny)
            .flat_map(|j| (0..=self.nx).map(move |i| (i, j)))
            .map(|(i, j)| self.point(i, j))
            .collect()
    }

    /// Point indices of cell `(i, j)`, counter-clockwise from the bottom-left.
    pub fn cell_connectivity(&self, i: usize, j: usize) -> Result<[usize; NODES_PER_ELEMENT]> {
        self.check_cell(i, j)?;
        Ok([
            self.point_index(i, j),
            self.point_index(i + 1, j),
            self.point_index(i + 1, j + 1),
            self.point_index(i, j + 1),
        ])
    }

    /// Corner coordinates of cell `(i, j)` in element node order.
    pub fn cell_corners(&self, i: usize, j: usize) -> Result<[Coordinate<T>; NODES_PER_ELEMENT]> {
        self.check_cell(i, j)?;
        Ok([
            self.point(i, j),
            self.point(i + 1, j),
            self.point(i + 1, j + 1),
            self.point(i, j + 1),
        ])
    }

    /// Unloaded, unconstrained nodes for the solver of cell `(i, j)`.
    pub fn cell_nodes(&self, i: usize, j: usize) -> Result<Vec<Node<T>>> {
        Ok(self
            .cell_corners(i, j)?
            .iter()
            .map(|c| Node::new(c.x, c.y))
            .collect())
    }

    /// Connectivity of every cell, row by row.
    pub fn cells(&self) -> Vec<[usize; NODES_PER_ELEMENT]> {
        let mut cells = Vec::with_capacity(self.n_cells());
        for j in 0..self.ny {
            for i in 0..self.nx {
                cells.push([
                    self.point_index(i, j),
                    self.point_index(i + 1, j),
                    self.point_index(i + 1, j + 1),
                    self.point_index(i, j + 1),
                ]);
            }
        }
        cells
    }

    fn check_cell(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.nx || j >= self.ny {
            return Err(Error::DimensionMismatch(format!(
                "cell ({}, {}) outside a {}x{} grid",
                i, j, self.nx, self.ny
            )));
        }
        Ok(())
    }
}
