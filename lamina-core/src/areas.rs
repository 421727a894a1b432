//! Sub-area solves driven by a coarse solution.
//!
//! The coarse element is split into a [`RegularGrid`] of cells. Every cell
//! gets its own [`StructuralSolver`] whose four nodes carry the coarse
//! displacement field, interpolated with
//! [`StructuralSolver::displacement_at`], as prescribed displacements. Each
//! cell solve then yields its own stiffness matrix and the nodal forces
//! (reactions) that hold it in the deformed shape.

use crate::error::Result;
use crate::grid::RegularGrid;
use crate::material::Material;
use crate::node::Condition;
use crate::solver::StructuralSolver;
use crate::types::{Real, X, Y};
use tracing::debug;

/// Solved cell of a split element.
#[derive(Debug, Clone)]
pub struct SubArea<T: Real> {
    /// Cell column in the grid.
    pub column: usize,
    /// Cell row in the grid.
    pub row: usize,
    pub solver: StructuralSolver<T>,
}

/// Grid of `nx × ny` cells covering the element of `coarse`.
pub fn element_grid<T: Real>(coarse: &StructuralSolver<T>, nx: usize, ny: usize) -> Result<RegularGrid<T>> {
    let corners = coarse.rectangle()?.corners();
    RegularGrid::new(corners[0].x, corners[0].y, corners[2].x, corners[2].y, nx, ny)
}

/// Split the element of `coarse` into `nx × ny` cells and solve each one with
/// the coarse displacements prescribed at its corners.
///
/// Cells inherit the configuration and element formulation of `coarse` and
/// are returned row by row from the bottom-left.
///
/// # Errors
///
/// `InvalidGeometry` for a degenerate coarse element or grid, and any error
/// raised by a cell solve.
pub fn solve_areas<T: Real>(
    coarse: &StructuralSolver<T>,
    material: &Material<T>,
    nx: usize,
    ny: usize,
) -> Result<Vec<SubArea<T>>> {
    let grid = element_grid(coarse, nx, ny)?;

    let mut areas = Vec::with_capacity(grid.n_cells());
    for row in 0..grid.ny() {
        for column in 0..grid.nx() {
            let mut nodes = grid.cell_nodes(column, row)?;
            for node in nodes.iter_mut() {
                let u = coarse.displacement_at(&node.coords)?;
                node.displacements = vec![Condition::new(X, u.x), Condition::new(Y, u.y)];
            }

            let mut solver = StructuralSolver::new(nodes)?
                .with_config(coarse.config().clone())
                .with_element(*coarse.element());
            solver.solve(material)?;
            debug!(column, row, "solved sub-area");

            areas.push(SubArea { column, row, solver });
        }
    }
    Ok(areas)
}
