//! Legacy ASCII VTK export for ParaView.
//!
//! Writes `UNSTRUCTURED_GRID` datasets of quadrilateral cells (VTK cell type
//! 9). Points are written with `z = 0`; displacements, when present, go to a
//! `POINT_DATA` section as 3-component vectors.

use crate::error::{Error, Result};
use crate::grid::RegularGrid;
use crate::solver::StructuralSolver;
use crate::types::{Coordinate, Real, DOFS_PER_NODE, NODES_PER_ELEMENT};
use std::io::Write;

/// VTK cell type of a 4-node quadrilateral.
pub const VTK_QUAD: u8 = 9;

/// Write points, quad cells and optional nodal displacements.
///
/// `displacements` is interleaved `[u0, v0, u1, v1, ...]`, one pair per point.
pub fn write_unstructured_grid<T: Real, W: Write>(
    writer: &mut W,
    title: &str,
    points: &[Coordinate<T>],
    cells: &[[usize; NODES_PER_ELEMENT]],
    displacements: Option<&[T]>,
) -> Result<()> {
    if let Some(cell) = cells.iter().find(|c| c.iter().any(|&p| p >= points.len())) {
        return Err(Error::DimensionMismatch(format!(
            "cell {:?} references a point beyond the {} written",
            cell,
            points.len()
        )));
    }
    if let Some(u) = displacements {
        if u.len() != DOFS_PER_NODE * points.len() {
            return Err(Error::DimensionMismatch(format!(
                "{} displacement values for {} points",
                u.len(),
                points.len()
            )));
        }
    }

    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "{}", title)?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;
    writeln!(writer)?;

    writeln!(writer, "POINTS {} float", points.len())?;
    for p in points {
        writeln!(writer, "{:?} {:?} 0.0", p.x, p.y)?;
    }

    writeln!(writer)?;
    writeln!(writer, "CELLS {} {}", cells.len(), cells.len() * (NODES_PER_ELEMENT + 1))?;
    for cell in cells {
        writeln!(writer, "{} {} {} {} {}", NODES_PER_ELEMENT, cell[0], cell[1], cell[2], cell[3])?;
    }

    writeln!(writer)?;
    writeln!(writer, "CELL_TYPES {}", cells.len())?;
    for _ in cells {
        writeln!(writer, "{}", VTK_QUAD)?;
    }

    if let Some(u) = displacements {
        writeln!(writer)?;
        writeln!(writer, "POINT_DATA {}", points.len())?;
        writeln!(writer, "VECTORS displacement float")?;
        for pair in u.chunks(DOFS_PER_NODE) {
            writeln!(writer, "{:?} {:?} 0.0", pair[0], pair[1])?;
        }
    }

    Ok(())
}

/// Write the element of a solver together with its displacement field.
pub fn write_solution<T: Real, W: Write>(writer: &mut W, solver: &StructuralSolver<T>) -> Result<()> {
    let points = solver.coordinates();
    let cell: [usize; NODES_PER_ELEMENT] = [0, 1, 2, 3];
    write_unstructured_grid(
        writer,
        "Finite Element Solution",
        &points,
        &[cell],
        Some(solver.displacement_vector().as_slice()),
    )
}

/// Write the cells of a regular grid, without point data.
pub fn write_grid<T: Real, W: Write>(writer: &mut W, grid: &RegularGrid<T>) -> Result<()> {
    write_unstructured_grid(writer, "Regular Grid", &grid.points(), &grid.cells(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn unit_square_solver() -> StructuralSolver<f64> {
        StructuralSolver::new(vec![
            Node::new(0.0, 0.0),
            Node::new(1.0, 0.0),
            Node::new(1.0, 1.0),
            Node::new(0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_solution_sections() {
        let mut buffer = Vec::new();
        write_solution(&mut buffer, &unit_square_solver()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# vtk DataFile Version 3.0");
        assert_eq!(lines[2], "ASCII");
        assert_eq!(lines[3], "DATASET UNSTRUCTURED_GRID");
        assert!(text.contains("POINTS 4 float\n0.0 0.0 0.0\n1.0 0.0 0.0\n"));
        assert!(text.contains("CELLS 1 5\n4 0 1 2 3\n"));
        assert!(text.contains("CELL_TYPES 1\n9\n"));
        assert!(text.contains("POINT_DATA 4\nVECTORS displacement float\n"));
        assert_eq!(text.lines().filter(|l| *l == "0.0 0.0 0.0").count(), 5);
    }

    #[test]
    fn test_grid_has_no_point_data() {
        let grid = RegularGrid::new(0.0, 0.0, 2.0, 1.0, 2, 1).unwrap();
        let mut buffer = Vec::new();
        write_grid(&mut buffer, &grid).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("POINTS 6 float"));
        assert!(text.contains("CELLS 2 10\n4 0 1 4 3\n4 1 2 5 4\n"));
        assert!(!text.contains("POINT_DATA"));
    }

    #[test]
    fn test_rejects_bad_cells() {
        let points = vec![Coordinate::new(0.0, 0.0); 3];
        let mut buffer = Vec::new();
        assert!(matches!(
            write_unstructured_grid(&mut buffer, "bad", &points, &[[0, 1, 2, 3]], None),
            Err(Error::DimensionMismatch(_))
        ));
        assert!(buffer.is_empty());
    }
}
