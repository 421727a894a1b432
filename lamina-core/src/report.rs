//! Plain-text reports of solver results.

use crate::error::Result;
use crate::solver::StructuralSolver;
use crate::types::{dof_index, Real, X, Y};
use nalgebra::DMatrix;
use std::io::Write;

/// Write a matrix under a `Stiffness Matrix (RxC):` header, one row per line.
pub fn write_stiffness_matrix<T: Real, W: Write>(writer: &mut W, matrix: &DMatrix<T>) -> Result<()> {
    writeln!(writer, "Stiffness Matrix ({}x{}):", matrix.nrows(), matrix.ncols())?;
    write_rows(writer, matrix)
}

/// Write a matrix under a `<label> Stiffness Matrix (RxC):` header.
pub fn write_labelled_stiffness_matrix<T: Real, W: Write>(
    writer: &mut W,
    label: &str,
    matrix: &DMatrix<T>,
) -> Result<()> {
    writeln!(
        writer,
        "{} Stiffness Matrix ({}x{}):",
        label,
        matrix.nrows(),
        matrix.ncols()
    )?;
    write_rows(writer, matrix)
}

fn write_rows<T: Real, W: Write>(writer: &mut W, matrix: &DMatrix<T>) -> Result<()> {
    for row in matrix.row_iter() {
        let line: Vec<String> = row.iter().map(|v| format!("{:>14.4}", v)).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Write a node table: coordinates, displacements and support reactions.
pub fn write_displacement_table<T: Real, W: Write>(
    writer: &mut W,
    solver: &StructuralSolver<T>,
) -> Result<()> {
    let u = solver.displacement_vector();
    let reactions = solver.reactions();
    writeln!(
        writer,
        "{:>4} {:>12} {:>12} {:>18} {:>18} {:>14} {:>14}",
        "node", "x", "y", "u", "v", "Rx", "Ry"
    )?;
    for (i, node) in solver.nodes().iter().enumerate() {
        let (x, y) = (dof_index(i, X), dof_index(i, Y));
        writeln!(
            writer,
            "{:>4} {:>12.6} {:>12.6} {:>18.12} {:>18.12} {:>14.6} {:>14.6}",
            i,
            node.x(),
            node.y(),
            u[x],
            u[y],
            reactions[x],
            reactions[y],
        )?;
    }
    Ok(())
}
