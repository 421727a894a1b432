//! Global assembly and boundary condition enforcement.
//!
//! Builds the global system from element contributions and node conditions:
//! 1. Scatter-add element stiffness through the element DOF map
//! 2. Write nodal forces into the load vector
//! 3. Enforce prescribed displacements by row/column elimination
//!
//! Elimination only zeroes row and column and writes the prescribed value
//! into the right-hand side. With a nonzero value the free equations lose the
//! coupling to that DOF; [`lift_prescribed_value`] restores it when requested.
//!
//! DOF indexing is always `2 * node + direction`.

use crate::error::{Error, Result};
use crate::node::{Condition, Node};
use crate::types::{dof_index, Real, DOFS_PER_NODE, ELEMENT_DOFS, NODES_PER_ELEMENT};
use nalgebra::{DMatrix, DVector};
use tracing::warn;

/// Global DOFs of an element, in element DOF order.
pub fn element_dof_indices(connectivity: &[usize; NODES_PER_ELEMENT]) -> [usize; ELEMENT_DOFS] {
    let mut dofs = [0; ELEMENT_DOFS];
    for (local, &node) in connectivity.iter().enumerate() {
        for direction in 0..DOFS_PER_NODE {
            dofs[dof_index(local, direction)] = dof_index(node, direction);
        }
    }
    dofs
}

/// Add an element matrix into the global matrix at `dofs`.
pub fn scatter_add<T: Real>(global: &mut DMatrix<T>, dofs: &[usize], element: &DMatrix<T>) -> Result<()> {
    if element.nrows() != dofs.len() || element.ncols() != dofs.len() {
        return Err(Error::DimensionMismatch(format!(
            "element matrix is {}x{} but the DOF map has {} entries",
            element.nrows(),
            element.ncols(),
            dofs.len()
        )));
    }
    if let Some(&dof) = dofs.iter().find(|&&dof| dof >= global.nrows()) {
        return Err(Error::DimensionMismatch(format!(
            "DOF {} out of bounds for a {}x{} global matrix",
            dof,
            global.nrows(),
            global.ncols()
        )));
    }

    for (local_row, &global_row) in dofs.iter().enumerate() {
        for (local_col, &global_col) in dofs.iter().enumerate() {
            global[(global_row, global_col)] += element[(local_row, local_col)];
        }
    }
    Ok(())
}

/// Global DOF of a condition on `node`, checking the direction.
fn condition_dof<T: Real>(node: usize, condition: &Condition<T>, n_dofs: usize) -> Result<usize> {
    if !condition.has_valid_direction() {
        return Err(Error::DimensionMismatch(format!(
            "node {} has a condition in direction {}, expected 0 (x) or 1 (y)",
            node, condition.direction
        )));
    }
    let dof = dof_index(node, condition.direction);
    if dof >= n_dofs {
        return Err(Error::DimensionMismatch(format!(
            "DOF {} of node {} exceeds the {} system DOFs",
            dof, node, n_dofs
        )));
    }
    Ok(dof)
}

/// Write nodal forces into `forces`, which is zeroed first.
///
/// A repeated force on the same DOF overwrites the earlier one.
pub fn assemble_forces<T: Real>(nodes: &[Node<T>], forces: &mut DVector<T>) -> Result<()> {
    forces.fill(T::zero());
    for (i, node) in nodes.iter().enumerate() {
        for force in &node.forces {
            let dof = condition_dof(i, force, forces.len())?;
            forces[dof] = force.value;
        }
    }
    Ok(())
}

/// Enforce a prescribed displacement on one DOF.
///
/// Row and column `dof` are zeroed, the diagonal is set to 1 and
/// `rhs[dof] = value`. The matrix stays symmetric and square.
pub fn eliminate_dof<T: Real>(matrix: &mut DMatrix<T>, rhs: &mut DVector<T>, dof: usize, value: T) {
    matrix.row_mut(dof).fill(T::zero());
    matrix.column_mut(dof).fill(T::zero());
    matrix[(dof, dof)] = T::one();
    rhs[dof] = value;
}

/// Subtract column `dof` times `value` from the right-hand side.
///
/// Run before [`eliminate_dof`] so the free equations of the original system
/// still hold for a nonzero prescribed value.
pub fn lift_prescribed_value<T: Real>(matrix: &DMatrix<T>, rhs: &mut DVector<T>, dof: usize, value: T) {
    if value == T::zero() {
        return;
    }
    for i in 0..rhs.len() {
        rhs[i] -= matrix[(i, dof)] * value;
    }
}

/// Apply every prescribed displacement of `nodes` to the system.
///
/// Returns the constrained DOF mask. Displacements are applied after the
/// forces, so a displacement overrides a force on the same DOF. With `lift`
/// each value is moved to the right-hand side before its DOF is eliminated.
pub fn apply_displacements<T: Real>(
    nodes: &[Node<T>],
    matrix: &mut DMatrix<T>,
    rhs: &mut DVector<T>,
    lift: bool,
) -> Result<Vec<bool>> {
    if matrix.nrows() != rhs.len() || matrix.ncols() != rhs.len() {
        return Err(Error::DimensionMismatch(format!(
            "system matrix is {}x{} but the right-hand side has {} entries",
            matrix.nrows(),
            matrix.ncols(),
            rhs.len()
        )));
    }

    let mut constrained = vec![false; rhs.len()];
    for (i, node) in nodes.iter().enumerate() {
        for displacement in &node.displacements {
            let dof = condition_dof(i, displacement, rhs.len())?;
            if node.forces.iter().any(|f| f.direction == displacement.direction) {
                warn!(node = i, dof, "prescribed displacement overrides applied force");
            }
            if lift {
                lift_prescribed_value(matrix, rhs, dof, displacement.value);
            }
            eliminate_dof(matrix, rhs, dof, displacement.value);
            constrained[dof] = true;
        }
    }
    Ok(constrained)
}
