//! Dense linear system backends for `K * u = f`.
//!
//! - [`DenseLuSolver`]: nalgebra LU with partial pivoting, any precision.
//! - [`CholeskySolver`]: faer LLᵀ factorization, for the symmetric
//!   positive definite matrices left after constraint elimination.

use crate::error::{Error, Result};
use crate::types::Real;
use faer::linalg::cholesky::llt::factor::LltError;
use faer::linalg::solvers::Solve;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::linalg::LltError as SparseLltError;
use faer::sparse::{SparseColMat, SymbolicSparseColMat};
use nalgebra::{convert, try_convert, DMatrix, DVector};

/// Linear solver interface.
pub trait LinearSolver<T: Real>: Send + Sync {
    /// Solve the linear system Ax = b.
    ///
    /// # Arguments
    ///
    /// * `matrix` - System matrix (K)
    /// * `rhs` - Right-hand side vector (f)
    ///
    /// # Returns
    ///
    /// Solution vector (u)
    fn solve(&self, matrix: &DMatrix<T>, rhs: &DVector<T>) -> Result<DVector<T>>;

    /// Solver name for diagnostics.
    fn name(&self) -> &str;
}

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// Dense LU with partial pivoting.
    #[default]
    DenseLu,
    /// Cholesky (LLᵀ) factorization via faer.
    Cholesky,
}

fn check_dimensions<T: Real>(matrix: &DMatrix<T>, rhs: &DVector<T>) -> Result<()> {
    if matrix.nrows() != matrix.ncols() {
        return Err(Error::DimensionMismatch(format!(
            "matrix must be square, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    if matrix.nrows() != rhs.len() {
        return Err(Error::DimensionMismatch(format!(
            "RHS has {} entries for a {}x{} matrix",
            rhs.len(),
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    Ok(())
}

/// Direct solver using nalgebra dense LU factorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseLuSolver;

impl DenseLuSolver {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Real> LinearSolver<T> for DenseLuSolver {
    fn solve(&self, matrix: &DMatrix<T>, rhs: &DVector<T>) -> Result<DVector<T>> {
        check_dimensions(matrix, rhs)?;
        if rhs.is_empty() {
            return Ok(DVector::zeros(0));
        }

        let solution = matrix
            .clone()
            .lu()
            .solve(rhs)
            .ok_or_else(|| Error::UnderconstrainedSystem("LU factorization hit a zero pivot".into()))?;

        if solution.iter().any(|x| !x.is_finite()) {
            return Err(Error::UnderconstrainedSystem(
                "LU solution contains non-finite values".into(),
            ));
        }
        Ok(solution)
    }

    fn name(&self) -> &str {
        "Dense LU"
    }
}

/// Copy the non-zero entries of a dense matrix into faer column storage.
fn dense_to_faer_csc<T: Real>(matrix: &DMatrix<T>) -> Result<SparseColMat<usize, f64>> {
    let nrows = matrix.nrows();
    let ncols = matrix.ncols();

    let mut col_offsets = Vec::with_capacity(ncols + 1);
    let mut row_indices = Vec::new();
    let mut values = Vec::new();
    col_offsets.push(0);

    for col in 0..ncols {
        for (row, value) in matrix.column(col).iter().enumerate() {
            let value = to_f64(*value)?;
            if value != 0.0 {
                row_indices.push(row);
                values.push(value);
            }
        }
        col_offsets.push(row_indices.len());
    }

    let symbolic = SymbolicSparseColMat::new_checked(nrows, ncols, col_offsets, None, row_indices);
    Ok(SparseColMat::new(symbolic, values))
}

fn to_f64<T: Real>(value: T) -> Result<f64> {
    try_convert::<T, f64>(value)
        .ok_or_else(|| Error::Solver(format!("{:?} has no f64 representation", value)))
}

/// Cholesky solver using the faer library.
///
/// Factorization runs in `f64` whatever the scalar type. A non-positive pivot
/// means the constrained stiffness still has a zero energy mode and is
/// reported as `UnderconstrainedSystem`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CholeskySolver;

impl CholeskySolver {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Real> LinearSolver<T> for CholeskySolver {
    fn solve(&self, matrix: &DMatrix<T>, rhs: &DVector<T>) -> Result<DVector<T>> {
        check_dimensions(matrix, rhs)?;
        let n = rhs.len();
        if n == 0 {
            return Ok(DVector::zeros(0));
        }

        let csc = dense_to_faer_csc(matrix)?;
        let csc_ref = csc.as_ref();

        let symbolic = SymbolicLlt::try_new(csc_ref.symbolic(), faer::Side::Lower)
            .map_err(|_| Error::Solver("symbolic Cholesky analysis failed".into()))?;

        let llt = Llt::try_new_with_symbolic(symbolic, csc_ref, faer::Side::Lower).map_err(|e| match e {
            SparseLltError::Generic(err) => Error::Solver(format!("Cholesky error: {:?}", err)),
            SparseLltError::Numeric(LltError::NonPositivePivot { index }) => Error::UnderconstrainedSystem(
                format!("stiffness is not positive definite at pivot {}", index),
            ),
        })?;

        let mut b = Vec::with_capacity(n);
        for value in rhs.iter() {
            b.push(to_f64(*value)?);
        }
        let mut x = faer::Mat::from_fn(n, 1, |i, _| b[i]);
        llt.solve_in_place(x.as_mut());

        Ok(DVector::from_fn(n, |i, _| convert::<f64, T>(x[(i, 0)])))
    }

    fn name(&self) -> &str {
        "faer Cholesky (LLᵀ)"
    }
}

/// Backend for a [`SolverKind`].
pub fn select_solver<T: Real>(kind: SolverKind) -> Box<dyn LinearSolver<T>> {
    match kind {
        SolverKind::DenseLu => Box::new(DenseLuSolver::new()),
        SolverKind::Cholesky => Box::new(CholeskySolver::new()),
    }
}
