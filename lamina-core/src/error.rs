//! Error types for lamina operations.

use thiserror::Error;

/// Result type alias using lamina Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while formulating or solving a plane-stress problem.
#[derive(Error, Debug)]
pub enum Error {
    /// Degenerate or non-rectangular element geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The constrained stiffness matrix is still singular: rigid-body modes remain.
    #[error("underconstrained system: {0}")]
    UnderconstrainedSystem(String),

    /// Node, condition or vector sizes do not match the DOF layout.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Linear solver backend failure.
    #[error("solver error: {0}")]
    Solver(String),

    /// I/O errors while exporting results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
