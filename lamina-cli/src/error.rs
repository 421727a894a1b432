//! Error types for the lamina command line.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Failure inside the solver library.
    #[error(transparent)]
    Core(#[from] lamina_core::Error),

    /// Malformed problem description.
    #[error("invalid problem file {path}: {source}")]
    Problem {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
