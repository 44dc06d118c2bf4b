//! Error types for loading and building puzzles.

use thiserror::Error;

/// Errors raised before any search begins. Running out of fills is not one of these; the solver
/// reports that as a normal result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The structure text can't be read as a rectangular grid.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// The grid (or an explicit slot list) can't be split into well-formed slots.
    #[error("Malformed structure at row {row}, column {col}: {reason}")]
    MalformedStructure {
        row: usize,
        col: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
