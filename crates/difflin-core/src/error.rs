//! Error types shared by the difflin containers
//!
//! # Design
//!
//! - **`PermutationError`**: invalid permutation vectors, reused by dense and
//!   sparse permutation routines
//! - **`ScalarError`**: invalid derivative bookkeeping on differentiable scalars
//! - **`DenseError`**: bounds, shape and view errors of [`crate::DenseMatrix`]
//!
//! # Examples
//!
//! ```
//! use difflin_core::error::{DenseError, PermutationError};
//!
//! let err: DenseError = PermutationError::Duplicate { value: 2 }.into();
//! assert!(matches!(err, DenseError::Permutation(_)));
//! ```

use thiserror::Error;

/// Errors raised when validating a permutation vector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Permutation has length {got}, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Permutation entry {value} at position {position} is outside [0, {len})")]
    OutOfRange {
        position: usize,
        value: usize,
        len: usize,
    },

    #[error("Permutation maps more than one position onto {value}")]
    Duplicate { value: usize },
}

/// Errors raised by differentiable scalars
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    #[error("Derivative order {0} is not supported (maximum is 2)")]
    UnsupportedOrder(usize),

    #[error("Variable index {index} out of range for {n} variables")]
    VariableOutOfRange { index: usize, n: usize },
}

/// Errors raised by dense matrices
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseError {
    #[error("Index ({row}, {col}) out of bounds for matrix of dimension {rows}x{cols}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Dimension mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Matrix of dimension {rows}x{cols} requires {expected} values, got {got}")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid slice [{from}, {to}) for axis of length {len}")]
    InvalidSlice { from: usize, to: usize, len: usize },

    #[error("Operation requires a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("In-place transpose requires a full, unsliced matrix")]
    NotContiguous,

    #[error("In-place transpose requires storage that is not shared with other views")]
    SharedStorage,

    #[error("Invalid permutation: {0}")]
    Permutation(#[from] PermutationError),
}

/// Result type alias for dense matrix operations
pub type DenseResult<T> = Result<T, DenseError>;

impl DenseError {
    /// Create an index out of bounds error for a `rows x cols` matrix
    pub fn out_of_bounds(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        DenseError::IndexOutOfBounds {
            row,
            col,
            rows,
            cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_error_display() {
        let err = PermutationError::OutOfRange {
            position: 1,
            value: 7,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Permutation entry 7 at position 1 is outside [0, 3)"
        );
    }

    #[test]
    fn test_dense_error_display() {
        let err = DenseError::out_of_bounds(3, 0, 2, 2);
        assert_eq!(
            err.to_string(),
            "Index (3, 0) out of bounds for matrix of dimension 2x2"
        );
    }

    #[test]
    fn test_dense_error_from_permutation() {
        let err: DenseError = PermutationError::LengthMismatch {
            expected: 3,
            got: 2,
        }
        .into();
        assert!(matches!(err, DenseError::Permutation(_)));
    }
}
