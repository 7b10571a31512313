//! Unified error types for sparse containers
//!
//! # Design
//!
//! - **`SparseError`**: Top-level enum covering all error cases
//! - **`ValidationError`**: invalid construction input (coordinate lists)
//! - **`ShapeMismatchError`**: operands or reshapes with incompatible dimensions
//! - **`IndexError`**: element or slice access outside the container
//! - Permutation and scalar errors from `difflin-core` convert via `#[from]`
//!
//! # Examples
//!
//! ```
//! use difflin_sparse::error::{SparseError, ValidationError};
//!
//! fn check_lengths(indices: &[usize], values: &[f64]) -> Result<(), SparseError> {
//!     if indices.len() != values.len() {
//!         return Err(ValidationError::LengthMismatch {
//!             indices: indices.len(),
//!             values: values.len(),
//!         }
//!         .into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_lengths(&[0, 1], &[1.0]).is_err());
//! ```

use difflin_core::error::{PermutationError, ScalarError};
use thiserror::Error;

/// Top-level error type for all sparse container operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    /// Validation errors (coordinate lists)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Shape mismatch errors
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatchError),

    /// Index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Invalid permutation vector
    #[error("Invalid permutation: {0}")]
    Permutation(#[from] PermutationError),

    /// Seeding derivative state of `Real` elements failed
    #[error("Scalar error: {0}")]
    Scalar(#[from] ScalarError),

    /// Both operands of a joint matrix iteration share one backing vector
    #[error("Joint iteration operands share the same storage")]
    AliasedOperands,

    #[error("Operation requires a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("In-place transpose requires a full, unsliced matrix")]
    NotContiguous,

    #[error("In-place transpose requires storage that is not shared with other views")]
    SharedStorage,
}

/// Validation errors for construction input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Indices and values must have same length: {indices} indices vs {values} values")]
    LengthMismatch { indices: usize, values: usize },

    #[error("Row and column index lists must have same length: {rows} vs {cols}")]
    CoordinateMismatch { rows: usize, cols: usize },

    #[error("Duplicate index {index:?} at position {position}")]
    DuplicateIndex { index: Vec<usize>, position: usize },
}

/// Shape mismatch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatchError {
    #[error("Vector dimension mismatch: expected {expected}, got {got}")]
    Vector { expected: usize, got: usize },

    #[error("Matrix dimension mismatch: expected {expected:?}, got {got:?}")]
    Matrix {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Cannot reshape vector of dimension {n} into {rows}x{cols}")]
    Reshape { n: usize, rows: usize, cols: usize },
}

/// Index errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Index out of bounds: index {index:?} exceeds shape {shape:?}")]
    OutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Invalid slice [{from}, {to}) for axis of length {len}")]
    InvalidSlice { from: usize, to: usize, len: usize },
}

/// Result type alias for sparse container operations
pub type SparseResult<T> = Result<T, SparseError>;

// Convenience constructors for common error patterns
impl SparseError {
    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: Vec<usize>, shape: Vec<usize>) -> Self {
        SparseError::Index(IndexError::OutOfBounds { index, shape })
    }

    /// Create an invalid slice error
    pub fn invalid_slice(from: usize, to: usize, len: usize) -> Self {
        SparseError::Index(IndexError::InvalidSlice { from, to, len })
    }

    /// Create a vector dimension mismatch error
    pub fn vector_mismatch(expected: usize, got: usize) -> Self {
        SparseError::ShapeMismatch(ShapeMismatchError::Vector { expected, got })
    }

    /// Create a matrix dimension mismatch error
    pub fn matrix_mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        SparseError::ShapeMismatch(ShapeMismatchError::Matrix { expected, got })
    }

    /// Create a duplicate index error
    pub fn duplicate_index(index: Vec<usize>, position: usize) -> Self {
        SparseError::Validation(ValidationError::DuplicateIndex { index, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = ValidationError::LengthMismatch {
            indices: 3,
            values: 2,
        };
        assert_eq!(
            err.to_string(),
            "Indices and values must have same length: 3 indices vs 2 values"
        );
    }

    #[test]
    fn test_index_error() {
        let err = SparseError::index_out_of_bounds(vec![5], vec![5]);
        assert_eq!(
            err.to_string(),
            "Index error: Index out of bounds: index [5] exceeds shape [5]"
        );
    }

    #[test]
    fn test_sparse_error_from_permutation() {
        let err: SparseError = PermutationError::Duplicate { value: 1 }.into();
        assert!(matches!(err, SparseError::Permutation(_)));
    }

    #[test]
    fn test_vector_mismatch() {
        let err = SparseError::vector_mismatch(3, 4);
        assert_eq!(
            err,
            SparseError::ShapeMismatch(ShapeMismatchError::Vector {
                expected: 3,
                got: 4
            })
        );
        assert_eq!(
            err.to_string(),
            "Shape mismatch: Vector dimension mismatch: expected 3, got 4"
        );
    }

    #[test]
    fn test_sparse_error_from_scalar() {
        let err: SparseError = ScalarError::UnsupportedOrder(3).into();
        assert!(matches!(
            err,
            SparseError::Scalar(ScalarError::UnsupportedOrder(3))
        ));
    }

    #[test]
    fn test_reshape_error() {
        let err = ShapeMismatchError::Reshape {
            n: 5,
            rows: 2,
            cols: 3,
        };
        assert_eq!(
            err.to_string(),
            "Cannot reshape vector of dimension 5 into 2x3"
        );
    }
}
