//! # difflin-sparse
//!
//! Sparse vectors and matrices for difflin.
//!
//! This crate provides:
//! - Sorted-on-read key index with tombstone deletion
//! - Mutating and read-only cursors; the mutating cursor evicts null entries
//!   as it passes them
//! - Two- and three-way joint merges over the union of stored indices
//! - [`SparseVector`] with slicing, append, permutation and value sort
//! - [`SparseMatrix`] views with O(1) slices, transpose and in-place
//!   transpose over a shared flat backing vector
//!
//! Every container is generic over [`difflin_core::Scalar`], so the same code
//! runs on plain numbers and on differentiable reals.

#![deny(warnings)]

pub mod error;
pub mod index;
pub mod iterators;
pub mod matrix;
pub mod vector;

// Re-exports
pub use error::*;
pub use index::{SparseIndex, TOMBSTONE};
pub use iterators::{
    ConstIter, Cursor, CursorMut, JointIter2, JointIter3, KeyMap, Linear, SparseIter,
    VectorConstIter, VectorIter,
};
pub use matrix::{MatrixConstIter, MatrixIter, SparseMatrix, Window};
pub use vector::SparseVector;
