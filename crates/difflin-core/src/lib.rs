//! # difflin-core
//!
//! Scalar types and dense matrices for difflin.
//!
//! This crate provides:
//!
//! - **Scalar capability** ([`Scalar`]) implemented for the primitive integer
//!   and float types
//! - **Differentiable reals** ([`Real`]) carrying gradient and Hessian state
//! - **Dense matrices** ([`DenseMatrix`]) with O(1) slices and transposed
//!   views plus an in-place transpose
//! - **Permutation helpers** shared with the sparse containers
//! - **Tracing support** for installing a log subscriber
//!
//! ## Quick Start
//!
//! ```
//! use difflin_core::{DenseMatrix, Real64, Scalar};
//!
//! let mut m = DenseMatrix::<Real64>::zeros(2, 2);
//! m.set_identity();
//! assert!(m.const_at(0, 0).unwrap().value() == 1.0);
//! assert!(m.const_at(0, 1).unwrap().is_null());
//! ```

#![deny(warnings)]

pub mod dense;
pub mod error;
pub mod permutation;
pub mod real;
pub mod scalar;
pub mod tracing_support;

pub use dense::DenseMatrix;
pub use error::{DenseError, DenseResult, PermutationError, ScalarError};
pub use real::{Real, Real32, Real64};
pub use scalar::Scalar;
