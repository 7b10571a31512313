//! # difflin - Linear Algebra Containers over Differentiable Scalars
//!
//! Dense and sparse vectors and matrices that work on any [`Scalar`]:
//! primitive integers and floats, or [`Real`] numbers that carry a gradient
//! and Hessian alongside their value.
//!
//! This is the **meta crate** that re-exports the difflin components.
//!
//! ## Quick Start
//!
//! ```
//! use difflin::prelude::*;
//!
//! let mut a = SparseVector::new(&[1, 3], vec![2.0, 5.0], 5)?;
//! let b = SparseVector::new(&[2, 3], vec![4.0, 1.0], 5)?;
//!
//! let mut it = a.joint_iter(&b)?;
//! while it.ok() {
//!     if let Some((x, y)) = it.entry() {
//!         *x += *y;
//!     }
//!     it.advance();
//! }
//! drop(it);
//! assert_eq!(a.to_dense(), vec![0.0, 2.0, 4.0, 6.0, 0.0]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Scalars and dense matrices ([`core`])
//!
//! The [`Scalar`] capability, the differentiable [`Real`] type and
//! [`DenseMatrix`] with O(1) slices and transposed views.
//!
//! ```
//! use difflin::core::{DenseMatrix, Real64, Scalar};
//!
//! let x = Real64::variable(3.0, 0, 2, 1).unwrap();
//! assert_eq!(x.derivative(0), 1.0);
//! assert!(!x.is_null());
//!
//! let mut m = DenseMatrix::new(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
//! m.tip().unwrap();
//! assert_eq!(m.to_vec(), vec![1, 4, 2, 5, 3, 6]);
//! ```
//!
//! ### Sparse containers ([`sparse`])
//!
//! Sparse vectors and matrix views with self-compacting iteration and
//! joint merges.
//!
//! ```
//! use difflin::sparse::SparseMatrix;
//!
//! let m = SparseMatrix::new(&[0, 1], &[1, 0], vec![1.0, 1.0], 2, 2).unwrap();
//! assert!(m.is_symmetric(0.0));
//! ```
//!
//! ## Features
//!
//! - `tracing`: install a `tracing-subscriber` through
//!   [`core::tracing_support::init_tracing`]
//! - `serde`: serialization of [`Real`]

#![deny(warnings)]

// Re-export all components
pub use difflin_core as core;
pub use difflin_sparse as sparse;

pub use difflin_core::{DenseMatrix, Real, Real32, Real64, Scalar};
pub use difflin_sparse::{SparseMatrix, SparseVector};

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use difflin::prelude::*;
    //!
    //! let v = SparseVector::<Real64>::zeros(10);
    //! assert_eq!(v.nnz(), 0);
    //! ```

    // Scalars
    pub use crate::core::{Real, Real32, Real64, Scalar};

    // Dense
    pub use crate::core::DenseMatrix;

    // Sparse types
    pub use crate::sparse::{Cursor, CursorMut, SparseMatrix, SparseVector};

    // Errors
    pub use crate::core::{DenseError, PermutationError, ScalarError};
    pub use crate::sparse::{SparseError, SparseResult};
}
