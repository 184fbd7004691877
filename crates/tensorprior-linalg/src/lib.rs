#![warn(missing_docs)]
//! Dense linear algebra for structured tensor priors.
//!
//! This crate collects the matrix primitives the samplers in `tensorprior`
//! are built from. Everything operates on [`faer::Mat<f64>`]:
//!
//! - [`nullspace`]: orthonormal nullspace basis via the SVD with a
//!   relative-tolerance rank cutoff
//! - [`kron_identity_left`]: block-diagonal `I_n ⊗ A`
//! - [`RowSelector`]: sparse 0/1 matrices with one unit entry per row, closed
//!   under Kronecker products, applied by gathering rows
//! - [`matmul`]: GEMM through faer
//!
//! # Example
//!
//! ```
//! use tensorprior_linalg::{nullspace, matmul, Mat};
//!
//! // A single constraint x1 = 0 on R^2
//! let a = Mat::from_fn(1, 2, |_, j| if j == 1 { 1.0 } else { 0.0 });
//! let n = nullspace(&a).unwrap();
//! assert_eq!(n.ncols(), 1);
//!
//! let an = matmul(&a, &n).unwrap();
//! assert!(an[(0, 0)].abs() < 1e-12);
//! ```

pub mod error;
pub mod kron;
pub mod matmul;
pub mod nullspace;
pub mod selector;
pub mod tolerance;

pub use faer;
pub use faer::Mat;

pub use error::{LinalgError, Result};
pub use kron::kron_identity_left;
pub use matmul::{matmul, max_abs, orthonormality_error};
pub use nullspace::{
    default_nullspace_rtol, nullspace, nullspace_with, numerical_rank, set_default_nullspace_rtol,
    NullspaceOptions,
};
pub use selector::RowSelector;
pub use tolerance::{GlobalTolerance, InvalidToleranceError};
