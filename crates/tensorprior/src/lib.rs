#![warn(missing_docs)]
//! Structured tensor priors
//!
//! This crate draws random tensors `W` of shape `(J, …, J)` (order `D`) that
//! satisfy a linear structure `A · vec(W) = b` exactly, for use as prior
//! samples in Bayesian inverse problems. Supported families:
//! - `Triangular`: supported on non-decreasing multi-indices, sampled through
//!   an orthonormal nullspace basis built block by block
//! - `FixedSum`: fibers along the last axis sum to one
//! - `PermutationInvariant(Symmetric)`: invariant under all axis permutations
//! - `PermutationInvariant(Hankel)`: constant on equal index sums
//!
//! Every sampler takes the random number generator as a parameter, so results
//! are reproducible with a seeded generator.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tensorprior::{constraint_residual, sample, ConstraintFamily};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(0);
//! let s = sample(ConstraintFamily::FixedSum, 2, 5, &mut rng).unwrap();
//!
//! // Every row sum is one
//! let marginal = s.marginal.unwrap();
//! assert!(marginal.as_slice().iter().all(|m| (m - 1.0).abs() < 1e-12));
//! assert!(constraint_residual(ConstraintFamily::FixedSum, &s.tensor).unwrap() < 1e-12);
//! ```

pub mod error;
pub mod family;
pub mod fixed_sum;
pub mod hankel;
pub mod permutation;
pub mod sampler;
pub mod symmetric;
pub mod tensor;
pub mod triangular;
pub mod verify;

// Re-export main types
pub use error::{PriorError, Result};
pub use family::{ConstraintFamily, SupportedShape, Symmetry};
pub use fixed_sum::{fixed_sum_basis, particular_solution, sample_fixed_sum, FixedSumSample};
pub use hankel::{bucket_count, hankel_basis, hankel_buckets, sample_hankel};
pub use permutation::{is_permutation, permutations};
pub use sampler::{basis, basis_with, sample, sample_from_basis, sample_with, Sample, SamplerOptions};
pub use symmetric::{sample_symmetric, symmetrize, symmetrizer};
pub use tensor::Tensor;
pub use triangular::{
    constraint_matrix, default_cleanup_tol, expected_rank, sample_triangular,
    sample_triangular_with, set_default_cleanup_tol, triangular_basis, triangular_basis_with,
    TriangularOptions,
};
pub use verify::constraint_residual;

pub use ndarray;
pub use tensorprior_linalg::NullspaceOptions;
