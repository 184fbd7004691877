//! Error types for structured tensor sampling

use tensorprior_linalg::LinalgError;
use thiserror::Error;

use crate::family::{ConstraintFamily, SupportedShape};

/// Result type for sampling operations
pub type Result<T> = std::result::Result<T, PriorError>;

/// Errors that can occur while building bases or sampling tensors
#[derive(Debug, Error)]
pub enum PriorError {
    /// Order or dimension outside the range a family supports
    #[error("{family} sampler does not support order {order} with dimension {dim} (supported: {supported})")]
    InvalidShape {
        /// The requested family
        family: ConstraintFamily,
        /// Requested tensor order `D`
        order: usize,
        /// Requested per-mode dimension `J`
        dim: usize,
        /// The family's supported range
        supported: SupportedShape,
    },

    /// A nullspace basis came out with a rank other than the theoretical one
    #[error("Numerical instability in {family} basis: rank {actual}, expected {expected}")]
    NumericalInstability {
        /// The family whose basis was built
        family: ConstraintFamily,
        /// Theoretical basis width
        expected: usize,
        /// Width actually obtained
        actual: usize,
    },

    /// Data length or dims do not describe the same tensor
    #[error("Shape mismatch: {message}")]
    ShapeMismatch {
        /// Description of the mismatch
        message: String,
    },

    /// An axis permutation is not a permutation of `0..order`
    #[error("Invalid permutation {perm:?} for a tensor of order {order}")]
    InvalidPermutation {
        /// The rejected permutation
        perm: Vec<usize>,
        /// Order of the tensor it was applied to
        order: usize,
    },

    /// Failure in the linear algebra layer
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}
