//! Error types for tensorprior-linalg

use thiserror::Error;

/// Result type for linear algebra operations
pub type Result<T> = std::result::Result<T, LinalgError>;

/// Errors that can occur in the dense linear algebra layer
#[derive(Debug, Error)]
pub enum LinalgError {
    /// The singular value decomposition did not converge
    #[error("SVD failed for a {nrows}x{ncols} matrix: {message}")]
    Svd {
        /// Rows of the decomposed matrix
        nrows: usize,
        /// Columns of the decomposed matrix
        ncols: usize,
        /// Backend error description
        message: String,
    },

    /// Tolerance is negative, NaN or infinite
    #[error("Invalid rtol value: {0}. rtol must be finite and non-negative.")]
    InvalidRtol(f64),

    /// Operand shapes are incompatible
    #[error("Dimension mismatch in {op}: ({lhs_rows}, {lhs_cols}) vs ({rhs_rows}, {rhs_cols})")]
    DimensionMismatch {
        /// Name of the operation
        op: &'static str,
        /// Rows of the left operand
        lhs_rows: usize,
        /// Columns of the left operand
        lhs_cols: usize,
        /// Rows of the right operand
        rhs_rows: usize,
        /// Columns of the right operand
        rhs_cols: usize,
    },
}
