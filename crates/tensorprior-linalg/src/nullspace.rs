//! Nullspace bases via the singular value decomposition.

use faer::Mat;
use tracing::trace;

use crate::error::{LinalgError, Result};
use crate::tolerance::GlobalTolerance;

/// Options controlling the rank decision of [`nullspace_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NullspaceOptions {
    /// Relative tolerance for the rank cutoff.
    ///
    /// Singular values with `σ_i <= rtol * σ_max` are treated as zero.
    /// If `None`, uses the global default rtol.
    pub rtol: Option<f64>,
}

impl NullspaceOptions {
    /// Create options with the specified rtol.
    pub fn with_rtol(rtol: f64) -> Self {
        Self { rtol: Some(rtol) }
    }
}

// Default value: 1e-12
static DEFAULT_NULLSPACE_RTOL: GlobalTolerance = GlobalTolerance::new(1e-12);

/// Get the global default rtol for nullspace rank decisions.
pub fn default_nullspace_rtol() -> f64 {
    DEFAULT_NULLSPACE_RTOL.get()
}

/// Set the global default rtol for nullspace rank decisions.
///
/// # Errors
/// Returns `LinalgError::InvalidRtol` if rtol is not finite or is negative.
pub fn set_default_nullspace_rtol(rtol: f64) -> Result<()> {
    DEFAULT_NULLSPACE_RTOL.set(rtol)?;
    Ok(())
}

/// Number of singular values above `rtol * σ_max`.
///
/// `singular_values` need not be sorted. An all-zero spectrum has rank 0.
pub fn numerical_rank(singular_values: &[f64], rtol: f64) -> usize {
    let sigma_max = singular_values.iter().copied().fold(0.0_f64, f64::max);
    if sigma_max == 0.0 {
        return 0;
    }
    let cutoff = rtol * sigma_max;
    singular_values.iter().filter(|&&s| s > cutoff).count()
}

/// Orthonormal basis of the nullspace of `a`, using the global default rtol.
///
/// See [`nullspace_with`].
pub fn nullspace(a: &Mat<f64>) -> Result<Mat<f64>> {
    nullspace_with(a, NullspaceOptions::default())
}

/// Orthonormal basis of the nullspace of `a` (shape `m × n`).
///
/// Computes the full SVD `A = U Σ Vᵀ` and returns the trailing `n - r` columns
/// of `V`, where `r` is the numerical rank under the relative tolerance. The
/// result has shape `n × (n - r)`; a matrix without rows yields `I_n`.
///
/// The basis is unique only up to an orthogonal transform of its columns.
///
/// # Errors
/// Returns `LinalgError::InvalidRtol` for an invalid tolerance and
/// `LinalgError::Svd` if the decomposition fails.
pub fn nullspace_with(a: &Mat<f64>, options: NullspaceOptions) -> Result<Mat<f64>> {
    let rtol = DEFAULT_NULLSPACE_RTOL.resolve(options.rtol)?;
    let (m, n) = (a.nrows(), a.ncols());

    if n == 0 {
        return Ok(Mat::<f64>::zeros(0, 0));
    }
    if m == 0 {
        return Ok(Mat::<f64>::identity(n, n));
    }

    let svd = a.svd().map_err(|e| LinalgError::Svd {
        nrows: m,
        ncols: n,
        message: format!("{e:?}"),
    })?;

    let s = svd.S().column_vector();
    let singular_values: Vec<f64> = (0..m.min(n)).map(|i| s[i]).collect();
    let rank = numerical_rank(&singular_values, rtol);
    trace!(m, n, rank, rtol, "nullspace");

    // faer orders singular values non-increasingly, so the null directions
    // are the trailing columns of V.
    let v = svd.V();
    Ok(Mat::from_fn(n, n - rank, |i, j| v[(i, rank + j)]))
}
