//! Matrix products and small matrix diagnostics.

use faer::linalg::matmul::matmul as faer_matmul;
use faer::{Accum, Mat, Par};

use crate::error::{LinalgError, Result};

/// Compute `C = A * B` with faer's GEMM.
///
/// # Errors
/// Returns [`LinalgError::DimensionMismatch`] if `a.ncols() != b.nrows()`.
pub fn matmul(a: &Mat<f64>, b: &Mat<f64>) -> Result<Mat<f64>> {
    if a.ncols() != b.nrows() {
        return Err(LinalgError::DimensionMismatch {
            op: "matmul",
            lhs_rows: a.nrows(),
            lhs_cols: a.ncols(),
            rhs_rows: b.nrows(),
            rhs_cols: b.ncols(),
        });
    }

    let mut c = Mat::<f64>::zeros(a.nrows(), b.ncols());
    if a.ncols() == 0 {
        return Ok(c);
    }
    faer_matmul(
        c.as_mut(),
        Accum::Replace,
        a.as_ref(),
        b.as_ref(),
        1.0,
        Par::Seq,
    );
    Ok(c)
}

/// Largest absolute entry of `a` (0 for an empty matrix).
pub fn max_abs(a: &Mat<f64>) -> f64 {
    let mut max = 0.0_f64;
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            max = max.max(a[(i, j)].abs());
        }
    }
    max
}

/// `max |QᵀQ - I|` for the columns of `q`.
pub fn orthonormality_error(q: &Mat<f64>) -> f64 {
    let n = q.ncols();
    let mut err = 0.0_f64;
    for a in 0..n {
        for b in a..n {
            let dot: f64 = (0..q.nrows()).map(|i| q[(i, a)] * q[(i, b)]).sum();
            let target = if a == b { 1.0 } else { 0.0 };
            err = err.max((dot - target).abs());
        }
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_small() {
        // [[1, 2], [3, 4]] * [[5], [6]] = [[17], [39]]
        let a = Mat::from_fn(2, 2, |i, j| (2 * i + j + 1) as f64);
        let b = Mat::from_fn(2, 1, |i, _| (i + 5) as f64);
        let c = matmul(&a, &b).unwrap();

        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 1);
        assert!((c[(0, 0)] - 17.0).abs() < 1e-12);
        assert!((c[(1, 0)] - 39.0).abs() < 1e-12);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = Mat::<f64>::zeros(2, 3);
        let b = Mat::<f64>::zeros(2, 3);
        let err = matmul(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            LinalgError::DimensionMismatch {
                op: "matmul",
                lhs_cols: 3,
                rhs_rows: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_matmul_empty_inner_dimension() {
        let a = Mat::<f64>::zeros(3, 0);
        let b = Mat::<f64>::zeros(0, 2);
        let c = matmul(&a, &b).unwrap();
        assert_eq!((c.nrows(), c.ncols()), (3, 2));
        assert_eq!(max_abs(&c), 0.0);
    }

    #[test]
    fn test_orthonormality_error_identity() {
        let eye = Mat::<f64>::identity(4, 4);
        assert!(orthonormality_error(&eye) < 1e-15);

        let scaled = Mat::from_fn(2, 2, |i, j| if i == j { 2.0 } else { 0.0 });
        assert!((orthonormality_error(&scaled) - 3.0).abs() < 1e-12);
    }
}
