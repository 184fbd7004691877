//! Kronecker products with an identity factor.
//!
//! Index convention: for `A` of shape `(m, n)` and `B` of shape `(p, q)`,
//! `(A ⊗ B)[(i*p + k, j*q + l)] = A[(i, j)] * B[(k, l)]`. Applied to
//! column-major vectorized tensors, the right factor acts on the faster
//! (earlier) modes.

use faer::Mat;

/// `I_n ⊗ A`: block diagonal with `n` copies of `A`.
///
/// Avoids forming the identity; only the diagonal blocks are written.
pub fn kron_identity_left(n: usize, a: &Mat<f64>) -> Mat<f64> {
    let (m, k) = (a.nrows(), a.ncols());
    let mut out = Mat::<f64>::zeros(n * m, n * k);
    for block in 0..n {
        for j in 0..k {
            for i in 0..m {
                out[(block * m + i, block * k + j)] = a[(i, j)];
            }
        }
    }
    out
}

/// Dense Kronecker product `A ⊗ B`, the reference the structured products
/// are checked against.
#[cfg(test)]
pub(crate) fn kron(a: &Mat<f64>, b: &Mat<f64>) -> Mat<f64> {
    let (p, q) = (b.nrows(), b.ncols());
    if p == 0 || q == 0 {
        return Mat::<f64>::zeros(a.nrows() * p, a.ncols() * q);
    }
    Mat::from_fn(a.nrows() * p, a.ncols() * q, |r, c| {
        a[(r / p, c / q)] * b[(r % p, c % q)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> Mat<f64> {
        Mat::<f64>::identity(n, n)
    }

    fn assert_mat_eq(a: &Mat<f64>, b: &Mat<f64>) {
        assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()));
        for j in 0..a.ncols() {
            for i in 0..a.nrows() {
                assert!(
                    (a[(i, j)] - b[(i, j)]).abs() < 1e-14,
                    "mismatch at ({i}, {j}): {} vs {}",
                    a[(i, j)],
                    b[(i, j)]
                );
            }
        }
    }

    #[test]
    fn test_kron_2x2() {
        // [[1, 2], [3, 4]] ⊗ [[0, 1], [1, 0]]
        let a = Mat::from_fn(2, 2, |i, j| (2 * i + j + 1) as f64);
        let b = Mat::from_fn(2, 2, |i, j| if i != j { 1.0 } else { 0.0 });
        let k = kron(&a, &b);

        assert_eq!((k.nrows(), k.ncols()), (4, 4));
        assert_eq!(k[(0, 1)], 1.0);
        assert_eq!(k[(0, 3)], 2.0);
        assert_eq!(k[(3, 3)], 0.0);
        assert_eq!(k[(3, 0)], 3.0);
        assert_eq!(k[(3, 2)], 4.0);
        assert_eq!(k[(2, 1)], 3.0);
    }

    #[test]
    fn test_kron_rectangular_shape() {
        let a = Mat::<f64>::zeros(2, 3);
        let b = Mat::<f64>::zeros(4, 5);
        let k = kron(&a, &b);
        assert_eq!((k.nrows(), k.ncols()), (8, 15));
    }

    #[test]
    fn test_identity_shortcuts_match_kron() {
        let a = Mat::from_fn(3, 2, |i, j| (i as f64) - 2.0 * (j as f64) + 0.5);

        assert_mat_eq(&kron_identity_left(3, &a), &kron(&identity(3), &a));
        assert_mat_eq(&kron_identity_left(1, &a), &a);
    }

    #[test]
    fn test_kron_with_identity_one_is_noop() {
        let a = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        assert_mat_eq(&kron(&identity(1), &a), &a);
        assert_mat_eq(&kron(&a, &identity(1)), &a);
    }
}
