//! Permutation-invariant sampler, fully symmetric case.
//!
//! Averaging an unconstrained Gaussian tensor over a permutation group yields
//! a tensor invariant under every element of the group. For full symmetry the
//! group is all `D!` axis permutations; for `D = 2` this is `(X + Xᵀ)/2`.

use faer::Mat;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use rand::Rng;
use tracing::trace;

use crate::error::{PriorError, Result};
use crate::family::{ConstraintFamily, Symmetry};
use crate::permutation::permutations;
use crate::tensor::Tensor;

const FAMILY: ConstraintFamily = ConstraintFamily::PermutationInvariant(Symmetry::Symmetric);

/// Average `t` over all permutations of its axes.
///
/// Works for any order, at a cost of `D! · J^D`; every mode must have the same
/// extent for the result to be well defined.
///
/// # Errors
/// Returns `PriorError::ShapeMismatch` if the tensor is not cubical.
pub fn symmetrize(t: &Tensor) -> Result<Tensor> {
    if !t.is_cubical() {
        return Err(PriorError::ShapeMismatch {
            message: format!("cannot symmetrize a tensor with dims {:?}", t.dims()),
        });
    }
    let perms = permutations(t.order());
    let weight = 1.0 / perms.len() as f64;

    let x = t.as_array();
    let mut acc = ArrayD::<f64>::zeros(IxDyn(t.dims()).f());
    for perm in perms {
        acc += &x.view().permuted_axes(perm);
    }
    acc *= weight;
    Ok(Tensor::from_array(acc))
}

/// Dense averaging projector `(1/D!) Σ_σ P_σ` of shape `J^D × J^D`.
///
/// The projector is symmetric, so column `j` is the symmetrization of the
/// `j`-th unit tensor. Its columns span the symmetric tensors (a spanning
/// set, not a basis).
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ {2,3}`, `J ∈ [5,10]`.
pub fn symmetrizer(order: usize, dim: usize) -> Result<Mat<f64>> {
    FAMILY.validate(order, dim)?;
    let dims = vec![dim; order];
    let n = dim.pow(order as u32);

    let mut p = Mat::<f64>::zeros(n, n);
    for col in 0..n {
        let mut unit = vec![0.0; n];
        unit[col] = 1.0;
        let column = symmetrize(&Tensor::from_vec_with_dims(unit, &dims)?)?;
        for (row, &x) in column.as_slice().iter().enumerate() {
            p[(row, col)] = x;
        }
    }
    Ok(p)
}

/// Sample a symmetric tensor: the permutation average of a standard normal one.
///
/// The order is capped at 3; the average over `D!` permutations gets
/// expensive quickly and larger orders are not offered.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ {2,3}`, `J ∈ [5,10]`.
pub fn sample_symmetric<R: Rng + ?Sized>(order: usize, dim: usize, rng: &mut R) -> Result<Tensor> {
    FAMILY.validate(order, dim)?;
    let x = Tensor::random(rng, &vec![dim; order]);
    trace!(order, dim, "symmetrizing gaussian tensor");
    symmetrize(&x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_symmetrize_matrix_is_half_sum_with_transpose() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let x = Tensor::random(&mut rng, &[4, 4]);
        let s = symmetrize(&x).unwrap();
        let xt = x.permute_axes(&[1, 0]).unwrap();

        for i in 0..4 {
            for j in 0..4 {
                let expected = 0.5 * (x.get(&[i, j]).unwrap() + xt.get(&[i, j]).unwrap());
                assert!((s.get(&[i, j]).unwrap() - expected).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_symmetrize_is_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let x = Tensor::random(&mut rng, &[3, 3, 3]);
        let once = symmetrize(&x).unwrap();
        let twice = symmetrize(&once).unwrap();
        assert!(once.max_abs_diff(&twice).unwrap() < 1e-14);
    }

    #[test]
    fn test_symmetrize_order_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let s = symmetrize(&Tensor::random(&mut rng, &[2, 2, 2, 2])).unwrap();
        for perm in permutations(4) {
            let p = s.permute_axes(&perm).unwrap();
            assert!(p.max_abs_diff(&s).unwrap() < 1e-14);
        }
    }

    #[test]
    fn test_symmetrizer_is_projector() {
        let p = symmetrizer(2, 5).unwrap();
        let p2 = tensorprior_linalg::matmul(&p, &p).unwrap();
        for j in 0..25 {
            for i in 0..25 {
                assert!((p[(i, j)] - p2[(i, j)]).abs() < 1e-14);
            }
        }
        // Diagonal entry for index (0, 0) is 1, for (1, 0) it is 1/2
        assert!((p[(0, 0)] - 1.0).abs() < 1e-15);
        assert!((p[(1, 1)] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_symmetrize_rejects_rectangular() {
        assert!(symmetrize(&Tensor::zeros(&[2, 3])).is_err());
    }

    #[test]
    fn test_order_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(sample_symmetric(4, 5, &mut rng).is_err());
        assert!(sample_symmetric(3, 5, &mut rng).is_ok());
    }
}
