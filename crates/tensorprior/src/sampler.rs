//! Family dispatch.
//!
//! Each sampler is a pure function of `(order, dim)` and an injected random
//! number generator. Callers that react to changing inputs (sliders, a CLI
//! loop) simply call [`sample`] again; nothing is cached between calls.

use faer::Mat;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tensorprior_linalg::matmul;
use tracing::debug;

use crate::error::{PriorError, Result};
use crate::family::{ConstraintFamily, Symmetry};
use crate::fixed_sum::{fixed_sum_basis, sample_fixed_sum, FixedSumSample};
use crate::hankel::{hankel_basis, sample_hankel};
use crate::symmetric::{sample_symmetric, symmetrizer};
use crate::tensor::Tensor;
use crate::triangular::{sample_triangular_with, triangular_basis_with, TriangularOptions};

/// Per-family options for [`sample_with`] and [`basis_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplerOptions {
    /// Options for the triangular basis construction.
    pub triangular: TriangularOptions,
}

/// Result of a sampling call.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Family the tensor was drawn from
    pub family: ConstraintFamily,
    /// The sampled tensor, shape `(J,…,J)`
    pub tensor: Tensor,
    /// Order `D-1` marginal (sum over the last axis), fixed-sum family only
    pub marginal: Option<Tensor>,
}

/// Draw one tensor of `family` with default options.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use tensorprior::{sample, ConstraintFamily};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let s = sample(ConstraintFamily::Triangular, 3, 3, &mut rng).unwrap();
/// assert_eq!(s.tensor.dims(), &[3, 3, 3]);
/// // Entry (2, 1, 2) decreases between the first two positions
/// assert!(s.tensor.get(&[2, 1, 2]).unwrap().abs() < 1e-8);
/// ```
///
/// # Errors
/// Returns `PriorError::InvalidShape` for out-of-range `(order, dim)` and
/// propagates numerical failures of the triangular basis.
pub fn sample<R: Rng + ?Sized>(
    family: ConstraintFamily,
    order: usize,
    dim: usize,
    rng: &mut R,
) -> Result<Sample> {
    sample_with(family, order, dim, &SamplerOptions::default(), rng)
}

/// Draw one tensor of `family`.
///
/// # Errors
/// See [`sample`].
pub fn sample_with<R: Rng + ?Sized>(
    family: ConstraintFamily,
    order: usize,
    dim: usize,
    options: &SamplerOptions,
    rng: &mut R,
) -> Result<Sample> {
    family.validate(order, dim)?;
    debug!(%family, order, dim, "sampling");

    let (tensor, marginal) = match family {
        ConstraintFamily::Triangular => (
            sample_triangular_with(order, dim, &options.triangular, rng)?,
            None,
        ),
        ConstraintFamily::FixedSum => {
            let FixedSumSample { tensor, marginal } = sample_fixed_sum(order, dim, rng)?;
            (tensor, Some(marginal))
        }
        ConstraintFamily::PermutationInvariant(Symmetry::Symmetric) => {
            (sample_symmetric(order, dim, rng)?, None)
        }
        ConstraintFamily::PermutationInvariant(Symmetry::Hankel) => {
            (sample_hankel(order, dim, rng)?, None)
        }
    };

    Ok(Sample {
        family,
        tensor,
        marginal,
    })
}

/// Basis matrix `V` of `family` with default options. See [`basis_with`].
pub fn basis(family: ConstraintFamily, order: usize, dim: usize) -> Result<Mat<f64>> {
    basis_with(family, order, dim, &SamplerOptions::default())
}

/// Basis matrix `V` (`J^D × R`) whose column span is the homogeneous
/// solution set of `family`.
///
/// | Family | Columns `R` | Kind |
/// |---|---|---|
/// | Triangular | `C(J+D-1, D)` | orthonormal basis |
/// | FixedSum | `J^(D-1)(J-1)` | block basis, not orthonormal |
/// | Symmetric | `J^D` | averaging projector (spanning set) |
/// | Hankel | `D(J-1)+1` | 0/1 incidence matrix |
///
/// # Errors
/// Returns `PriorError::InvalidShape` for out-of-range `(order, dim)`.
pub fn basis_with(
    family: ConstraintFamily,
    order: usize,
    dim: usize,
    options: &SamplerOptions,
) -> Result<Mat<f64>> {
    match family {
        ConstraintFamily::Triangular => triangular_basis_with(order, dim, &options.triangular),
        ConstraintFamily::FixedSum => fixed_sum_basis(order, dim),
        ConstraintFamily::PermutationInvariant(Symmetry::Symmetric) => symmetrizer(order, dim),
        ConstraintFamily::PermutationInvariant(Symmetry::Hankel) => hankel_basis(order, dim),
    }
}

/// Draw `x ~ N(0, I_R)` and return `V x` reshaped to `dims`.
///
/// # Errors
/// Returns `PriorError::ShapeMismatch` if `v.nrows()` is not the product of `dims`.
pub fn sample_from_basis<R: Rng + ?Sized>(
    v: &Mat<f64>,
    dims: &[usize],
    rng: &mut R,
) -> Result<Tensor> {
    let expected: usize = dims.iter().product();
    if v.nrows() != expected {
        return Err(PriorError::ShapeMismatch {
            message: format!("basis has {} rows, dims {:?} need {}", v.nrows(), dims, expected),
        });
    }

    let x = Mat::from_fn(v.ncols(), 1, |_, _| StandardNormal.sample(rng));
    let w = matmul(v, &x)?;
    let data: Vec<f64> = (0..w.nrows()).map(|i| w[(i, 0)]).collect();
    Tensor::from_vec_with_dims(data, dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_marginal_only_for_fixed_sum() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for family in ConstraintFamily::ALL {
            let s = family.supported_shape();
            let sample = sample(family, s.min_order, s.min_dim, &mut rng).unwrap();
            assert_eq!(sample.family, family);
            assert_eq!(sample.marginal.is_some(), family == ConstraintFamily::FixedSum);
        }
    }

    #[test]
    fn test_sample_from_basis_shape_check() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let v = Mat::<f64>::identity(4, 2);
        assert!(sample_from_basis(&v, &[2, 2], &mut rng).is_ok());
        assert!(matches!(
            sample_from_basis(&v, &[3, 2], &mut rng),
            Err(PriorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_sample_from_basis_stays_in_span() {
        // Basis e_0, e_3 of R^4: entries 1 and 2 must be exactly zero
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let v = Mat::from_fn(4, 2, |i, j| if (i, j) == (0, 0) || (i, j) == (3, 1) { 1.0 } else { 0.0 });
        let t = sample_from_basis(&v, &[2, 2], &mut rng).unwrap();
        assert_eq!(t.as_slice()[1], 0.0);
        assert_eq!(t.as_slice()[2], 0.0);
        assert_ne!(t.as_slice()[0], 0.0);
    }
}
