//! Permutation-invariant sampler, Hankel case.
//!
//! A Hankel tensor is constant on multi-indices with the same index sum
//! `j_1 + … + j_D`. The sums range over `0..=D(J-1)`, so the solution space
//! has one free value per sum ("bucket"); a sample draws one normal value per
//! bucket and broadcasts it to every member.

use faer::Mat;
use ndarray::{ArrayD, Dimension, IxDyn, ShapeBuilder};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::trace;

use crate::error::Result;
use crate::family::{ConstraintFamily, Symmetry};
use crate::tensor::Tensor;

const FAMILY: ConstraintFamily = ConstraintFamily::PermutationInvariant(Symmetry::Hankel);

/// Number of index-sum buckets, `D(J-1) + 1`.
pub fn bucket_count(order: usize, dim: usize) -> usize {
    order * dim.saturating_sub(1) + 1
}

/// Bucket (index sum) of every entry, in column-major storage order.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,4]`, `J ∈ [3,10]`.
pub fn hankel_buckets(order: usize, dim: usize) -> Result<Vec<usize>> {
    FAMILY.validate(order, dim)?;
    let sums = ArrayD::from_shape_fn(IxDyn(&vec![dim; order]), |idx| index_sum(&idx));
    // Reversing the axes of a row-major array visits it in column-major order
    Ok(sums.t().iter().copied().collect())
}

fn index_sum(idx: &IxDyn) -> usize {
    idx.slice().iter().sum()
}

/// Incidence matrix `V` of shape `J^D × (D(J-1)+1)`.
///
/// Row `r` has a single one, in the column of its bucket.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,4]`, `J ∈ [3,10]`.
pub fn hankel_basis(order: usize, dim: usize) -> Result<Mat<f64>> {
    let buckets = hankel_buckets(order, dim)?;
    let mut v = Mat::<f64>::zeros(buckets.len(), bucket_count(order, dim));
    for (row, &bucket) in buckets.iter().enumerate() {
        v[(row, bucket)] = 1.0;
    }
    Ok(v)
}

/// Sample a Hankel tensor.
///
/// Entries sharing an index sum are copies of the same draw, hence
/// bit-identical.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,4]`, `J ∈ [3,10]`.
pub fn sample_hankel<R: Rng + ?Sized>(order: usize, dim: usize, rng: &mut R) -> Result<Tensor> {
    FAMILY.validate(order, dim)?;
    let z: Vec<f64> = (0..bucket_count(order, dim))
        .map(|_| StandardNormal.sample(rng))
        .collect();
    trace!(order, dim, buckets = z.len(), "broadcasting hankel draws");

    let w = ArrayD::from_shape_fn(IxDyn(&vec![dim; order]).f(), |idx| z[index_sum(&idx)]);
    Ok(Tensor::from_array(w))
}
