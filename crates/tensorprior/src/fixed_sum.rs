//! Fixed-sum-family sampler.
//!
//! Every fiber along the last axis sums to one:
//! `(1_Jᵀ ⊗ I_{J^(D-1)}) vec(W) = 1`. With `M = J^(D-1)`, a nullspace basis
//! of that operator has the block form
//!
//! ```text
//! [  I   I  …   I ]
//! [ -I   0  …   0 ]
//! [  0  -I  …   0 ]
//! [  …            ]
//! [  0   0  …  -I ]      (J blocks of M rows, J-1 blocks of M columns)
//! ```
//!
//! so a sample is `1/J + B vec(x)` for `x ~ N(0, 1)` of shape `M × (J-1)`,
//! computed blockwise without forming `B`.

use faer::Mat;
use ndarray::{s, Array2, Axis, ShapeBuilder};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::trace;

use crate::error::{PriorError, Result};
use crate::family::ConstraintFamily;
use crate::tensor::Tensor;

/// A fixed-sum sample together with its order-`D-1` marginal.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSumSample {
    /// The sampled tensor, shape `(J,…,J)`
    pub tensor: Tensor,
    /// Sum of `tensor` over its last axis, all ones up to rounding
    pub marginal: Tensor,
}

/// The particular solution `W0 = 1/J` everywhere.
pub fn particular_solution(order: usize, dim: usize) -> Tensor {
    Tensor::filled(&vec![dim; order], 1.0 / dim as f64)
}

/// Explicit block basis `B` of shape `J^D × J^(D-1)(J-1)`.
///
/// Column `c * M + m` has `+1` in row `m` and `-1` in row `(c + 1) * M + m`.
/// The columns span the homogeneous solutions but are not orthonormal.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,5]`, `J ∈ [5,10]`.
pub fn fixed_sum_basis(order: usize, dim: usize) -> Result<Mat<f64>> {
    ConstraintFamily::FixedSum.validate(order, dim)?;
    let m = dim.pow((order - 1) as u32);

    let mut b = Mat::<f64>::zeros(m * dim, m * (dim - 1));
    for c in 0..dim - 1 {
        for row in 0..m {
            b[(row, c * m + row)] = 1.0;
            b[((c + 1) * m + row, c * m + row)] = -1.0;
        }
    }
    Ok(b)
}

/// Sample a tensor whose fibers along the last axis sum to one.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,5]`, `J ∈ [5,10]`.
pub fn sample_fixed_sum<R: Rng + ?Sized>(
    order: usize,
    dim: usize,
    rng: &mut R,
) -> Result<FixedSumSample> {
    ConstraintFamily::FixedSum.validate(order, dim)?;
    let m = dim.pow((order - 1) as u32);
    let base = 1.0 / dim as f64;

    // W viewed as an M × J matrix: column c is the slice with last index c
    let draws: Vec<f64> = (0..m * (dim - 1)).map(|_| StandardNormal.sample(rng)).collect();
    let x = Array2::from_shape_vec((m, dim - 1).f(), draws).map_err(|e| {
        PriorError::ShapeMismatch {
            message: e.to_string(),
        }
    })?;

    let mut w = Array2::from_elem((m, dim).f(), base);
    let mut head = w.column_mut(0);
    head += &x.sum_axis(Axis(1));
    let mut tail = w.slice_mut(s![.., 1..]);
    tail -= &x;

    let data: Vec<f64> = w.t().iter().copied().collect();
    let tensor = Tensor::from_vec_with_dims(data, &vec![dim; order])?;
    let marginal = tensor.sum_last_axis();
    trace!(order, dim, "sampled fixed-sum tensor");
    Ok(FixedSumSample { tensor, marginal })
}
