//! Constraint residuals.
//!
//! [`constraint_residual`] measures how far a tensor is from satisfying a
//! family's constraint, directly from the tensor entries (no constraint
//! matrix is built). A sampler's output should report a residual at rounding
//! level.

use std::collections::HashMap;

use crate::error::{PriorError, Result};
use crate::family::{ConstraintFamily, Symmetry};
use crate::permutation::permutations;
use crate::tensor::Tensor;

/// Maximum absolute violation of `family`'s constraint by `t`.
///
/// - Triangular: largest `|w|` at a multi-index with a strict decrease
///   between consecutive positions
/// - FixedSum: largest `|Σ_last w - 1|`
/// - Symmetric: largest `|w - w∘σ|` over all axis permutations `σ`
/// - Hankel: largest spread within an index-sum bucket
///
/// # Errors
/// Returns `PriorError::ShapeMismatch` if `t` is not cubical or has order 0.
pub fn constraint_residual(family: ConstraintFamily, t: &Tensor) -> Result<f64> {
    if t.order() == 0 || !t.is_cubical() {
        return Err(PriorError::ShapeMismatch {
            message: format!("expected a (J,…,J) tensor, got dims {:?}", t.dims()),
        });
    }

    let residual = match family {
        ConstraintFamily::Triangular => triangular_residual(t),
        ConstraintFamily::FixedSum => fixed_sum_residual(t),
        ConstraintFamily::PermutationInvariant(Symmetry::Symmetric) => symmetric_residual(t)?,
        ConstraintFamily::PermutationInvariant(Symmetry::Hankel) => hankel_residual(t),
    };
    Ok(residual)
}

fn triangular_residual(t: &Tensor) -> f64 {
    t.indexed_iter()
        .filter(|(idx, _)| idx.windows(2).any(|w| w[0] > w[1]))
        .map(|(_, x)| x.abs())
        .fold(0.0, f64::max)
}

fn fixed_sum_residual(t: &Tensor) -> f64 {
    t.sum_last_axis()
        .as_slice()
        .iter()
        .map(|s| (s - 1.0).abs())
        .fold(0.0, f64::max)
}

fn symmetric_residual(t: &Tensor) -> Result<f64> {
    let mut worst = 0.0_f64;
    for perm in permutations(t.order()) {
        worst = worst.max(t.permute_axes(&perm)?.max_abs_diff(t)?);
    }
    Ok(worst)
}

fn hankel_residual(t: &Tensor) -> f64 {
    // (min, max) per index sum
    let mut ranges: HashMap<usize, (f64, f64)> = HashMap::new();
    for (idx, x) in t.indexed_iter() {
        let bucket: usize = idx.iter().sum();
        let range = ranges.entry(bucket).or_insert((x, x));
        range.0 = range.0.min(x);
        range.1 = range.1.max(x);
    }
    ranges
        .values()
        .map(|(lo, hi)| hi - lo)
        .fold(0.0, f64::max)
}
