//! Triangular-family sampler.
//!
//! A tensor is *triangular* when `w[…, j_d, j_{d+1}, …] = 0` whenever some
//! consecutive pair of indices strictly decreases, i.e. it is supported on
//! non-decreasing multi-indices only. The constraint matrix stacks `D - 1`
//! Kronecker blocks, block `k` acting on modes `(k, k+1)`:
//!
//! ```text
//! A_k = I_{J^(D-k-2)} ⊗ S ⊗ I_{J^k}
//! ```
//!
//! where `S` selects the strictly-lower entries of a `J × J` matrix (later
//! modes are the slower digits of a column-major vectorization, hence the
//! identity for the leading modes sits on the right).
//!
//! The nullspace basis of the stacked `A` is built recursively: start from
//! `null(S)` expanded over the remaining modes, then intersect with one block
//! at a time through `V ← V · null(A_k V)`. `A` is never formed; each `A_k V`
//! is a row gather. The cost still grows combinatorially with `D`, which is
//! why orders above 5 are rejected. At order 5 the intermediate `V` has
//! `J^3 · J(J+1)/2` columns, and building the basis takes about 7 s for
//! `J = 5` and about 140 s for `J = 6` in a release build.

use faer::Mat;
use rand::Rng;
use tensorprior_linalg::tolerance::GlobalTolerance;
use tensorprior_linalg::{
    kron_identity_left, matmul, nullspace_with, LinalgError, NullspaceOptions, RowSelector,
};
use tracing::debug;

use crate::error::{PriorError, Result};
use crate::family::ConstraintFamily;
use crate::sampler::sample_from_basis;
use crate::tensor::Tensor;

/// Options for building the triangular basis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriangularOptions {
    /// Rank cutoff for every nullspace computation.
    pub nullspace: NullspaceOptions,
    /// Basis entries with magnitude below this are set to zero.
    /// If `None`, uses the global default cleanup tolerance.
    pub cleanup_tol: Option<f64>,
}

impl TriangularOptions {
    /// Options with an explicit cleanup tolerance.
    pub fn with_cleanup_tol(cleanup_tol: f64) -> Self {
        Self {
            cleanup_tol: Some(cleanup_tol),
            ..Self::default()
        }
    }
}

// Default value: 1e-10
static DEFAULT_CLEANUP_TOL: GlobalTolerance = GlobalTolerance::new(1e-10);

/// Get the global default cleanup tolerance for triangular bases.
pub fn default_cleanup_tol() -> f64 {
    DEFAULT_CLEANUP_TOL.get()
}

/// Set the global default cleanup tolerance for triangular bases.
///
/// # Errors
/// Returns `PriorError::Linalg` if the tolerance is not finite or is negative.
pub fn set_default_cleanup_tol(tol: f64) -> Result<()> {
    DEFAULT_CLEANUP_TOL.set(tol).map_err(LinalgError::from)?;
    Ok(())
}

/// Number of non-decreasing multi-indices, `C(J + D - 1, D)`.
///
/// This is the width of the triangular basis. The blocks of `A` overlap for
/// `D > 2`, so it exceeds `J^D - (D-1) J^(D-2) J(J-1)/2` in general.
pub fn expected_rank(order: usize, dim: usize) -> usize {
    if dim == 0 {
        return usize::from(order == 0);
    }
    binomial(dim + order - 1, order)
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// The `D - 1` constraint blocks `A_k` as row selectors.
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,5]`, `J ∈ [2,6]`.
pub fn constraint_blocks(order: usize, dim: usize) -> Result<Vec<RowSelector>> {
    ConstraintFamily::Triangular.validate(order, dim)?;
    let s = RowSelector::strict_lower(dim);
    Ok((0..order - 1)
        .map(|k| {
            let left = RowSelector::identity(dim.pow((order - k - 2) as u32));
            let right = RowSelector::identity(dim.pow(k as u32));
            RowSelector::kron_all([&left, &s, &right])
        })
        .collect())
}

/// Dense stacked constraint matrix `A` (for verification on small shapes).
///
/// # Errors
/// Returns `PriorError::InvalidShape` outside `D ∈ [2,5]`, `J ∈ [2,6]`.
pub fn constraint_matrix(order: usize, dim: usize) -> Result<Mat<f64>> {
    let blocks = constraint_blocks(order, dim)?;
    let nrows: usize = blocks.iter().map(RowSelector::nrows).sum();
    let ncols = dim.pow(order as u32);

    let mut a = Mat::<f64>::zeros(nrows, ncols);
    let mut row = 0;
    for block in &blocks {
        for &col in block.cols() {
            a[(row, col)] = 1.0;
            row += 1;
        }
    }
    Ok(a)
}

/// Triangular basis with default options. See [`triangular_basis_with`].
pub fn triangular_basis(order: usize, dim: usize) -> Result<Mat<f64>> {
    triangular_basis_with(order, dim, &TriangularOptions::default())
}

/// Orthonormal basis `V` (`J^D × C(J+D-1, D)`) of the triangular tensors.
///
/// # Errors
/// - `PriorError::InvalidShape` if `(order, dim)` is outside `D ∈ [2,5]`, `J ∈ [2,6]`
/// - `PriorError::NumericalInstability` if the final width differs from
///   [`expected_rank`]
/// - `PriorError::Linalg` for invalid tolerances or SVD failure
pub fn triangular_basis_with(
    order: usize,
    dim: usize,
    options: &TriangularOptions,
) -> Result<Mat<f64>> {
    let family = ConstraintFamily::Triangular;
    family.validate(order, dim)?;
    let cleanup_tol = DEFAULT_CLEANUP_TOL
        .resolve(options.cleanup_tol)
        .map_err(LinalgError::from)?;

    let blocks = constraint_blocks(order, dim)?;

    let s = RowSelector::strict_lower(dim).to_dense();
    let v0 = nullspace_with(&s, options.nullspace)?;
    let mut v = if order > 2 {
        kron_identity_left(dim.pow((order - 2) as u32), &v0)
    } else {
        v0
    };
    debug!(order, dim, width = v.ncols(), "expanded first triangular block");

    for (k, block) in blocks.iter().enumerate().skip(1) {
        let av = block.apply(&v)?;
        let n = nullspace_with(&av, options.nullspace)?;
        v = matmul(&v, &n)?;
        debug!(block = k, rows = av.nrows(), width = v.ncols(), "intersected triangular block");
    }

    let zeroed = zero_small_entries(&mut v, cleanup_tol);
    debug!(zeroed, cleanup_tol, "cleaned triangular basis");

    let expected = expected_rank(order, dim);
    if v.ncols() != expected {
        return Err(PriorError::NumericalInstability {
            family,
            expected,
            actual: v.ncols(),
        });
    }
    Ok(v)
}

fn zero_small_entries(v: &mut Mat<f64>, tol: f64) -> usize {
    let mut zeroed = 0;
    for j in 0..v.ncols() {
        for i in 0..v.nrows() {
            let x = v[(i, j)];
            if x != 0.0 && x.abs() < tol {
                v[(i, j)] = 0.0;
                zeroed += 1;
            }
        }
    }
    zeroed
}

/// Sample a triangular tensor with default options.
pub fn sample_triangular<R: Rng + ?Sized>(order: usize, dim: usize, rng: &mut R) -> Result<Tensor> {
    sample_triangular_with(order, dim, &TriangularOptions::default(), rng)
}

/// Sample `reshape(V x, (J,…,J))` with `x ~ N(0, I)` and `V` the triangular basis.
pub fn sample_triangular_with<R: Rng + ?Sized>(
    order: usize,
    dim: usize,
    options: &TriangularOptions,
    rng: &mut R,
) -> Result<Tensor> {
    let v = triangular_basis_with(order, dim, options)?;
    sample_from_basis(&v, &vec![dim; order], rng)
}
