//! Sparse row-selector matrices.
//!
//! A [`RowSelector`] is a 0/1 matrix with exactly one unit entry per row.
//! Identity matrices and the "pick these entries" constraint matrices of the
//! structured priors are selectors, and so is any Kronecker product of
//! selectors. Multiplying a selector into a dense matrix is a row gather, so
//! the Kronecker-structured constraint blocks never need to be densified.

use faer::Mat;

use crate::error::{LinalgError, Result};

/// A matrix with exactly one unit entry per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelector {
    /// Column of the unit entry of each row
    cols: Vec<usize>,
    ncols: usize,
}

impl RowSelector {
    /// Create a selector from the column picked by each row.
    ///
    /// # Errors
    /// Returns `LinalgError::DimensionMismatch` if a column is out of range.
    pub fn new(cols: Vec<usize>, ncols: usize) -> Result<Self> {
        if let Some(&bad) = cols.iter().find(|&&c| c >= ncols) {
            return Err(LinalgError::DimensionMismatch {
                op: "RowSelector::new",
                lhs_rows: cols.len(),
                lhs_cols: bad + 1,
                rhs_rows: cols.len(),
                rhs_cols: ncols,
            });
        }
        Ok(Self { cols, ncols })
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        Self {
            cols: (0..n).collect(),
            ncols: n,
        }
    }

    /// Selector of the strictly-lower entries of a column-major `n × n` matrix.
    ///
    /// One row per entry `(a, b)` with `a > b`, ordered column by column; the
    /// selected position is `a + n * b`. The result has `n(n-1)/2` rows and
    /// `n²` columns.
    pub fn strict_lower(n: usize) -> Self {
        let mut cols = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for b in 0..n {
            for a in (b + 1)..n {
                cols.push(a + n * b);
            }
        }
        Self { cols, ncols: n * n }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.cols.len()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Column picked by each row.
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Kronecker product `self ⊗ rhs`, again a selector.
    ///
    /// Row `i * p + k` picks column `self.cols[i] * q + rhs.cols[k]`, where
    /// `(p, q)` is the shape of `rhs`.
    pub fn kron(&self, rhs: &RowSelector) -> RowSelector {
        let q = rhs.ncols;
        let mut cols = Vec::with_capacity(self.nrows() * rhs.nrows());
        for &c in &self.cols {
            for &d in &rhs.cols {
                cols.push(c * q + d);
            }
        }
        RowSelector {
            cols,
            ncols: self.ncols * q,
        }
    }

    /// Kronecker product of a sequence of selectors, left to right.
    ///
    /// An empty sequence yields the `1 × 1` identity.
    pub fn kron_all<'a, I>(factors: I) -> RowSelector
    where
        I: IntoIterator<Item = &'a RowSelector>,
    {
        factors
            .into_iter()
            .fold(RowSelector::identity(1), |acc, f| acc.kron(f))
    }

    /// Compute `self * v` by gathering rows of `v`.
    ///
    /// # Errors
    /// Returns `LinalgError::DimensionMismatch` if `v.nrows() != self.ncols()`.
    pub fn apply(&self, v: &Mat<f64>) -> Result<Mat<f64>> {
        if v.nrows() != self.ncols {
            return Err(LinalgError::DimensionMismatch {
                op: "RowSelector::apply",
                lhs_rows: self.nrows(),
                lhs_cols: self.ncols,
                rhs_rows: v.nrows(),
                rhs_cols: v.ncols(),
            });
        }
        Ok(Mat::from_fn(self.nrows(), v.ncols(), |i, j| {
            v[(self.cols[i], j)]
        }))
    }

    /// Dense representation.
    pub fn to_dense(&self) -> Mat<f64> {
        let mut out = Mat::<f64>::zeros(self.nrows(), self.ncols);
        for (row, &col) in self.cols.iter().enumerate() {
            out[(row, col)] = 1.0;
        }
        out
    }
}
