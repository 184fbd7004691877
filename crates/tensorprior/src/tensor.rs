//! Dense column-major tensors.

use std::fmt;

use ndarray::{ArrayD, Axis, Dimension, IxDyn, ShapeBuilder, Zip};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{PriorError, Result};
use crate::permutation::is_permutation;

/// A dense `f64` tensor backed by [`ndarray::ArrayD`].
///
/// The array is always kept in column-major (Fortran) layout, so the flat
/// memory order is exactly the vectorization `vec(W)` the constraint
/// matrices act on.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor(ArrayD<f64>);

impl Tensor {
    /// Wrap an array, copying it into column-major layout if needed.
    pub fn from_array(array: ArrayD<f64>) -> Self {
        if array.t().is_standard_layout() {
            return Self(array);
        }
        let mut fortran = ArrayD::zeros(IxDyn(array.shape()).f());
        fortran.assign(&array);
        Self(fortran)
    }

    /// Create a tensor from column-major data.
    ///
    /// # Errors
    /// Returns `PriorError::ShapeMismatch` if `data.len()` is not the product
    /// of `dims`.
    pub fn from_vec_with_dims(data: Vec<f64>, dims: &[usize]) -> Result<Self> {
        let len = data.len();
        let array = ArrayD::from_shape_vec(IxDyn(dims).f(), data).map_err(|e| {
            PriorError::ShapeMismatch {
                message: format!(
                    "data length {} vs dims {:?} (expected {}): {}",
                    len,
                    dims,
                    dims.iter().product::<usize>(),
                    e
                ),
            }
        })?;
        Ok(Self(array))
    }

    /// Tensor of zeros.
    pub fn zeros(dims: &[usize]) -> Self {
        Self(ArrayD::zeros(IxDyn(dims).f()))
    }

    /// Tensor filled with `value`.
    pub fn filled(dims: &[usize], value: f64) -> Self {
        Self(ArrayD::from_elem(IxDyn(dims).f(), value))
    }

    /// Tensor with independent standard normal entries, drawn in column-major order.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, dims: &[usize]) -> Self {
        Self(ArrayD::from_shape_simple_fn(IxDyn(dims).f(), || {
            StandardNormal.sample(rng)
        }))
    }

    /// Extent of every mode.
    pub fn dims(&self) -> &[usize] {
        self.0.shape()
    }

    /// Number of modes.
    pub fn order(&self) -> usize {
        self.0.ndim()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tensor has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether all modes have the same extent, i.e. the shape is `(J,…,J)`.
    pub fn is_cubical(&self) -> bool {
        self.dims().windows(2).all(|w| w[0] == w[1])
    }

    /// The underlying array.
    pub fn as_array(&self) -> &ArrayD<f64> {
        &self.0
    }

    /// Column-major data.
    pub fn as_slice(&self) -> &[f64] {
        // Every constructor goes through a Fortran-contiguous array
        self.0.as_slice_memory_order().unwrap_or_default()
    }

    /// Entry at a multi-index, or `None` if it is out of bounds.
    pub fn get(&self, idx: &[usize]) -> Option<f64> {
        self.0.get(idx).copied()
    }

    /// Overwrite the entry at a multi-index.
    ///
    /// # Errors
    /// Returns `PriorError::ShapeMismatch` if `idx` is out of bounds.
    pub fn set(&mut self, idx: &[usize], value: f64) -> Result<()> {
        if let Some(entry) = self.0.get_mut(idx) {
            *entry = value;
            return Ok(());
        }
        Err(PriorError::ShapeMismatch {
            message: format!("index {:?} out of bounds for dims {:?}", idx, self.dims()),
        })
    }

    /// Iterate over `(multi-index, value)` pairs.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Vec<usize>, f64)> + '_ {
        self.0
            .indexed_iter()
            .map(|(idx, &x)| (idx.slice().to_vec(), x))
    }

    /// Permute axes so that axis `k` of the result is axis `perm[k]` of `self`.
    ///
    /// # Errors
    /// Returns `PriorError::InvalidPermutation` if `perm` is not a permutation
    /// of `0..order`.
    pub fn permute_axes(&self, perm: &[usize]) -> Result<Tensor> {
        if !is_permutation(perm, self.order()) {
            return Err(PriorError::InvalidPermutation {
                perm: perm.to_vec(),
                order: self.order(),
            });
        }
        let permuted = self.0.view().permuted_axes(perm.to_vec());
        Ok(Self::from_array(permuted.to_owned()))
    }

    /// Sum over the last axis, giving a tensor of order `D - 1`.
    ///
    /// A tensor of order 0 is returned unchanged.
    pub fn sum_last_axis(&self) -> Tensor {
        match self.order() {
            0 => self.clone(),
            order => Self::from_array(self.0.sum_axis(Axis(order - 1))),
        }
    }

    /// `max |self - other|` over all entries.
    ///
    /// # Errors
    /// Returns `PriorError::ShapeMismatch` if the dims differ.
    pub fn max_abs_diff(&self, other: &Tensor) -> Result<f64> {
        if self.dims() != other.dims() {
            return Err(PriorError::ShapeMismatch {
                message: format!("dims {:?} vs {:?}", self.dims(), other.dims()),
            });
        }
        Ok(Zip::from(&self.0)
            .and(&other.0)
            .fold(0.0, |acc: f64, &a, &b| acc.max((a - b).abs())))
    }

    /// `max |w|` over all entries.
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims_str: Vec<String> = self.dims().iter().map(|d| d.to_string()).collect();
        writeln!(f, "{} Tensor", dims_str.join("×"))?;
        writeln!(f, "{:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn arange(dims: &[usize]) -> Tensor {
        let n: usize = dims.iter().product();
        Tensor::from_vec_with_dims((0..n).map(|x| x as f64).collect(), dims).unwrap()
    }

    #[test]
    fn test_from_vec_shape_check() {
        assert!(Tensor::from_vec_with_dims(vec![0.0; 6], &[2, 3]).is_ok());
        let err = Tensor::from_vec_with_dims(vec![0.0; 5], &[2, 3]).unwrap_err();
        assert!(err.to_string().contains("Shape mismatch"));
    }

    #[test]
    fn test_get_set_column_major() {
        let mut t = arange(&[2, 3]);
        assert_eq!(t.get(&[1, 0]), Some(1.0));
        assert_eq!(t.get(&[0, 1]), Some(2.0));
        assert_eq!(t.get(&[1, 2]), Some(5.0));
        assert_eq!(t.get(&[2, 0]), None);
        assert_eq!(t.get(&[0]), None);

        t.set(&[1, 1], -7.0).unwrap();
        assert_eq!(t.as_slice()[3], -7.0);
        assert!(t.set(&[0, 3], 1.0).is_err());
    }

    #[test]
    fn test_from_array_converts_row_major() {
        // Row-major [[0, 1, 2], [3, 4, 5]]
        let c = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let t = Tensor::from_array(c);
        assert_eq!(t.as_slice(), &[0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
        assert_eq!(t.get(&[1, 0]), Some(3.0));
    }

    #[test]
    fn test_permute_axes_transpose() {
        let t = arange(&[2, 3]);
        let tt = t.permute_axes(&[1, 0]).unwrap();
        assert_eq!(tt.dims(), &[3, 2]);
        assert_eq!(tt.as_slice(), &[0.0, 2.0, 4.0, 1.0, 3.0, 5.0]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(tt.get(&[j, i]), t.get(&[i, j]));
            }
        }
    }

    #[test]
    fn test_permute_axes_order3() {
        let t = arange(&[2, 3, 4]);
        let p = t.permute_axes(&[2, 0, 1]).unwrap();
        assert_eq!(p.dims(), &[4, 2, 3]);
        for (idx, x) in t.indexed_iter() {
            let moved = [idx[2], idx[0], idx[1]];
            assert_eq!(p.get(&moved), Some(x));
        }
    }

    #[test]
    fn test_permute_axes_rejects_bad_perm() {
        let t = arange(&[2, 2]);
        assert!(matches!(
            t.permute_axes(&[0, 0]),
            Err(PriorError::InvalidPermutation { order: 2, .. })
        ));
        assert!(t.permute_axes(&[0, 1, 2]).is_err());
    }

    #[test]
    fn test_sum_last_axis() {
        // [[0, 2, 4], [1, 3, 5]] summed over columns
        let t = arange(&[2, 3]);
        let m = t.sum_last_axis();
        assert_eq!(m.dims(), &[2]);
        assert_eq!(m.as_slice(), &[6.0, 9.0]);

        let v = arange(&[4]).sum_last_axis();
        assert_eq!(v.dims(), &[] as &[usize]);
        assert_eq!(v.as_slice(), &[6.0]);

        let cube = arange(&[2, 2, 2]).sum_last_axis();
        assert_eq!(cube.as_slice(), &[4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_random_is_seeded() {
        let mut a = ChaCha8Rng::seed_from_u64(3);
        let mut b = ChaCha8Rng::seed_from_u64(3);
        let x = Tensor::random(&mut a, &[3, 3]);
        let y = Tensor::random(&mut b, &[3, 3]);
        assert_eq!(x, y);
        assert_eq!(x.len(), 9);
        assert!(x.max_abs() > 0.0);
    }

    #[test]
    fn test_is_cubical() {
        assert!(Tensor::zeros(&[3, 3, 3]).is_cubical());
        assert!(!Tensor::zeros(&[3, 2]).is_cubical());
        assert!(Tensor::zeros(&[]).is_cubical());
    }

    #[test]
    fn test_max_abs_diff() {
        let a = Tensor::filled(&[2, 2], 1.0);
        let mut b = a.clone();
        b.set(&[1, 0], 1.5).unwrap();
        assert!((a.max_abs_diff(&b).unwrap() - 0.5).abs() < 1e-15);
        assert!(a.max_abs_diff(&Tensor::zeros(&[4])).is_err());
    }

    #[test]
    fn test_display() {
        let s = arange(&[2, 2, 2]).to_string();
        assert!(s.starts_with("2×2×2 Tensor"));
        assert!(s.contains("7.0000"));

        let m = arange(&[2, 2]).to_string();
        assert!(m.starts_with("2×2 Tensor\n"));
        assert!(m.contains("3.0000"));
    }
}
