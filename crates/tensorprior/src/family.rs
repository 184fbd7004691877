//! Constraint families and the shapes each one supports.

use std::fmt;

use crate::error::{PriorError, Result};

/// Kind of permutation invariance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Invariant under every permutation of the axes.
    Symmetric,
    /// Constant on multi-indices with equal index sum.
    Hankel,
}

/// The linear structure `A · vec(W) = b` a sampled tensor satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// `w[…, j_d, j_{d+1}, …] = 0` whenever `j_d > j_{d+1}` (`b = 0`).
    Triangular,
    /// Every fiber along the last axis sums to one.
    FixedSum,
    /// Invariance under a group of index permutations (`b = 0`).
    PermutationInvariant(Symmetry),
}

impl ConstraintFamily {
    /// All families, in display order.
    pub const ALL: [ConstraintFamily; 4] = [
        ConstraintFamily::Triangular,
        ConstraintFamily::FixedSum,
        ConstraintFamily::PermutationInvariant(Symmetry::Symmetric),
        ConstraintFamily::PermutationInvariant(Symmetry::Hankel),
    ];

    /// Orders and dimensions this family's sampler accepts.
    pub fn supported_shape(&self) -> SupportedShape {
        match self {
            ConstraintFamily::Triangular => SupportedShape::new(2, 5, 2, 6),
            ConstraintFamily::FixedSum => SupportedShape::new(2, 5, 5, 10),
            ConstraintFamily::PermutationInvariant(Symmetry::Symmetric) => {
                SupportedShape::new(2, 3, 5, 10)
            }
            ConstraintFamily::PermutationInvariant(Symmetry::Hankel) => {
                SupportedShape::new(2, 4, 3, 10)
            }
        }
    }

    /// Check `(order, dim)` against [`supported_shape`](Self::supported_shape).
    ///
    /// # Errors
    /// Returns `PriorError::InvalidShape` when either value is out of range.
    pub fn validate(&self, order: usize, dim: usize) -> Result<()> {
        let supported = self.supported_shape();
        if supported.contains(order, dim) {
            Ok(())
        } else {
            Err(PriorError::InvalidShape {
                family: *self,
                order,
                dim,
                supported,
            })
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintFamily::Triangular => "triangular",
            ConstraintFamily::FixedSum => "fixed-sum",
            ConstraintFamily::PermutationInvariant(Symmetry::Symmetric) => "symmetric",
            ConstraintFamily::PermutationInvariant(Symmetry::Hankel) => "hankel",
        };
        f.write_str(name)
    }
}

/// Inclusive order and dimension ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedShape {
    /// Smallest supported order `D`
    pub min_order: usize,
    /// Largest supported order `D`
    pub max_order: usize,
    /// Smallest supported dimension `J`
    pub min_dim: usize,
    /// Largest supported dimension `J`
    pub max_dim: usize,
}

impl SupportedShape {
    /// Create a shape range; all bounds are inclusive.
    pub const fn new(min_order: usize, max_order: usize, min_dim: usize, max_dim: usize) -> Self {
        Self {
            min_order,
            max_order,
            min_dim,
            max_dim,
        }
    }

    /// Whether `(order, dim)` lies in the range.
    pub fn contains(&self, order: usize, dim: usize) -> bool {
        (self.min_order..=self.max_order).contains(&order)
            && (self.min_dim..=self.max_dim).contains(&dim)
    }
}

impl fmt::Display for SupportedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order {}..={}, dimension {}..={}",
            self.min_order, self.max_order, self.min_dim, self.max_dim
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        let tri = ConstraintFamily::Triangular;
        assert!(tri.validate(2, 2).is_ok());
        assert!(tri.validate(5, 6).is_ok());
        assert!(tri.validate(6, 2).is_err());
        assert!(tri.validate(2, 7).is_err());
        assert!(tri.validate(1, 3).is_err());

        let sym = ConstraintFamily::PermutationInvariant(Symmetry::Symmetric);
        assert!(sym.validate(3, 5).is_ok());
        assert!(sym.validate(4, 5).is_err());
        assert!(sym.validate(2, 4).is_err());
    }

    #[test]
    fn test_invalid_shape_message() {
        let err = ConstraintFamily::FixedSum.validate(2, 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("fixed-sum"));
        assert!(msg.contains("dimension 3"));
        assert!(msg.contains("5..=10"));
    }

    #[test]
    fn test_display_names_are_distinct() {
        let names: Vec<String> = ConstraintFamily::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["triangular", "fixed-sum", "symmetric", "hankel"]);
    }
}
