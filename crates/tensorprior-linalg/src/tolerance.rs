//! Process-wide default tolerances.
//!
//! Tolerances are stored as the bit pattern of an `f64` inside an
//! [`AtomicU64`], so a `static` can hold one and be updated without locking.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::error::LinalgError;

/// A tolerance that is negative, NaN or infinite.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("Invalid tolerance: {0}. Tolerances must be finite and non-negative.")]
pub struct InvalidToleranceError(pub f64);

impl From<InvalidToleranceError> for LinalgError {
    fn from(err: InvalidToleranceError) -> Self {
        LinalgError::InvalidRtol(err.0)
    }
}

/// Check that `value` is usable as a tolerance.
pub fn validate_tolerance(value: f64) -> Result<f64, InvalidToleranceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InvalidToleranceError(value))
    }
}

/// A global default tolerance with atomic access.
///
/// ```
/// use tensorprior_linalg::GlobalTolerance;
///
/// static CUTOFF: GlobalTolerance = GlobalTolerance::new(1e-10);
///
/// assert_eq!(CUTOFF.get(), 1e-10);
/// CUTOFF.set(1e-8).unwrap();
/// assert_eq!(CUTOFF.get(), 1e-8);
/// assert!(CUTOFF.set(-1.0).is_err());
/// ```
pub struct GlobalTolerance {
    bits: AtomicU64,
}

impl GlobalTolerance {
    /// Create a tolerance holding `initial`.
    #[must_use]
    pub const fn new(initial: f64) -> Self {
        Self {
            bits: AtomicU64::new(initial.to_bits()),
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Replace the current value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToleranceError`] if `value` is not finite or is negative;
    /// the stored value is left unchanged.
    pub fn set(&self, value: f64) -> Result<(), InvalidToleranceError> {
        let value = validate_tolerance(value)?;
        self.bits.store(value.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Resolve a per-call override against this default.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToleranceError`] if the override is invalid.
    pub fn resolve(&self, explicit: Option<f64>) -> Result<f64, InvalidToleranceError> {
        match explicit {
            Some(value) => validate_tolerance(value),
            None => Ok(self.get()),
        }
    }
}
