use std::cell::Cell;

use nalgebra::DVector;
use midpointrule::integrand::integrand::{
    Integrand,
    IntegrandError
};

/// Wraps a closure and counts how many times it is called.
pub struct Counting<F> {
    function: F,
    calls: Cell<usize>,
}

impl<F: Fn(f64) -> f64> Counting<F> {
    pub fn new(function: F) -> Self {
        Counting { function, calls: Cell::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<F: Fn(f64) -> f64> Integrand for Counting<F> {
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        self.calls.set(self.calls.get() + 1);
        Ok((self.function)(x))
    }
}

/// Fails at the first sample point greater than `limit`.
pub struct FailsAbove {
    pub limit: f64,
}

impl Integrand for FailsAbove {
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        if x > self.limit {
            Err(IntegrandError::domain(x, "above limit"))
        } else {
            Ok(x)
        }
    }
}

/// Batch call that answers with one value too few.
pub struct ShortBatch;

impl Integrand for ShortBatch {
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        Ok(x)
    }

    fn values(&self, xs: &DVector<f64>) -> Result<DVector<f64>, IntegrandError> {
        Ok(DVector::zeros(xs.len().saturating_sub(1)))
    }
}
