use nalgebra::DVector;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// IntegrandError
// ─────────────────────────────────────────────────────────────────────────────

/// Failure raised by an integrand at a sample point.
///
/// The evaluator never recovers from these: the first failing point
/// invalidates the whole sum and the error is handed back unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrandError {
    #[error("domain error at x = {x}: {reason}")]
    DomainError { x: f64, reason: String },

    #[error("non-finite value {value} at x = {x}")]
    NonFinite { x: f64, value: f64 },

    #[error("vectorized integrand returned {found} values for {expected} points")]
    LengthMismatch { expected: usize, found: usize },
}

impl IntegrandError {
    pub fn domain(x: f64, reason: impl Into<String>) -> IntegrandError {
        IntegrandError::DomainError { x, reason: reason.into() }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Integrand
// ─────────────────────────────────────────────────────────────────────────────

/// A real function of one real variable.
///
/// `value` is the scalar call. `values` is the vectorized call over an
/// ordered sequence of points and must return one value per point, in order.
/// Implementations carry no hidden state: the same `x` always gives the same
/// result.
pub trait Integrand {
    fn value(&self, x: f64) -> Result<f64, IntegrandError>;

    fn values(&self, xs: &DVector<f64>) -> Result<DVector<f64>, IntegrandError> {
        let mut ys = DVector::zeros(xs.len());
        for (i, &x) in xs.iter().enumerate() {
            ys[i] = self.value(x)?;
        }
        Ok(ys)
    }
}

impl<F> Integrand for F
where
    F: Fn(f64) -> f64,
{
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        Ok(self(x))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapters
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps a closure that may fail at some points.
pub struct Fallible<F> {
    function: F,
}

impl<F> Fallible<F>
where
    F: Fn(f64) -> Result<f64, IntegrandError>,
{
    pub fn new(function: F) -> Fallible<F> {
        Fallible { function }
    }
}

impl<F> Integrand for Fallible<F>
where
    F: Fn(f64) -> Result<f64, IntegrandError>,
{
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        (self.function)(x)
    }
}

/// Wraps a closure that evaluates a whole vector of points in one call.
///
/// Scalar calls go through a one-element vector so both paths share the
/// same arithmetic.
pub struct Vectorized<F> {
    function: F,
}

impl<F> Vectorized<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    pub fn new(function: F) -> Vectorized<F> {
        Vectorized { function }
    }
}

impl<F> Integrand for Vectorized<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        let ys = self.values(&DVector::from_element(1, x))?;
        Ok(ys[0])
    }

    fn values(&self, xs: &DVector<f64>) -> Result<DVector<f64>, IntegrandError> {
        let ys = (self.function)(xs);
        if ys.len() != xs.len() {
            return Err(IntegrandError::LengthMismatch {
                expected: xs.len(),
                found: ys.len(),
            });
        }
        Ok(ys)
    }
}
