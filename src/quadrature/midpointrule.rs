use log::debug;
use nalgebra::DVector;
use serde::Serialize;

use crate::integrand::integrand::{
    Integrand,
    IntegrandError
};

// ─────────────────────────────────────────────────────────────────────────────
// Midpoint rule
// ─────────────────────────────────────────────────────────────────────────────
//
//   dx     = (b - a) / n                 (signed: negative when b < a)
//   x_i    = a + (i + 0.5) * dx          i = 0 .. n-1
//   M_n(f) = Σ f(x_i) * dx
//
// The sum is a plain running sum in index-ascending order, with dx applied
// to every term rather than factored out. Every entry point below follows
// that order so their results agree bit for bit.

/// Signed subinterval width for `n` subdivisions of `[a, b]`.
pub fn step_width(a: f64, b: f64, n: i64) -> f64 {
    (b - a) / n as f64
}

/// Midpoints of the `n` equal subintervals of `[a, b]`, in ascending index order.
///
/// Empty for `n <= 0`.
pub fn midpoints(a: f64, b: f64, n: i64) -> DVector<f64> {
    if n <= 0 {
        return DVector::zeros(0);
    }
    let dx = step_width(a, b, n);
    DVector::from_fn(n as usize, |i, _| a + (i as f64 + 0.5) * dx)
}

/// Midpoint-rule approximation of the integral of `f` from `a` to `b`.
///
/// Calls `f` once per midpoint. Returns `0.0` without calling `f` when
/// `n <= 0`. Reversed bounds give the negated integral. The first error
/// raised by `f` is returned as is.
///
/// An empty interval (`a == b`) with `n > 0` still samples `f` at `a`,
/// `n` times; the sum is `0.0` only if `f` succeeds there, so an
/// integrand that fails at `a` fails the call.
pub fn evaluate<I>(f: &I, a: f64, b: f64, n: i64) -> Result<f64, IntegrandError>
where
    I: Integrand + ?Sized,
{
    if n <= 0 {
        return Ok(0.0);
    }

    let dx = step_width(a, b, n);
    debug!("midpoint rule on [{}, {}] with n = {}, dx = {}", a, b, n, dx);

    let mut integral_sum = 0.0;
    for i in 0..n {
        let x_mid = a + (i as f64 + 0.5) * dx;
        integral_sum += f.value(x_mid)? * dx;
    }
    Ok(integral_sum)
}

/// Same as [`evaluate`] but with a single vectorized call to `f` over all
/// midpoints.
pub fn evaluate_vectorized<I>(f: &I, a: f64, b: f64, n: i64) -> Result<f64, IntegrandError>
where
    I: Integrand + ?Sized,
{
    if n <= 0 {
        return Ok(0.0);
    }

    let dx = step_width(a, b, n);
    debug!("vectorized midpoint rule on [{}, {}] with n = {}, dx = {}", a, b, n, dx);

    let xs = midpoints(a, b, n);
    let ys = f.values(&xs)?;
    if ys.len() != xs.len() {
        return Err(IntegrandError::LengthMismatch {
            expected: xs.len(),
            found: ys.len(),
        });
    }

    let mut integral_sum = 0.0;
    for &y in ys.iter() {
        integral_sum += y * dx;
    }
    Ok(integral_sum)
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-subinterval detail
// ─────────────────────────────────────────────────────────────────────────────

/// One rectangle of the midpoint sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidpointStep {
    index: usize,
    left: f64,
    right: f64,
    midpoint: f64,
    value: f64,
    area: f64,
    running_total: f64,
}

impl MidpointStep {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn midpoint(&self) -> f64 {
        self.midpoint
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Signed rectangle area `f(midpoint) * dx`.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Sum of the areas of this step and all steps before it.
    pub fn running_total(&self) -> f64 {
        self.running_total
    }
}

/// Rectangle-by-rectangle breakdown of [`evaluate`].
///
/// The last step's running total equals `evaluate(f, a, b, n)`. Empty for
/// `n <= 0`.
pub fn steps<I>(f: &I, a: f64, b: f64, n: i64) -> Result<Vec<MidpointStep>, IntegrandError>
where
    I: Integrand + ?Sized,
{
    if n <= 0 {
        return Ok(Vec::new());
    }

    let dx = step_width(a, b, n);
    let mut result = Vec::with_capacity(n as usize);
    let mut running_total = 0.0;
    for i in 0..n {
        let left = a + i as f64 * dx;
        let midpoint = a + (i as f64 + 0.5) * dx;
        let value = f.value(midpoint)?;
        let area = value * dx;
        running_total += area;
        result.push(MidpointStep {
            index: i as usize,
            left,
            right: left + dx,
            midpoint,
            value,
            area,
            running_total,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoints_of_unit_interval() {
        let xs = midpoints(0.0, 1.0, 4);
        assert_eq!(xs.as_slice(), &[0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn midpoints_empty_for_non_positive_n() {
        assert_eq!(midpoints(0.0, 1.0, 0).len(), 0);
        assert_eq!(midpoints(0.0, 1.0, -3).len(), 0);
    }

    #[test]
    fn midpoints_descend_for_reversed_bounds() {
        let xs = midpoints(1.0, 0.0, 2);
        assert_eq!(xs.as_slice(), &[0.75, 0.25]);
    }

    #[test]
    fn square_on_four_subintervals() {
        let result = evaluate(&|x: f64| x * x, 0.0, 1.0, 4).unwrap();
        assert!((result - 0.328125).abs() < 1e-15);
    }

    #[test]
    fn steps_running_total_matches_evaluate() {
        let f = |x: f64| x.sin() + 2.0;
        let detail = steps(&f, -1.0, 2.0, 7).unwrap();
        assert_eq!(detail.len(), 7);
        assert_eq!(detail[0].left(), -1.0);
        assert!((detail[6].right() - 2.0).abs() < 1e-12);
        let total = evaluate(&f, -1.0, 2.0, 7).unwrap();
        assert_eq!(detail[6].running_total(), total);
    }

    #[test]
    fn vectorized_matches_scalar_bitwise() {
        let f = |x: f64| (x * 0.3).exp() - x;
        let scalar = evaluate(&f, 0.2, 3.7, 333).unwrap();
        let vectorized = evaluate_vectorized(&f, 0.2, 3.7, 333).unwrap();
        assert_eq!(scalar.to_bits(), vectorized.to_bits());
    }
}
