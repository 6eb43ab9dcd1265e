use log::debug;
use thiserror::Error;

use crate::expression::expr::{
    Expr,
    Function
};
use crate::expression::expression::Expression;
use crate::integrand::integrand::IntegrandError;

// ─────────────────────────────────────────────────────────────────────────────
// Closed-form reference value
// ─────────────────────────────────────────────────────────────────────────────
//
// A small table of antiderivative rules, enough to check the midpoint rule
// against the usual classroom integrands:
//
//   polynomials in x                 Σ c_k x^(k+1) / (k+1)
//   c, c*u, u*c, u/c, -u, u ± v      linearity
//   (p x + q)^k, k != -1             (p x + q)^(k+1) / ((k+1) p)
//   1/(p x + q), (p x + q)^-1        ln|p x + q| / p
//   c^(p x + q), c > 0, c != 1       c^(p x + q) / (p ln c)
//   sin, cos, exp, sinh, cosh of (p x + q)
//
// Whatever falls outside the table is reported as unsupported; callers treat
// every error here as "no reference value".

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("no closed form for '{0}'")]
    Unsupported(String),

    #[error("integrand is singular at x = {0} inside the interval")]
    Singular(f64),

    #[error("antiderivative could not be evaluated: {0}")]
    Evaluation(#[from] IntegrandError),
}

/// An antiderivative `F` together with the points where the integrand it
/// came from blows up.
#[derive(Debug, Clone, PartialEq)]
pub struct Antiderivative {
    primitive: Expr,
    singularities: Vec<f64>
}

impl Antiderivative {
    pub fn primitive(&self) -> &Expr {
        &self.primitive
    }

    pub fn singularities(&self) -> &[f64] {
        &self.singularities
    }

    /// `F(b) - F(a)`, refused when a singularity lies in the closed interval.
    pub fn definite(&self, a: f64, b: f64) -> Result<f64, ReferenceError> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if let Some(&x) = self.singularities.iter().find(|&&x| lo <= x && x <= hi) {
            return Err(ReferenceError::Singular(x));
        }
        let value = self.primitive.eval(b)? - self.primitive.eval(a)?;
        if !value.is_finite() {
            return Err(ReferenceError::Evaluation(IntegrandError::NonFinite { x: b, value }));
        }
        Ok(value)
    }
}

/// Exact value of the integral of `expression` from `a` to `b`, when the
/// rule table covers it.
pub fn exact_integral(expression: &Expression, a: f64, b: f64) -> Result<f64, ReferenceError> {
    if a == b {
        return Ok(0.0);
    }
    let antiderivative = antiderivative(expression.root())?;
    debug!("antiderivative of {} is {}", expression, antiderivative.primitive());
    antiderivative.definite(a, b)
}

pub fn antiderivative(expr: &Expr) -> Result<Antiderivative, ReferenceError> {
    let mut singularities = Vec::new();
    let primitive = integrate(expr, &mut singularities)?;
    Ok(Antiderivative { primitive, singularities })
}

fn unsupported(expr: &Expr) -> ReferenceError {
    ReferenceError::Unsupported(expr.to_string())
}

fn integrate(expr: &Expr, singularities: &mut Vec<f64>) -> Result<Expr, ReferenceError> {
    if let Some(coefs) = polynomial(expr) {
        return Ok(integrate_polynomial(&coefs));
    }

    match expr {
        Expr::Neg(u) => Ok(-integrate(u, singularities)?),
        Expr::Add(u, v) => Ok(integrate(u, singularities)? + integrate(v, singularities)?),
        Expr::Sub(u, v) => Ok(integrate(u, singularities)? - integrate(v, singularities)?),
        Expr::Mul(c, u) if c.is_constant() => Ok((**c).clone() * integrate(u, singularities)?),
        Expr::Mul(u, c) if c.is_constant() => Ok(integrate(u, singularities)? * (**c).clone()),
        Expr::Div(u, c) if c.is_constant() => Ok(integrate(u, singularities)? / (**c).clone()),
        Expr::Div(c, v) if c.is_constant() => {
            let (p, q) = linear(v).filter(|(p, _)| *p != 0.0).ok_or_else(|| unsupported(expr))?;
            singularities.push(root(p, q));
            Ok((**c).clone() * log_abs(v) / Expr::Const(p))
        }
        Expr::Pow(u, k) if k.is_constant() => {
            let k = k.constant_value().ok_or_else(|| unsupported(expr))?;
            let (p, q) = linear(u).filter(|(p, _)| *p != 0.0).ok_or_else(|| unsupported(expr))?;
            if k < 0.0 {
                singularities.push(root(p, q));
            }
            if k == -1.0 {
                Ok(log_abs(u) / Expr::Const(p))
            } else {
                Ok((**u).clone().pow(Expr::Const(k + 1.0)) / Expr::Const((k + 1.0) * p))
            }
        }
        Expr::Pow(c, u) if c.is_constant() => {
            let base = c.constant_value().filter(|&v| v > 0.0 && v != 1.0).ok_or_else(|| unsupported(expr))?;
            let (p, _) = linear(u).filter(|(p, _)| *p != 0.0).ok_or_else(|| unsupported(expr))?;
            Ok(expr.clone() / Expr::Const(p * base.ln()))
        }
        Expr::Call(function, u) => {
            let (p, _) = linear(u).filter(|(p, _)| *p != 0.0).ok_or_else(|| unsupported(expr))?;
            let inner = (**u).clone();
            let primitive = match function {
                Function::Sin => -Expr::call(Function::Cos, inner),
                Function::Cos => Expr::call(Function::Sin, inner),
                Function::Exp => Expr::call(Function::Exp, inner),
                Function::Sinh => Expr::call(Function::Cosh, inner),
                Function::Cosh => Expr::call(Function::Sinh, inner),
                _ => return Err(unsupported(expr))
            };
            Ok(primitive / Expr::Const(p))
        }
        _ => Err(unsupported(expr))
    }
}

/// Zero of `p*x + q`, with `-0.0` folded into `0.0`.
fn root(p: f64, q: f64) -> f64 {
    let x = -q / p;
    if x == 0.0 { 0.0 } else { x }
}

fn log_abs(u: &Expr) -> Expr {
    Expr::call(Function::Log, Expr::call(Function::Abs, u.clone()))
}

/// `(p, q)` such that `expr == p*x + q`, when `expr` is affine in `x`.
pub fn linear(expr: &Expr) -> Option<(f64, f64)> {
    if let Some(c) = expr.constant_value() {
        return Some((0.0, c));
    }
    match expr {
        Expr::Var => Some((1.0, 0.0)),
        Expr::Neg(u) => linear(u).map(|(p, q)| (-p, -q)),
        Expr::Add(u, v) => {
            let (p1, q1) = linear(u)?;
            let (p2, q2) = linear(v)?;
            Some((p1 + p2, q1 + q2))
        }
        Expr::Sub(u, v) => {
            let (p1, q1) = linear(u)?;
            let (p2, q2) = linear(v)?;
            Some((p1 - p2, q1 - q2))
        }
        Expr::Mul(u, v) => {
            if let Some(c) = u.constant_value() {
                linear(v).map(|(p, q)| (c * p, c * q))
            } else if let Some(c) = v.constant_value() {
                linear(u).map(|(p, q)| (c * p, c * q))
            } else {
                None
            }
        }
        Expr::Div(u, v) => {
            let c = v.constant_value().filter(|&c| c != 0.0)?;
            linear(u).map(|(p, q)| (p / c, q / c))
        }
        _ => None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polynomials
// ─────────────────────────────────────────────────────────────────────────────

const MAX_EXPANDED_DEGREE: usize = 32;

/// Coefficients `[c_0, c_1, ...]` of `expr` when it is a polynomial in `x`
/// built from `+ - *`, division by constants and non-negative integer powers.
pub fn polynomial(expr: &Expr) -> Option<Vec<f64>> {
    if let Some(c) = expr.constant_value() {
        return Some(vec![c]);
    }
    match expr {
        Expr::Var => Some(vec![0.0, 1.0]),
        Expr::Neg(u) => polynomial(u).map(|c| c.iter().map(|v| -v).collect()),
        Expr::Add(u, v) => Some(poly_add(&polynomial(u)?, &polynomial(v)?, 1.0)),
        Expr::Sub(u, v) => Some(poly_add(&polynomial(u)?, &polynomial(v)?, -1.0)),
        Expr::Mul(u, v) => poly_mul(&polynomial(u)?, &polynomial(v)?),
        Expr::Div(u, v) => {
            let c = v.constant_value().filter(|&c| c != 0.0)?;
            polynomial(u).map(|coefs| coefs.iter().map(|v| v / c).collect())
        }
        Expr::Pow(u, k) => {
            let k = k.constant_value()?;
            if k < 0.0 || k.fract() != 0.0 || k > MAX_EXPANDED_DEGREE as f64 {
                return None;
            }
            let base = polynomial(u)?;
            let mut result = vec![1.0];
            for _ in 0..(k as usize) {
                result = poly_mul(&result, &base)?;
            }
            Some(result)
        }
        _ => None
    }
}

fn poly_add(lhs: &[f64], rhs: &[f64], sign: f64) -> Vec<f64> {
    let n = lhs.len().max(rhs.len());
    (0..n)
        .map(|i| lhs.get(i).copied().unwrap_or(0.0) + sign * rhs.get(i).copied().unwrap_or(0.0))
        .collect()
}

fn poly_mul(lhs: &[f64], rhs: &[f64]) -> Option<Vec<f64>> {
    let degree = (lhs.len() - 1) + (rhs.len() - 1);
    if degree > MAX_EXPANDED_DEGREE {
        return None;
    }
    let mut result = vec![0.0; degree + 1];
    for (i, &l) in lhs.iter().enumerate() {
        for (j, &r) in rhs.iter().enumerate() {
            result[i + j] += l * r;
        }
    }
    Some(result)
}

fn integrate_polynomial(coefs: &[f64]) -> Expr {
    let mut primitive = Expr::Const(0.0);
    for (k, &c) in coefs.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let power = (k + 1) as f64;
        let term = Expr::Const(c / power) * Expr::Var.pow(Expr::Const(power));
        primitive = primitive + term;
    }
    primitive
}
