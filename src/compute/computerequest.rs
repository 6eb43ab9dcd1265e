use log::{
    debug,
    warn
};
use serde::{
    Deserialize,
    Serialize
};

use crate::compute::computeerror::ComputeError;
use crate::compute::computereport::ComputeReport;
use crate::expression::expression::Expression;
use crate::quadrature::convergence::{
    sample_convergence,
    ConvergenceLadder
};
use crate::quadrature::midpointrule::evaluate;
use crate::reference::exactintegral::exact_integral;

/// Everything needed for one computation: the integrand text, the bounds
/// and the subdivision count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeRequest {
    expression: String,
    a: f64,
    b: f64,
    n: i64
}

impl Default for ComputeRequest {
    fn default() -> Self {
        ComputeRequest {
            expression: "x**2 + 1".to_owned(),
            a: 0.0,
            b: 1.0,
            n: 100
        }
    }
}

impl ComputeRequest {
    pub fn new(expression: &str, a: f64, b: f64, n: i64) -> ComputeRequest {
        ComputeRequest { expression: expression.to_owned(), a, b, n }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn n(&self) -> i64 {
        self.n
    }

    pub fn parse_expression(&self) -> Result<Expression, ComputeError> {
        Expression::parse(&self.expression).map_err(|error| ComputeError::InvalidExpression {
            source_text: self.expression.clone(),
            error,
        })
    }

    /// Parses the expression, runs the midpoint rule at `n`, samples the
    /// ladder up to `n` and tries to attach an exact reference value.
    ///
    /// A missing reference value never fails the request.
    pub fn compute(&self, ladder: &ConvergenceLadder) -> Result<ComputeReport, ComputeError> {
        let integrand = self.parse_expression()?;
        debug!("computing {} on [{}, {}] with n = {}", integrand, self.a, self.b, self.n);

        let approximation = evaluate(&integrand, self.a, self.b, self.n)?;
        let series = sample_convergence(&integrand, self.a, self.b, self.n, ladder)?;

        let exact = match exact_integral(&integrand, self.a, self.b) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!("no exact reference for {}: {}", integrand, error);
                None
            }
        };

        Ok(ComputeReport::new(self.clone(), approximation, series, exact))
    }
}
