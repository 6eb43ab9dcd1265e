use std::fmt;
use std::str::FromStr;

use crate::expression::expr::Expr;
use crate::expression::expressionerror::ExpressionError;
use crate::expression::parser::parse;
use crate::integrand::integrand::{
    Integrand,
    IntegrandError
};

/// A parsed expression in `x`, usable as an integrand.
///
/// Evaluation fails on division by zero, on `log`, `sqrt`, `asin` and `acos`
/// outside their real domain, and whenever the result is not finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr
}

impl Expression {
    pub fn parse(source: &str) -> Result<Expression, ExpressionError> {
        let root = parse(source)?;
        Ok(Expression { source: source.trim().to_owned(), root })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }
}

impl FromStr for Expression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl Integrand for Expression {
    fn value(&self, x: f64) -> Result<f64, IntegrandError> {
        let value = self.root.eval(x)?;
        if !value.is_finite() {
            return Err(IntegrandError::NonFinite { x, value });
        }
        Ok(value)
    }
}
