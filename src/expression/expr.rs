use std::f64::consts::{
    E,
    PI
};
use std::fmt;
use std::ops;

use crate::integrand::integrand::IntegrandError;

// ─────────────────────────────────────────────────────────────────────────────
// Function
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Sqrt,
    Abs
}

impl Function {
    /// `ln` is accepted as an alias of `log` (natural logarithm).
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "asin" => Some(Function::Asin),
            "acos" => Some(Function::Acos),
            "atan" => Some(Function::Atan),
            "sinh" => Some(Function::Sinh),
            "cosh" => Some(Function::Cosh),
            "tanh" => Some(Function::Tanh),
            "exp" => Some(Function::Exp),
            "log" | "ln" => Some(Function::Log),
            "sqrt" => Some(Function::Sqrt),
            "abs" => Some(Function::Abs),
            _ => None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs"
        }
    }

    /// Applies the function to `arg`; `x` is the sample point, used only
    /// to locate a failure.
    pub fn apply(&self, x: f64, arg: f64) -> Result<f64, IntegrandError> {
        match self {
            Function::Sin => Ok(arg.sin()),
            Function::Cos => Ok(arg.cos()),
            Function::Tan => Ok(arg.tan()),
            Function::Asin | Function::Acos if !(-1.0..=1.0).contains(&arg) => Err(
                IntegrandError::domain(x, format!("{} of {} is undefined", self.name(), arg)),
            ),
            Function::Asin => Ok(arg.asin()),
            Function::Acos => Ok(arg.acos()),
            Function::Atan => Ok(arg.atan()),
            Function::Sinh => Ok(arg.sinh()),
            Function::Cosh => Ok(arg.cosh()),
            Function::Tanh => Ok(arg.tanh()),
            Function::Exp => Ok(arg.exp()),
            Function::Log if arg <= 0.0 => Err(IntegrandError::domain(
                x,
                format!("log of non-positive value {}", arg),
            )),
            Function::Log => Ok(arg.ln()),
            Function::Sqrt if arg < 0.0 => Err(IntegrandError::domain(
                x,
                format!("sqrt of negative value {}", arg),
            )),
            Function::Sqrt => Ok(arg.sqrt()),
            Function::Abs => Ok(arg.abs())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expr
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax tree of a real expression in the single variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Function, Box<Expr>)
}

impl Expr {
    pub fn pi() -> Expr {
        Expr::Const(PI)
    }

    pub fn e() -> Expr {
        Expr::Const(E)
    }

    pub fn call(function: Function, arg: Expr) -> Expr {
        Expr::Call(function, Box::new(arg))
    }

    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::Pow(Box::new(self), Box::new(exponent))
    }

    /// True when the tree does not mention `x`.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Const(_) => true,
            Expr::Var => false,
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.is_constant(),
            Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) | Expr::Pow(l, r) => {
                l.is_constant() && r.is_constant()
            }
        }
    }

    /// Value of an `x`-free tree, `None` if it depends on `x` or fails.
    pub fn constant_value(&self) -> Option<f64> {
        if !self.is_constant() {
            return None;
        }
        self.eval(0.0).ok().filter(|v| v.is_finite())
    }

    pub fn eval(&self, x: f64) -> Result<f64, IntegrandError> {
        match self {
            Expr::Const(value) => Ok(*value),
            Expr::Var => Ok(x),
            Expr::Neg(inner) => Ok(-inner.eval(x)?),
            Expr::Add(l, r) => Ok(l.eval(x)? + r.eval(x)?),
            Expr::Sub(l, r) => Ok(l.eval(x)? - r.eval(x)?),
            Expr::Mul(l, r) => Ok(l.eval(x)? * r.eval(x)?),
            Expr::Div(l, r) => {
                let numerator = l.eval(x)?;
                let denominator = r.eval(x)?;
                if denominator == 0.0 {
                    return Err(IntegrandError::domain(x, "division by zero"));
                }
                Ok(numerator / denominator)
            }
            Expr::Pow(l, r) => {
                let base = l.eval(x)?;
                let exponent = r.eval(x)?;
                if base == 0.0 && exponent < 0.0 {
                    return Err(IntegrandError::domain(x, "division by zero"));
                }
                if base < 0.0 && exponent.fract() != 0.0 {
                    return Err(IntegrandError::domain(
                        x,
                        format!("{} raised to non-integer power {}", base, exponent),
                    ));
                }
                Ok(base.powf(exponent))
            }
            Expr::Call(function, arg) => function.apply(x, arg.eval(x)?)
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Neg(_) => 3,
            Expr::Const(value) if *value < 0.0 => 3,
            Expr::Pow(_, _) => 4,
            Expr::Const(_) | Expr::Var | Expr::Call(_, _) => 5
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{}", value),
            Expr::Var => write!(f, "x"),
            Expr::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_child(f, 4)
            }
            Expr::Add(l, r) => {
                l.fmt_child(f, 1)?;
                write!(f, " + ")?;
                r.fmt_child(f, 2)
            }
            Expr::Sub(l, r) => {
                l.fmt_child(f, 1)?;
                write!(f, " - ")?;
                r.fmt_child(f, 2)
            }
            Expr::Mul(l, r) => {
                l.fmt_child(f, 2)?;
                write!(f, "*")?;
                r.fmt_child(f, 3)
            }
            Expr::Div(l, r) => {
                l.fmt_child(f, 2)?;
                write!(f, "/")?;
                r.fmt_child(f, 4)
            }
            Expr::Pow(l, r) => {
                l.fmt_child(f, 5)?;
                write!(f, "**")?;
                r.fmt_child(f, 3)
            }
            Expr::Call(function, arg) => write!(f, "{}({})", function.name(), arg)
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_polynomial() {
        let expr = Expr::Var.pow(Expr::Const(2.0)) + Expr::Const(1.0);
        assert_eq!(expr.eval(3.0).unwrap(), 10.0);
    }

    #[test]
    fn division_by_zero_is_a_domain_error() {
        let expr = Expr::Const(1.0) / Expr::Var;
        assert!(matches!(expr.eval(0.0), Err(IntegrandError::DomainError { .. })));
    }

    #[test]
    fn log_of_negative_is_a_domain_error() {
        let expr = Expr::call(Function::Log, Expr::Var);
        assert!(expr.eval(-1.0).is_err());
        assert_eq!(expr.eval(1.0).unwrap(), 0.0);
    }

    #[test]
    fn negative_base_with_integer_power() {
        let expr = Expr::Var.pow(Expr::Const(3.0));
        assert_eq!(expr.eval(-2.0).unwrap(), -8.0);
        let expr = Expr::Var.pow(Expr::Const(0.5));
        assert!(expr.eval(-2.0).is_err());
    }

    #[test]
    fn display_keeps_grouping() {
        let expr = -(Expr::Var.pow(Expr::Const(2.0)));
        assert_eq!(expr.to_string(), "-x**2");
        let expr = (Expr::Var + Expr::Const(1.0)) * Expr::Var;
        assert_eq!(expr.to_string(), "(x + 1)*x");
        let expr = Expr::Var - (Expr::Var - Expr::Const(1.0));
        assert_eq!(expr.to_string(), "x - (x - 1)");
    }

    #[test]
    fn constant_detection() {
        assert_eq!((Expr::pi() * Expr::Const(2.0)).constant_value(), Some(2.0 * PI));
        assert_eq!((Expr::Var + Expr::Const(1.0)).constant_value(), None);
    }
}
