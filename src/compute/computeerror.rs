use thiserror::Error;

use crate::expression::expressionerror::ExpressionError;
use crate::integrand::integrand::IntegrandError;

/// Failures of a compute request. Both are recoverable by the caller:
/// fix the expression or the bounds and submit again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("invalid expression '{source_text}': {error}")]
    InvalidExpression {
        source_text: String,
        #[source]
        error: ExpressionError,
    },

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] IntegrandError),
}
