//! Error types for problem evaluation.
//!
//! Evaluators are external collaborators; their failure modes are reduced
//! to a small taxonomy the driver can tag with the stage that failed:
//!
//! - [`EvalError::Failure`] — the evaluator could not produce the requested
//!   quantity (mesh failure, solver-in-the-loop divergence, bad state).
//! - [`EvalError::NonFinite`] — the evaluator produced a NaN or infinite
//!   value where a finite one is required.

/// Result alias for problem-evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The evaluator failed to produce the requested quantity.
    Failure {
        what: &'static str,
        reason: String,
    },

    /// The evaluator produced a non-finite value.
    NonFinite {
        what: &'static str,
        value: f64,
    },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Failure { what, reason } => {
                write!(f, "Evaluation of {what} failed: {reason}")
            }
            EvalError::NonFinite { what, value } => {
                write!(f, "Evaluation produced a non-finite {what}: {value}")
            }
        }
    }
}

impl std::error::Error for EvalError {}
