//! Error types for the subproblem-solver seam.
//!
//! The solver is an external collaborator; its failures are reduced to a
//! small taxonomy the driver can tag with the failing stage:
//!
//! - [`SolverError::Numerical`] — the update or residual computation broke
//!   down numerically (singular subproblem, non-finite intermediate).
//! - [`SolverError::DimensionMismatch`] — the inputs do not match the
//!   dimensions the solver was initialized with.

/// Result alias for subproblem-solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The solver failed numerically.
    Numerical {
        what: &'static str,
        reason: String,
    },

    /// Input dimensions do not match the solver's state.
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::Numerical { what, reason } => {
                write!(f, "Subproblem solver failed in {what}: {reason}")
            }
            SolverError::DimensionMismatch { expected, actual } => {
                write!(f, "Solver dimension mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for SolverError {}
