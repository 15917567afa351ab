//! Error types for the optimization driver.
//!
//! Every failure that aborts an `optimize` call or driver construction is
//! collected here and tagged with the [`Stage`] at which it occurred:
//!
//! - **Allocation**: distributed vector creation or binding failed
//!   (partition mismatch, collective failure) — wraps [`VecError`].
//! - **Evaluation**: the problem evaluator failed — wraps [`EvalError`].
//! - **Solver**: the subproblem solver failed — wraps [`SolverError`].
//! - **Collective**: a norm or reduction failed outside creation.
//! - **Log**: the iteration log could not be opened or written.
//! - **Options**: driver configuration was rejected.
//!
//! There are no internal retries: all of these are systems or numerical
//! failures where retrying with unchanged inputs is not meaningful, so they
//! propagate immediately. Partial mutation of the shared design buffer made
//! before a mid-loop failure remains visible to the caller.
use crate::distvec::VecError;
use crate::problem::EvalError;
use crate::solver::SolverError;

/// Result alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// The point in the driver's control flow at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Querying the initial design and bounds from the evaluator.
    InitialDesign,
    /// Objective and constraint evaluation.
    ObjConEval,
    /// Gradient and Jacobian evaluation.
    GradEval,
    /// Per-run solver initialization.
    SolverInit,
    /// The solver's design update step.
    SolverUpdate,
    /// The solver's KKT residual computation.
    KktResidual,
    /// Norm reductions for the diagnostic record.
    DesignNorm,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::InitialDesign => "initial design query",
            Stage::ObjConEval => "objective/constraint evaluation",
            Stage::GradEval => "gradient evaluation",
            Stage::SolverInit => "solver initialization",
            Stage::SolverUpdate => "solver update",
            Stage::KktResidual => "KKT residual",
            Stage::DesignNorm => "design norm",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    // ---- Linear algebra ----
    /// Distributed vector creation or binding failed.
    Allocation {
        source: VecError,
    },

    /// A collective reduction failed outside vector creation.
    Collective {
        stage: Stage,
        source: VecError,
    },

    // ---- Evaluator ----
    /// The problem evaluator failed.
    Evaluation {
        stage: Stage,
        source: EvalError,
    },

    // ---- Subproblem solver ----
    /// The subproblem solver failed.
    Solver {
        stage: Stage,
        source: SolverError,
    },

    // ---- Configuration ----
    /// The move-limit fraction was rejected.
    InvalidMoveLimit {
        fraction: f64,
        reason: &'static str,
    },

    // ---- Log output ----
    /// The iteration log could not be opened or written.
    Log {
        context: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::Allocation { source } => {
                write!(f, "Vector allocation failed: {source}")
            }
            DriverError::Collective { stage, source } => {
                write!(f, "Collective failure during {stage}: {source}")
            }
            DriverError::Evaluation { stage, source } => {
                write!(f, "Evaluator failure during {stage}: {source}")
            }
            DriverError::Solver { stage, source } => {
                write!(f, "Solver failure during {stage}: {source}")
            }
            DriverError::InvalidMoveLimit { fraction, reason } => {
                write!(f, "Invalid move-limit fraction {fraction}: {reason}")
            }
            DriverError::Log { context, reason } => {
                write!(f, "Log output failed while trying to {context}: {reason}")
            }
        }
    }
}

impl std::error::Error for DriverError {}

impl From<VecError> for DriverError {
    /// Vector creation and binding errors carry no extra stage information;
    /// reductions that fail later are tagged explicitly at the call site.
    fn from(source: VecError) -> Self {
        DriverError::Allocation { source }
    }
}
