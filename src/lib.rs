//! distopt — distributed constrained-optimization driver with zero-copy
//! vector bindings.
//!
//! Purpose
//! -------
//! Drive an iterative, gradient-based constrained optimization over a
//! design-variable vector partitioned across parallel ranks. A user-supplied
//! problem evaluator and an MMA-style convex-subproblem solver plug into the
//! driver behind narrow traits; the driver owns the flat numeric buffers and
//! binds them, without copying, into distributed vector objects for the
//! solver and the norm-based diagnostics.
//!
//! Key behaviors
//! -------------
//! - `distvec`: rank groups ([`Communicator`], [`LocalComm`],
//!   [`ThreadComm`]) and distributed vectors with owned or borrowed local
//!   storage ([`DistVector`]).
//! - `problem`: the evaluator seam ([`Problem`]) filling driver buffers in
//!   place.
//! - `solver`: the subproblem-solver seam ([`SubproblemSolver`]) updating
//!   the design through a zero-copy binding.
//! - `driver`: the [`Optimizer`] loop — trust-region move limits, KKT
//!   residual tracking, constraint-violation diagnostics, and a fixed-width
//!   iteration log written by the coordinating rank.
//!
//! Invariants & assumptions
//! ------------------------
//! - SPMD lock-step: every rank executes the same sequence of collective
//!   operations in the same order.
//! - Rank-local variable counts sum to the global count; every vector
//!   creation validates this collectively.
//! - Bindings are scoped borrows of the driver's buffers: a binding can
//!   never outlive its backing storage, and writes on either side are
//!   immediately visible on the other.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use distopt::{DriverOptions, Optimizer};
//! # use distopt::{Problem, SubproblemSolver};
//! # fn run<P: Problem, S: SubproblemSolver>(problem: P) -> Result<(), distopt::DriverError> {
//! let mut optimizer: Optimizer<P, S> =
//!     Optimizer::new(problem, std::path::Path::new("opt.log"), DriverOptions::default())?;
//! let design = optimizer.optimize(100)?;
//! println!("|design| = {}", design.len());
//! # Ok(())
//! # }
//! ```
//!
//! Testing notes
//! -------------
//! - Each module carries colocated unit tests; end-to-end runs over real
//!   rank groups live in the `tests/` integration suite.

pub mod distvec;
pub mod driver;
pub mod problem;
pub mod solver;

pub use crate::distvec::{Communicator, DistVector, LocalComm, ThreadComm, VecError, VecResult};
pub use crate::driver::{
    DriverError, DriverOptions, DriverResult, IterationRecord, Optimizer, Stage,
};
pub use crate::problem::{EvalError, EvalResult, Problem};
pub use crate::solver::{SolverError, SolverResult, SubproblemSolver};
