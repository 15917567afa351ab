//! solver — the convex-subproblem seam.
//!
//! The driver consumes the subproblem solver exclusively through the
//! [`SubproblemSolver`] trait: per-run initialization seeded with the
//! current design, an in-place design update per outer iteration, and the
//! KKT residual used as the convergence indicator. The solver's internal
//! numerics are out of scope here; failures surface as [`SolverError`].

pub mod errors;
pub mod traits;

pub use self::errors::{SolverError, SolverResult};
pub use self::traits::SubproblemSolver;
