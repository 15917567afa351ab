//! Subproblem-solver interface consumed by the optimization driver.
//!
//! The driver treats the convex-subproblem solver (an MMA-style method of
//! moving asymptotes, or any drop-in with the same contract) as an opaque
//! stateful object: it is constructed fresh for each `optimize` call,
//! seeded with the current design, then repeatedly asked to update the
//! design in place and to report the first-order optimality residual.
//!
//! All vector arguments are [`DistVector`]s bound over the driver's aliased
//! buffers, so the update step mutates the design buffer directly. The
//! Jacobian arrives as one bound vector per constraint row.
use ndarray::ArrayView1;

use crate::distvec::DistVector;
use crate::solver::errors::SolverResult;

/// Stateful convex-subproblem solver driven once per outer iteration.
///
/// Implementations keep whatever internal state they need across `update`
/// calls within one `optimize` run (asymptote history, Lagrange-multiplier
/// estimates); that state is discarded when the driver re-initializes the
/// solver at the start of the next run.
///
/// Required:
/// - `initialize(num_vars, num_cons, design)`: fresh solver state sized for
///   the global problem, seeded with the current design iterate.
/// - `update(x, g, cons, gcon, lb, ub)`: solve the convex subproblem built
///   from the current values and gradients, writing the next iterate into
///   `x` **in place**. `lb`/`ub` are the temporary move-limit bounds for
///   this iteration, already intersected with the permanent bounds.
/// - `kkt_residual(x, g, cons, gcon, lb, ub) -> (l2, linf)`: first-order
///   KKT residual norms at the just-updated iterate, using the same inputs
///   as the update. Collective: every rank receives the same pair.
pub trait SubproblemSolver: Sized {
    fn initialize(num_vars: usize, num_cons: usize, design: &DistVector<'_>) -> SolverResult<Self>;

    fn update(
        &mut self, x: &mut DistVector<'_>, g: &DistVector<'_>, cons: ArrayView1<'_, f64>,
        gcon: &[DistVector<'_>], lb: &DistVector<'_>, ub: &DistVector<'_>,
    ) -> SolverResult<()>;

    fn kkt_residual(
        &self, x: &DistVector<'_>, g: &DistVector<'_>, cons: ArrayView1<'_, f64>,
        gcon: &[DistVector<'_>], lb: &DistVector<'_>, ub: &DistVector<'_>,
    ) -> SolverResult<(f64, f64)>;
}
