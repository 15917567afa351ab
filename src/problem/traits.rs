//! Problem-evaluator interface consumed by the optimization driver.
//!
//! A [`Problem`] describes the rank-partitioned design space and fills the
//! driver's buffers in place: initial design and bounds, objective and
//! constraint values, and first derivatives. All fill operations receive
//! `ndarray` views over the driver's aliased buffers, so evaluators write
//! their results with no intermediate copies.
//!
//! Convention: constraints are feasible when `cons[i] <= 0`; a positive
//! value measures the violation magnitude.
use std::sync::Arc;

use ndarray::{ArrayView1, ArrayViewMut1, ArrayViewMut2};

use crate::distvec::Communicator;
use crate::problem::errors::EvalResult;

/// User-implemented optimization problem over a rank-partitioned design.
///
/// The size accessors are queried once at driver construction and must stay
/// constant for the lifetime of the problem. `num_vars_local()` values must
/// sum to `num_vars()` over the ranks of `comm()`; the driver verifies this
/// collectively when it creates vectors.
///
/// Required:
/// - `comm() -> Arc<dyn Communicator>`: the rank group this problem is
///   partitioned over.
/// - `num_vars()`, `num_vars_local()`, `num_cons()`: dimensions.
/// - `initial_vars_and_bounds(x, lb, ub)`: fill the initial design and the
///   permanent variable bounds, all of length `num_vars_local()`.
/// - `eval_obj_con(x, cons) -> objective`: evaluate the scalar objective
///   and fill the constraint buffer (length `num_cons()`). The constraint
///   values must be **replicated**: every rank fills the same values, using
///   collective reductions over `comm()` where constraints aggregate
///   rank-local state.
/// - `eval_obj_con_grad(x, g, gcon)`: fill the objective gradient (length
///   `num_vars_local()`) and the constraint Jacobian block (`num_cons() ×
///   num_vars_local()`, row `i` holding constraint `i`'s gradient w.r.t.
///   the local variables).
pub trait Problem {
    fn comm(&self) -> Arc<dyn Communicator>;

    fn num_vars(&self) -> usize;

    fn num_vars_local(&self) -> usize;

    fn num_cons(&self) -> usize;

    fn initial_vars_and_bounds(
        &self, x: ArrayViewMut1<'_, f64>, lb: ArrayViewMut1<'_, f64>, ub: ArrayViewMut1<'_, f64>,
    ) -> EvalResult<()>;

    fn eval_obj_con(&self, x: ArrayView1<'_, f64>, cons: ArrayViewMut1<'_, f64>)
        -> EvalResult<f64>;

    fn eval_obj_con_grad(
        &self, x: ArrayView1<'_, f64>, g: ArrayViewMut1<'_, f64>, gcon: ArrayViewMut2<'_, f64>,
    ) -> EvalResult<()>;
}
