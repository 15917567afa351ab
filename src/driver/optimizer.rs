//! driver::optimizer — the outer optimization loop over aliased buffers.
//!
//! Purpose
//! -------
//! Orchestrate one constrained-optimization run per [`Optimizer::optimize`]
//! call: query the problem for the initial design and bounds, then iterate
//! evaluation → move limits → subproblem update → KKT residual →
//! diagnostics → log, with every vector handed to the solver bound
//! zero-copy over the driver-owned buffer set.
//!
//! Key behaviors
//! -------------
//! - Construction queries the problem's dimensions and communicator,
//!   allocates the zero-initialized [`DesignBuffers`], collectively
//!   validates the rank partition, and opens the iteration log on the
//!   coordinating rank.
//! - The initial design and permanent bounds are queried on the **first**
//!   `optimize` call only; later calls continue from the design left in
//!   the aliased buffer (warm start).
//! - Subproblem-solver state is **rebuilt at the start of every call**,
//!   seeded with the current design; asymptote history never leaks across
//!   calls.
//! - Temporary move-limit bounds are owned vectors scoped to one call and
//!   released on every exit path, including failures.
//! - Any failure aborts the call with a stage-tagged [`DriverError`];
//!   design values already written into the aliased buffer stay visible to
//!   the caller (best-effort partial result, no rollback).
//!
//! Invariants & assumptions
//! ------------------------
//! - SPMD lock-step: every rank constructs the driver and calls `optimize`
//!   with the same arguments in the same order, so all ranks execute the
//!   identical sequence of collective operations.
//! - The buffer set is mutated only from this sequential loop body
//!   (single-writer discipline); bindings are scoped borrows, so they are
//!   provably released before the flat buffers are read again.
//! - Iteration `k+1` begins only after iteration `k`'s update has
//!   completed on all ranks; there is no pipelining across iterations.
//!
//! Conventions
//! -----------
//! - `optimize(0)` performs no evaluator or solver work beyond the
//!   first-call initial-design query and returns the current design.
//! - Iteration indices restart at 0 in every call; the log header follows
//!   the indices.
//!
//! Downstream usage
//! ----------------
//! - Construct with a [`Problem`], a log path, and [`DriverOptions`]; call
//!   `optimize(max_iterations)`; read the result through the returned view
//!   or [`Optimizer::optimized_design`]. Callers that need the design
//!   beyond the driver's lifetime must copy it out.
//!
//! Testing notes
//! -------------
//! - Unit tests drive the loop with counting evaluators and deterministic
//!   stub solvers: zero-iteration behavior, warm start across calls,
//!   per-call solver reset, move-limit containment as seen by the solver,
//!   and partial-progress retention on mid-loop failure.
//! - End-to-end behavior on real rank groups lives in the integration
//!   suite.
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use ndarray::ArrayView1;

use crate::distvec::{Communicator, DistVector};
use crate::driver::{
    buffers::DesignBuffers,
    diagnostics::{max_constraint_violation, IterationLog, IterationRecord},
    errors::{DriverError, DriverResult, Stage},
    move_limit,
    options::DriverOptions,
};
use crate::problem::Problem;
use crate::solver::SubproblemSolver;

/// Distributed constrained-optimization driver.
///
/// Owns the problem, the aliased buffer set, and the iteration log; the
/// subproblem solver type `S` is instantiated afresh inside every
/// [`Optimizer::optimize`] call.
#[derive(Debug)]
pub struct Optimizer<P: Problem, S: SubproblemSolver> {
    problem: P,
    comm: Arc<dyn Communicator>,
    num_vars: usize,
    num_cons: usize,
    options: DriverOptions,
    buffers: DesignBuffers,
    log: IterationLog,
    initialized: bool,
    _solver: PhantomData<S>,
}

impl<P: Problem, S: SubproblemSolver> Optimizer<P, S> {
    /// Build a driver for `problem`, logging to `log_path`.
    ///
    /// Queries the problem's communicator and dimensions, allocates the
    /// zero-initialized buffer set, collectively validates that the
    /// rank-local variable counts sum to the global count, and opens the
    /// log file on the coordinating rank (truncating any previous run).
    ///
    /// # Errors
    /// - [`DriverError::InvalidMoveLimit`] for out-of-range options.
    /// - [`DriverError::Allocation`] if the partition is inconsistent.
    /// - [`DriverError::Log`] if the log file cannot be created.
    pub fn new(problem: P, log_path: &Path, options: DriverOptions) -> DriverResult<Self> {
        options.validate()?;
        let comm = problem.comm();
        let num_vars = problem.num_vars();
        let num_vars_local = problem.num_vars_local();
        let num_cons = problem.num_cons();

        let mut buffers = DesignBuffers::new(num_vars_local, num_cons);
        // Collective partition check; the binding itself is dropped here.
        DistVector::bind(Arc::clone(&comm), num_vars, buffers.x.view_mut())?;

        let log = IterationLog::create(log_path, comm.rank() == 0)?;
        info!(
            "optimizer ready: {num_vars} variables ({num_vars_local} on rank {}), {num_cons} \
             constraints",
            comm.rank()
        );
        Ok(Optimizer {
            problem,
            comm,
            num_vars,
            num_cons,
            options,
            buffers,
            log,
            initialized: false,
            _solver: PhantomData,
        })
    }

    /// Run up to `max_iterations` outer iterations and return a shared view
    /// of the final design.
    ///
    /// The view aliases the driver-owned buffer: it reflects whatever the
    /// run produced, including partial progress if a later call fails, and
    /// must be copied by callers that outlive the driver.
    ///
    /// # Errors
    /// Propagates the first failure from the evaluator, the solver, the
    /// vector layer, or the log, tagged with the stage that failed. No
    /// stage is retried.
    pub fn optimize(&mut self, max_iterations: usize) -> DriverResult<ArrayView1<'_, f64>> {
        if !self.initialized {
            let buffers = &mut self.buffers;
            self.problem
                .initial_vars_and_bounds(
                    buffers.x.view_mut(),
                    buffers.lb.view_mut(),
                    buffers.ub.view_mut(),
                )
                .map_err(|source| DriverError::Evaluation { stage: Stage::InitialDesign, source })?;
            self.initialized = true;
        }
        if max_iterations == 0 {
            debug!("optimize called with zero iterations; returning current design");
            return Ok(self.buffers.x.view());
        }

        // Per-call temporaries: released by drop on every exit path.
        let num_vars_local = self.buffers.num_vars_local();
        let mut lb_temp =
            DistVector::allocate(Arc::clone(&self.comm), self.num_vars, num_vars_local)?;
        let mut ub_temp =
            DistVector::allocate(Arc::clone(&self.comm), self.num_vars, num_vars_local)?;

        let fraction = self.options.move_limit_fraction;
        let buffers = &mut self.buffers;

        // Fresh solver state for this call, seeded with the current design.
        let mut solver = {
            let x_vec =
                DistVector::bind(Arc::clone(&self.comm), self.num_vars, buffers.x.view_mut())?;
            S::initialize(self.num_vars, self.num_cons, &x_vec)
                .map_err(|source| DriverError::Solver { stage: Stage::SolverInit, source })?
        };

        for iter in 0..max_iterations {
            let objective = self
                .problem
                .eval_obj_con(buffers.x.view(), buffers.cons.view_mut())
                .map_err(|source| DriverError::Evaluation { stage: Stage::ObjConEval, source })?;
            self.problem
                .eval_obj_con_grad(buffers.x.view(), buffers.g.view_mut(), buffers.gcon.view_mut())
                .map_err(|source| DriverError::Evaluation { stage: Stage::GradEval, source })?;

            move_limit::tighten_bounds(
                buffers.lb.view(),
                buffers.ub.view(),
                buffers.x.view(),
                fraction,
                lb_temp.local_mut(),
                ub_temp.local_mut(),
            );

            let (kkt_l2, kkt_linf, design_l1) = {
                let mut x_vec =
                    DistVector::bind(Arc::clone(&self.comm), self.num_vars, buffers.x.view_mut())?;
                let g_vec =
                    DistVector::bind(Arc::clone(&self.comm), self.num_vars, buffers.g.view_mut())?;
                let mut gcon_rows = Vec::with_capacity(self.num_cons);
                for row in buffers.gcon.outer_iter_mut() {
                    gcon_rows.push(DistVector::bind(Arc::clone(&self.comm), self.num_vars, row)?);
                }

                solver
                    .update(&mut x_vec, &g_vec, buffers.cons.view(), &gcon_rows, &lb_temp, &ub_temp)
                    .map_err(|source| DriverError::Solver { stage: Stage::SolverUpdate, source })?;
                let (kkt_l2, kkt_linf) = solver
                    .kkt_residual(
                        &x_vec,
                        &g_vec,
                        buffers.cons.view(),
                        &gcon_rows,
                        &lb_temp,
                        &ub_temp,
                    )
                    .map_err(|source| DriverError::Solver { stage: Stage::KktResidual, source })?;
                let design_l1 = x_vec
                    .norm_l1()
                    .map_err(|source| DriverError::Collective { stage: Stage::DesignNorm, source })?;
                (kkt_l2, kkt_linf, design_l1)
            };

            let infeasibility = max_constraint_violation(buffers.cons.view());
            self.log.record(&IterationRecord {
                iter,
                objective,
                kkt_l2,
                kkt_linf,
                design_l1,
                infeasibility,
            })?;
            debug!(
                "iter {iter}: obj {objective:.6e}, kkt {kkt_l2:.3e}/{kkt_linf:.3e}, infeas \
                 {infeasibility:.3e}"
            );
        }

        Ok(self.buffers.x.view())
    }

    /// Shared view of the current design in the aliased buffer.
    ///
    /// Valid after construction (zeros), after `optimize(0)` (initial
    /// design), and after any number of iterations, including a failed
    /// call's partial progress.
    pub fn optimized_design(&self) -> ArrayView1<'_, f64> {
        self.buffers.x.view()
    }
}
