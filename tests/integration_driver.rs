//! Integration tests for the distributed optimization driver.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: problem evaluation through aliased
//!   buffers, move-limited subproblem updates through zero-copy bindings,
//!   KKT/diagnostic reduction, and the iteration log.
//! - Exercise real SPMD execution on multi-rank `ThreadComm` groups, not
//!   just the single-rank shortcut.
//!
//! Coverage
//! --------
//! - `driver::Optimizer`:
//!   - Single-rank runs: design improvement, bound feasibility, log shape.
//!   - Two-rank runs: rank agreement on the shared diagnostics, coordinator
//!     -only log output.
//!   - Collective construction failure on an inconsistent partition.
//! - `distvec`:
//!   - Vector binding, norms, and reductions driven through the full loop.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of move limits, violation folds, and log
//!   formatting — covered by unit tests in the respective modules.
//! - Subproblem-solver numerics: the solver here is a deterministic
//!   projected-gradient stand-in exercising the seam, not an MMA
//!   implementation.
use std::sync::Arc;

use ndarray::{ArrayView1, ArrayViewMut1, ArrayViewMut2};

use distopt::{
    Communicator, DistVector, DriverError, DriverOptions, EvalError, EvalResult, LocalComm,
    Optimizer, Problem, SolverError, SolverResult, SubproblemSolver, ThreadComm, VecError,
};

/// Rank-partitioned quadratic with one replicated mean-value constraint.
///
/// Objective: `Σ_i (x_i − target)²` over the local variables (each rank's
/// share of a separable global objective). Constraint: `mean(x) − cap ≤ 0`,
/// assembled with a collective sum so every rank fills the identical
/// replicated value. Bounds are `[0, 1]`, initial design `0.5`.
struct MeanCapProblem {
    comm: Arc<dyn Communicator>,
    num_vars: usize,
    num_vars_local: usize,
    target: f64,
    cap: f64,
}

impl Problem for MeanCapProblem {
    fn comm(&self) -> Arc<dyn Communicator> {
        Arc::clone(&self.comm)
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn num_vars_local(&self) -> usize {
        self.num_vars_local
    }

    fn num_cons(&self) -> usize {
        1
    }

    fn initial_vars_and_bounds(
        &self, mut x: ArrayViewMut1<'_, f64>, mut lb: ArrayViewMut1<'_, f64>,
        mut ub: ArrayViewMut1<'_, f64>,
    ) -> EvalResult<()> {
        x.fill(0.5);
        lb.fill(0.0);
        ub.fill(1.0);
        Ok(())
    }

    fn eval_obj_con(
        &self, x: ArrayView1<'_, f64>, mut cons: ArrayViewMut1<'_, f64>,
    ) -> EvalResult<f64> {
        let local_obj = x.fold(0.0, |acc, &v| acc + (v - self.target) * (v - self.target));
        let objective = reduce_sum(&self.comm, local_obj, "objective")?;
        let total = reduce_sum(&self.comm, x.sum(), "volume constraint")?;
        cons[0] = total / self.num_vars as f64 - self.cap;
        Ok(objective)
    }

    fn eval_obj_con_grad(
        &self, x: ArrayView1<'_, f64>, mut g: ArrayViewMut1<'_, f64>,
        mut gcon: ArrayViewMut2<'_, f64>,
    ) -> EvalResult<()> {
        for (gi, &xi) in g.iter_mut().zip(x.iter()) {
            *gi = 2.0 * (xi - self.target);
        }
        gcon.fill(1.0 / self.num_vars as f64);
        Ok(())
    }
}

fn reduce_sum(comm: &Arc<dyn Communicator>, value: f64, what: &'static str) -> EvalResult<f64> {
    comm.allreduce_sum(value)
        .map_err(|e: VecError| EvalError::Failure { what, reason: e.to_string() })
}

/// Deterministic projected-gradient stand-in for the subproblem solver.
///
/// Update: one fixed-step gradient descent step clipped to the iteration
/// box. KKT residual: norms of the projected gradient
/// `r_i = x_i − clip(x_i − g_i)`, reduced collectively so all ranks agree.
struct ProjectedGradient {
    step: f64,
}

impl SubproblemSolver for ProjectedGradient {
    fn initialize(
        _num_vars: usize, _num_cons: usize, _design: &DistVector<'_>,
    ) -> SolverResult<Self> {
        Ok(ProjectedGradient { step: 0.5 })
    }

    fn update(
        &mut self, x: &mut DistVector<'_>, g: &DistVector<'_>, _cons: ArrayView1<'_, f64>,
        _gcon: &[DistVector<'_>], lb: &DistVector<'_>, ub: &DistVector<'_>,
    ) -> SolverResult<()> {
        let step = self.step;
        let g = g.local();
        let lb = lb.local();
        let ub = ub.local();
        for (i, xi) in x.local_mut().iter_mut().enumerate() {
            *xi = (*xi - step * g[i]).clamp(lb[i], ub[i]);
        }
        Ok(())
    }

    fn kkt_residual(
        &self, x: &DistVector<'_>, g: &DistVector<'_>, _cons: ArrayView1<'_, f64>,
        _gcon: &[DistVector<'_>], lb: &DistVector<'_>, ub: &DistVector<'_>,
    ) -> SolverResult<(f64, f64)> {
        let xv = x.local();
        let gv = g.local();
        let lbv = lb.local();
        let ubv = ub.local();
        let mut local_sq = 0.0;
        let mut local_max = 0.0_f64;
        for i in 0..xv.len() {
            let r = xv[i] - (xv[i] - gv[i]).clamp(lbv[i], ubv[i]);
            local_sq += r * r;
            local_max = local_max.max(r.abs());
        }
        let to_solver =
            |e: VecError| SolverError::Numerical { what: "KKT residual", reason: e.to_string() };
        let l2 = x.comm().allreduce_sum(local_sq).map_err(to_solver)?.sqrt();
        let linf = x.comm().allreduce_max(local_max).map_err(to_solver)?;
        Ok((l2, linf))
    }
}

fn single_rank_problem(num_vars: usize) -> MeanCapProblem {
    MeanCapProblem {
        comm: Arc::new(LocalComm),
        num_vars,
        num_vars_local: num_vars,
        target: 0.1,
        cap: 0.4,
    }
}

#[test]
// Purpose
// -------
// Run three iterations on a single rank and check that the design moves
// toward the target inside the bounds, and that the log is exactly one
// header block followed by three data rows.
//
// Given
// -----
// - A 4-variable mean-cap problem, projected-gradient solver, 3 iterations.
//
// Expect
// ------
// - Every design value stays in [0, 1] and ends below the initial 0.5.
// - The log holds a blank line, one header, and 3 rows; no second header
//   because iteration 10 is never reached.
fn single_rank_run_improves_design_and_writes_one_header_block() {
    let _ = env_logger::builder().is_test(true).try_init();

    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("opt.log");
    let mut optimizer: Optimizer<MeanCapProblem, ProjectedGradient> =
        Optimizer::new(single_rank_problem(4), &log_path, DriverOptions::default()).unwrap();

    // Act
    let design = optimizer.optimize(3).unwrap().to_owned();

    // Assert: design
    for &v in design.iter() {
        assert!((0.0..=1.0).contains(&v), "design value {v} escaped the bounds");
        assert!(v < 0.5, "design value {v} did not move toward the target");
    }

    // Assert: log shape
    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5, "expected blank + header + 3 rows, got {lines:?}");
    assert_eq!(lines[0], "");
    assert!(lines[1].contains("iter"));
    assert_eq!(contents.lines().filter(|l| l.contains("KKT_l2")).count(), 1);
    for (i, row) in lines[2..].iter().enumerate() {
        assert!(row.trim_start().starts_with(&i.to_string()), "row {i} malformed: {row:?}");
    }
}

#[test]
// Purpose
// -------
// Run the full driver on a two-rank ThreadComm group and verify SPMD
// agreement: both ranks converge to the same (symmetric) local designs and
// only the coordinating rank writes its log.
//
// Given
// -----
// - 6 global variables split 3 + 3, 5 iterations on each rank, each rank
//   passing its own log path.
//
// Expect
// ------
// - Both ranks finish without error and their local designs are identical
//   (the problem is symmetric across ranks).
// - Rank 0's log has one header and 5 rows; rank 1's path was never
//   created.
fn two_rank_group_runs_in_lock_step_with_coordinator_only_log() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let comms = ThreadComm::group(2);

    // Act
    let handles: Vec<_> = comms
        .into_iter()
        .map(|comm| {
            let log_path = dir.path().join(format!("rank{}.log", comm.rank()));
            std::thread::spawn(move || {
                let comm: Arc<dyn Communicator> = Arc::new(comm);
                let problem = MeanCapProblem {
                    comm,
                    num_vars: 6,
                    num_vars_local: 3,
                    target: 0.1,
                    cap: 0.4,
                };
                let mut optimizer: Optimizer<MeanCapProblem, ProjectedGradient> =
                    Optimizer::new(problem, &log_path, DriverOptions::default()).unwrap();
                optimizer.optimize(5).unwrap().to_vec()
            })
        })
        .collect();

    let designs: Vec<Vec<f64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Assert: rank agreement
    assert_eq!(designs[0].len(), 3);
    assert_eq!(designs[0], designs[1], "symmetric ranks must produce identical local designs");
    for &v in &designs[0] {
        assert!((0.0..=1.0).contains(&v));
        assert!(v < 0.5);
    }

    // Assert: coordinator-only log
    let rank0 = std::fs::read_to_string(dir.path().join("rank0.log")).unwrap();
    assert_eq!(rank0.lines().filter(|l| l.contains("KKT_l2")).count(), 1);
    assert_eq!(rank0.lines().filter(|l| !l.is_empty() && !l.contains("iter")).count(), 5);
    assert!(!dir.path().join("rank1.log").exists(), "rank 1 must not write a log");
}

#[test]
// Purpose
// -------
// Verify that an inconsistent partition aborts construction with an
// allocation error on every rank of the group.
//
// Given
// -----
// - Two ranks each claiming 3 local variables of a 5-variable problem.
//
// Expect
// ------
// - Both ranks fail `Optimizer::new` with `DriverError::Allocation`
//   reporting the 6-into-5 mismatch.
fn inconsistent_partition_fails_construction_on_all_ranks() {
    let dir = tempfile::tempdir().unwrap();
    let comms = ThreadComm::group(2);

    let handles: Vec<_> = comms
        .into_iter()
        .map(|comm| {
            let log_path = dir.path().join(format!("bad{}.log", comm.rank()));
            std::thread::spawn(move || {
                let comm: Arc<dyn Communicator> = Arc::new(comm);
                let problem = MeanCapProblem {
                    comm,
                    num_vars: 5,
                    num_vars_local: 3,
                    target: 0.1,
                    cap: 0.4,
                };
                Optimizer::<MeanCapProblem, ProjectedGradient>::new(
                    problem,
                    &log_path,
                    DriverOptions::default(),
                )
                .err()
                .expect("construction must fail on a 6-into-5 partition")
            })
        })
        .collect();

    for handle in handles {
        let err = handle.join().unwrap();
        match err {
            DriverError::Allocation { source } => {
                assert_eq!(source, VecError::SizeMismatch { global: 5, local_sum: 6 });
            }
            other => panic!("expected an allocation error, got {other:?}"),
        }
    }
}

#[test]
// Purpose
// -------
// Verify that a run reaching iteration 10 reprints the header exactly once
// more, immediately before the row for iteration 10.
//
// Given
// -----
// - A single-rank, 11-iteration run.
//
// Expect
// ------
// - Two header rows in the log; the line after the second header starts
//   with `10`.
fn header_reappears_when_iteration_ten_is_reached() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("opt.log");
    let mut optimizer: Optimizer<MeanCapProblem, ProjectedGradient> =
        Optimizer::new(single_rank_problem(2), &log_path, DriverOptions::default()).unwrap();

    optimizer.optimize(11).unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    let headers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, l)| l.contains("KKT_l2").then_some(i))
        .collect();
    assert_eq!(headers.len(), 2, "expected the header at iterations 0 and 10");
    assert!(lines[headers[1] + 1].trim_start().starts_with("10"));
}
