//! driver::diagnostics — per-iteration convergence metrics and the log table.
//!
//! Purpose
//! -------
//! Collect the scalar summaries emitted once per outer iteration (objective,
//! KKT residual norms, design L1 norm, maximum constraint violation) and
//! write them as a fixed-width text table from the coordinating rank.
//!
//! Key behaviors
//! -------------
//! - [`max_constraint_violation`] folds the replicated constraint buffer
//!   into `max_i max(cons[i], 0)`: feasible constraints (≤ 0) contribute
//!   zero, never a negative credit. Because the buffer is replicated, every
//!   rank computes the identical value with no reduction.
//! - [`IterationLog`] owns the output file, writes one record per
//!   iteration, reprints the column header at iteration 0 and every 10th
//!   iteration, and flushes after every record so a crashed run keeps its
//!   tail.
//! - Only the coordinating rank holds an open file; on every other rank
//!   the log is a no-op sink.
//!
//! Conventions
//! -----------
//! - Columns: `iter, obj, KKT_l2, KKT_linf, |x|_1, infeas`; the iteration
//!   index right-aligned in 6 characters, each metric right-aligned in 20
//!   characters in scientific notation with 10 fractional digits.
//! - A blank line precedes every header block.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the violation fold, the exact shape of a short run's
//!   log, and header reprinting at iteration 10.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::ArrayView1;

use crate::driver::errors::{DriverError, DriverResult};

/// Header reprint period, in iterations.
const HEADER_PERIOD: usize = 10;

/// One row of the iteration log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// Outer iteration index, 0-based within one `optimize` call.
    pub iter: usize,
    /// Objective value at the evaluated iterate.
    pub objective: f64,
    /// KKT residual, L2 norm.
    pub kkt_l2: f64,
    /// KKT residual, L∞ norm.
    pub kkt_linf: f64,
    /// Global L1 norm of the design vector.
    pub design_l1: f64,
    /// Maximum constraint violation, `max_i max(cons[i], 0)`.
    pub infeasibility: f64,
}

/// Maximum constraint violation over a replicated constraint buffer.
///
/// Constraints are feasible at or below zero; only positive values count
/// as violations, so the result is never negative and is exactly zero when
/// every constraint is satisfied.
pub fn max_constraint_violation(cons: ArrayView1<'_, f64>) -> f64 {
    cons.fold(0.0, |acc, &c| if c > acc { c } else { acc })
}

/// Fixed-width iteration table, owned by the driver.
///
/// Created with a real file sink on the coordinating rank and as a no-op
/// sink everywhere else, so the driver can call [`IterationLog::record`]
/// unconditionally from its SPMD loop body.
#[derive(Debug)]
pub struct IterationLog {
    sink: Option<BufWriter<File>>,
}

impl IterationLog {
    /// Open (and truncate) the log file on the coordinating rank; create a
    /// no-op log on every other rank.
    ///
    /// # Errors
    /// Returns [`DriverError::Log`] if the coordinating rank cannot create
    /// the file.
    pub fn create(path: &Path, is_coordinator: bool) -> DriverResult<Self> {
        if !is_coordinator {
            return Ok(IterationLog { sink: None });
        }
        let file = File::create(path).map_err(|e| DriverError::Log {
            context: "open the iteration log",
            reason: e.to_string(),
        })?;
        Ok(IterationLog { sink: Some(BufWriter::new(file)) })
    }

    /// Append one record, preceded by a header block at iteration 0 and
    /// every [`HEADER_PERIOD`]th iteration. Flushes after every record.
    ///
    /// # Errors
    /// Returns [`DriverError::Log`] if the write or flush fails; the
    /// failure aborts the surrounding `optimize` call rather than being
    /// silently dropped.
    pub fn record(&mut self, record: &IterationRecord) -> DriverResult<()> {
        let Some(sink) = &mut self.sink else {
            return Ok(());
        };
        let io_err = |e: std::io::Error| DriverError::Log {
            context: "write an iteration record",
            reason: e.to_string(),
        };
        if record.iter % HEADER_PERIOD == 0 {
            writeln!(
                sink,
                "\n{:>6}{:>20}{:>20}{:>20}{:>20}{:>20}",
                "iter", "obj", "KKT_l2", "KKT_linf", "|x|_1", "infeas"
            )
            .map_err(io_err)?;
        }
        writeln!(
            sink,
            "{:>6}{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}{:>20.10e}",
            record.iter,
            record.objective,
            record.kkt_l2,
            record.kkt_linf,
            record.design_l1,
            record.infeasibility
        )
        .map_err(io_err)?;
        sink.flush().map_err(io_err)
    }
}
