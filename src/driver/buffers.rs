//! driver::buffers — the aliased buffer set backing every vector binding.
//!
//! Purpose
//! -------
//! Own the flat numeric buffers the driver shares, without copying, with
//! the distributed-vector layer and the evaluator: design variables,
//! permanent bounds, objective gradient, replicated constraint values, and
//! the constraint-Jacobian block.
//!
//! Key behaviors
//! -------------
//! - Allocate all buffers zero-initialized at construction, sized from the
//!   rank-local variable count and the global constraint count.
//! - Expose the Jacobian block as an `m × n_local` row-major matrix whose
//!   rows are handed out as contiguous mutable views, so constraint `i`'s
//!   gradient can be bound as its own distributed vector with no offset
//!   arithmetic.
//!
//! Invariants & assumptions
//! ------------------------
//! - The set is owned exclusively by the driver and mutated only from the
//!   driver's sequential loop body (single-writer discipline).
//! - Vector bindings over these buffers are borrows: the borrow checker
//!   guarantees every binding is released before the buffers are read or
//!   written as flat arrays again, and before the set is dropped.
//! - `gcon.row(i)` is exactly constraint `i`'s gradient w.r.t. the local
//!   variables; the row stride equals the local variable count.
//!
//! Conventions
//! -----------
//! - `x`, `lb`, `ub`, `g` have length `num_vars_local`; `cons` has length
//!   `num_cons` and holds the same values on every rank.
//!
//! Downstream usage
//! ----------------
//! - The evaluator fills `x`/`lb`/`ub` once and `cons`/`g`/`gcon` each
//!   iteration through mutable views.
//! - The driver binds `x`, `g`, and each `gcon` row into `DistVector`s for
//!   the solver, scoped to the iteration body.
//!
//! Testing notes
//! -------------
//! - Unit tests cover zero-initialization, buffer lengths, and the aliasing
//!   of Jacobian rows into the flat block.
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};

/// Flat numeric buffers owned by the driver and mirrored, without copy,
/// into distributed vector bindings.
///
/// Fields
/// ------
/// - `x`: design variables, length `num_vars_local`.
/// - `lb`, `ub`: permanent variable bounds, length `num_vars_local`.
/// - `g`: objective gradient, length `num_vars_local`.
/// - `cons`: constraint values, length `num_cons`, replicated on every rank.
/// - `gcon`: constraint Jacobian, `num_cons × num_vars_local` row-major;
///   row `i` is constraint `i`'s gradient w.r.t. the local variables.
#[derive(Debug)]
pub struct DesignBuffers {
    pub x: Array1<f64>,
    pub lb: Array1<f64>,
    pub ub: Array1<f64>,
    pub g: Array1<f64>,
    pub cons: Array1<f64>,
    pub gcon: Array2<f64>,
}

impl DesignBuffers {
    /// Allocate a zero-initialized buffer set for `num_vars_local` local
    /// design variables and `num_cons` (global, replicated) constraints.
    pub fn new(num_vars_local: usize, num_cons: usize) -> Self {
        DesignBuffers {
            x: Array1::zeros(num_vars_local),
            lb: Array1::zeros(num_vars_local),
            ub: Array1::zeros(num_vars_local),
            g: Array1::zeros(num_vars_local),
            cons: Array1::zeros(num_cons),
            gcon: Array2::zeros((num_cons, num_vars_local)),
        }
    }

    /// Rank-local design variable count.
    pub fn num_vars_local(&self) -> usize {
        self.x.len()
    }

    /// Global constraint count.
    pub fn num_cons(&self) -> usize {
        self.cons.len()
    }

    /// Constraint `i`'s gradient w.r.t. the local variables, read-only.
    ///
    /// # Panics
    /// Panics if `i >= num_cons()`.
    pub fn gcon_row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.gcon.row(i)
    }

    /// Constraint `i`'s gradient w.r.t. the local variables, mutable.
    ///
    /// # Panics
    /// Panics if `i >= num_cons()`.
    pub fn gcon_row_mut(&mut self, i: usize) -> ArrayViewMut1<'_, f64> {
        self.gcon.row_mut(i)
    }
}
