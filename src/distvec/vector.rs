//! distvec::vector — distributed vectors with owned or borrowed local storage.
//!
//! Purpose
//! -------
//! Provide the vector object used by the optimization driver for collective
//! algebra (norms, reductions) over rank-partitioned data. A
//! [`DistVector`] holds the rank-local slice of a global vector; its local
//! storage is either freshly owned or a zero-copy mutable view over a
//! caller-supplied buffer.
//!
//! Key behaviors
//! -------------
//! - [`DistVector::allocate`] creates a vector with owned, zero-initialized
//!   local storage.
//! - [`DistVector::bind`] creates a vector whose local storage *is* the
//!   caller's buffer: writes through the vector are visible in the buffer
//!   and vice versa, with no copy.
//! - Creation is collective and validates the partition: the rank-local
//!   lengths must sum to the global length on every rank.
//! - [`DistVector::norm_l1`] and [`DistVector::norm_linf`] reduce rank-local
//!   partial norms into the identical global norm on every rank.
//!
//! Invariants & assumptions
//! ------------------------
//! - A borrowed vector cannot outlive its backing buffer; the lifetime
//!   parameter ties the two together, so releasing a binding before the
//!   buffer is a property of the types, not a calling convention.
//! - Dropping a borrowed vector releases only view metadata, never the
//!   backing storage.
//! - `sum(local_len over ranks) == global_len` holds for every successfully
//!   created vector (checked collectively at creation).
//! - All ranks of a group call the same creation and norm operations in the
//!   same order (lock-step contract of [`Communicator`]).
//!
//! Conventions
//! -----------
//! - Local storage is a contiguous `f64` slice exposed through `ndarray`
//!   views; `local()` / `local_mut()` are the get/restore pair, with the
//!   restore implicit in the end of the borrow.
//! - Norms are global quantities: every rank receives the same value.
//!
//! Downstream usage
//! ----------------
//! - The driver binds its design, gradient, and Jacobian-row buffers into
//!   `DistVector`s scoped to one iteration, hands them to the subproblem
//!   solver, and reads the results back through the flat buffers after the
//!   bindings drop.
//! - Temporary move-limit bounds are `allocate`d once per `optimize` call.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the aliasing contract with sentinel values written on
//!   each side, the partition check failure path, zero-initialization, and
//!   norm values on single- and multi-rank groups.
use std::sync::Arc;

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

use crate::distvec::{
    comm::Communicator,
    errors::{VecError, VecResult},
};

/// Local storage of a [`DistVector`]: owned, or borrowed from a caller buffer.
#[derive(Debug)]
enum VectorStorage<'a> {
    Owned(Array1<f64>),
    Borrowed(ArrayViewMut1<'a, f64>),
}

/// Rank-local handle on a globally partitioned vector.
///
/// The lifetime `'a` is `'static` for owned vectors and the backing buffer's
/// lifetime for borrowed ones.
#[derive(Debug)]
pub struct DistVector<'a> {
    comm: Arc<dyn Communicator>,
    global_len: usize,
    storage: VectorStorage<'a>,
}

impl<'a> DistVector<'a> {
    /// Create a vector with owned, zero-initialized local storage.
    ///
    /// Collective: every rank of `comm` must call with the same
    /// `global_len` and its own `local_len`.
    ///
    /// # Errors
    /// - [`VecError::SizeMismatch`] if the local lengths do not sum to
    ///   `global_len` across the group.
    /// - [`VecError::Collective`] if the partition check reduction fails.
    pub fn allocate(
        comm: Arc<dyn Communicator>, global_len: usize, local_len: usize,
    ) -> VecResult<DistVector<'static>> {
        validate_partition(comm.as_ref(), global_len, local_len)?;
        Ok(DistVector {
            comm,
            global_len,
            storage: VectorStorage::Owned(Array1::zeros(local_len)),
        })
    }

    /// Create a vector whose local storage aliases `local` without copying.
    ///
    /// The binding borrows the buffer mutably for its whole lifetime, so the
    /// buffer cannot be freed, moved, or read as a flat array until the
    /// vector is dropped. Collective, like [`DistVector::allocate`].
    ///
    /// # Errors
    /// - [`VecError::SizeMismatch`] if the local lengths do not sum to
    ///   `global_len` across the group.
    /// - [`VecError::Collective`] if the partition check reduction fails.
    pub fn bind(
        comm: Arc<dyn Communicator>, global_len: usize, local: ArrayViewMut1<'a, f64>,
    ) -> VecResult<DistVector<'a>> {
        validate_partition(comm.as_ref(), global_len, local.len())?;
        Ok(DistVector { comm, global_len, storage: VectorStorage::Borrowed(local) })
    }

    /// Global length of the vector (sum of local lengths over ranks).
    pub fn global_len(&self) -> usize {
        self.global_len
    }

    /// Length of this rank's local slice.
    pub fn local_len(&self) -> usize {
        match &self.storage {
            VectorStorage::Owned(data) => data.len(),
            VectorStorage::Borrowed(view) => view.len(),
        }
    }

    /// The communicator this vector was created on.
    pub fn comm(&self) -> &Arc<dyn Communicator> {
        &self.comm
    }

    /// Read access to the rank-local storage.
    pub fn local(&self) -> ArrayView1<'_, f64> {
        match &self.storage {
            VectorStorage::Owned(data) => data.view(),
            VectorStorage::Borrowed(view) => view.view(),
        }
    }

    /// Write access to the rank-local storage.
    ///
    /// For a borrowed vector the writes land directly in the backing buffer.
    pub fn local_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        match &mut self.storage {
            VectorStorage::Owned(data) => data.view_mut(),
            VectorStorage::Borrowed(view) => view.view_mut(),
        }
    }

    /// Global L1 norm: `sum_i |v_i|` over all ranks.
    ///
    /// Collective; every rank receives the same value.
    ///
    /// # Errors
    /// Returns [`VecError::Collective`] if the reduction fails.
    pub fn norm_l1(&self) -> VecResult<f64> {
        let local = self.local().fold(0.0, |acc, v| acc + v.abs());
        self.comm.allreduce_sum(local)
    }

    /// Global L∞ norm: `max_i |v_i|` over all ranks.
    ///
    /// Collective; every rank receives the same value.
    ///
    /// # Errors
    /// Returns [`VecError::Collective`] if the reduction fails.
    pub fn norm_linf(&self) -> VecResult<f64> {
        let local = self.local().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        self.comm.allreduce_max(local)
    }
}

/// Collective partition check shared by both creation modes.
fn validate_partition(comm: &dyn Communicator, global_len: usize, local_len: usize) -> VecResult<()> {
    let local_sum = comm.allreduce_sum(local_len as f64)? as usize;
    if local_sum != global_len {
        return Err(VecError::SizeMismatch { global: global_len, local_sum });
    }
    Ok(())
}
