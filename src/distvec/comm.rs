//! distvec::comm — rank groups and collective reductions.
//!
//! Purpose
//! -------
//! Define the narrow communicator seam the rest of the crate relies on for
//! parallel execution: each rank knows its index and the group size, and can
//! participate in scalar all-reduce collectives (sum, max). Two in-crate
//! implementations are provided: [`LocalComm`] for single-rank runs and
//! [`ThreadComm`] for in-process SPMD rank groups synchronized over
//! `std::sync::Barrier`.
//!
//! Key behaviors
//! -------------
//! - Expose `rank()` / `size()` so callers can partition work and elect a
//!   coordinating rank.
//! - Provide `allreduce_sum` / `allreduce_max`: every rank contributes one
//!   scalar and every rank receives the identical reduced scalar.
//! - Surface reduction failures as [`VecError::Collective`] so they can be
//!   propagated instead of panicking mid-collective.
//!
//! Invariants & assumptions
//! ------------------------
//! - **Lock-step discipline**: every rank in a group must call the same
//!   sequence of collective operations in the same order. A rank that skips
//!   or reorders a collective deadlocks the whole group; this is a hard
//!   contract of SPMD execution, not a recoverable condition.
//! - A collective either completes on all ranks or fails identically on all
//!   ranks; no rank observes a partial result.
//! - Implementations are `Send + Sync`; a communicator handle may be shared
//!   freely between the driver, vectors, and evaluators on its own rank.
//!
//! Conventions
//! -----------
//! - Ranks are numbered `0..size`; rank `0` is the coordinating rank by
//!   convention (it owns log output in the driver).
//! - Reductions operate on `f64` scalars only; vector-valued reductions are
//!   composed from scalar ones by the callers that need them.
//!
//! Downstream usage
//! ----------------
//! - `distvec::vector` validates partitions and computes norms through this
//!   seam.
//! - Problem evaluators may use the communicator to assemble replicated
//!   constraint values from rank-local contributions.
//! - Multi-process backends (e.g. an MPI binding) can be plugged in by
//!   implementing [`Communicator`] without touching the driver.
//!
//! Testing notes
//! -------------
//! - Unit tests cover identity reductions on [`LocalComm`] and
//!   multi-threaded sum/max agreement on [`ThreadComm`] groups.
//! - Deadlock behavior under a broken lock-step sequence is intentionally
//!   not tested; it is documented as undefined group state.
use std::fmt;
use std::sync::{Arc, Barrier, Mutex};

use crate::distvec::errors::{VecError, VecResult};

/// Narrow seam for SPMD rank groups.
///
/// Every rank holds one `Communicator` handle describing its place in the
/// group. All collective methods must be called by every rank of the group
/// in the same order (see the module header for the lock-step contract).
pub trait Communicator: fmt::Debug + Send + Sync {
    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// This rank's index, in `0..size`.
    fn rank(&self) -> usize;

    /// Collective sum: every rank contributes `value` and receives the sum
    /// over all ranks.
    ///
    /// # Errors
    /// Returns [`VecError::Collective`] if the reduction cannot complete;
    /// the error is observed identically on every rank.
    fn allreduce_sum(&self, value: f64) -> VecResult<f64>;

    /// Collective max: every rank contributes `value` and receives the
    /// maximum over all ranks.
    ///
    /// # Errors
    /// Returns [`VecError::Collective`] if the reduction cannot complete;
    /// the error is observed identically on every rank.
    fn allreduce_max(&self, value: f64) -> VecResult<f64>;
}

/// Trivial single-rank communicator.
///
/// Reductions are the identity; `rank() == 0` and `size() == 1`. Useful for
/// serial runs and for unit tests that do not exercise parallelism.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalComm;

impl Communicator for LocalComm {
    fn size(&self) -> usize {
        1
    }

    fn rank(&self) -> usize {
        0
    }

    fn allreduce_sum(&self, value: f64) -> VecResult<f64> {
        Ok(value)
    }

    fn allreduce_max(&self, value: f64) -> VecResult<f64> {
        Ok(value)
    }
}

/// Shared state of one [`ThreadComm`] rank group.
#[derive(Debug)]
struct RankGroup {
    size: usize,
    barrier: Barrier,
    slots: Mutex<Vec<f64>>,
}

/// In-process SPMD communicator: one handle per rank, one OS thread per rank.
///
/// A group of `size` handles shares a barrier and a slot array. Each
/// collective writes the rank's contribution into its slot, waits for the
/// whole group, reduces over all slots, and waits again before returning so
/// no rank can start the next collective while another is still reading.
///
/// Handles are created together via [`ThreadComm::group`] and then moved
/// onto their respective threads.
#[derive(Debug)]
pub struct ThreadComm {
    rank: usize,
    shared: Arc<RankGroup>,
}

impl ThreadComm {
    /// Create a group of `size` communicator handles, one per rank.
    ///
    /// The handle at index `i` reports `rank() == i`. All handles must end
    /// up on distinct threads before any collective is invoked; calling a
    /// collective on two handles from the same thread deadlocks.
    pub fn group(size: usize) -> Vec<ThreadComm> {
        let shared = Arc::new(RankGroup {
            size,
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![0.0; size]),
        });
        (0..size).map(|rank| ThreadComm { rank, shared: Arc::clone(&shared) }).collect()
    }

    /// Run one barrier-synchronized reduction over the group's slots.
    fn allreduce_with<R>(&self, value: f64, reduce: R) -> VecResult<f64>
    where
        R: Fn(&[f64]) -> f64,
    {
        {
            let mut slots = self.shared.slots.lock().map_err(|_| VecError::Collective {
                reason: "rank slot storage poisoned by a panicked rank".to_string(),
            })?;
            slots[self.rank] = value;
        }
        // All contributions written.
        self.shared.barrier.wait();
        let result = {
            let slots = self.shared.slots.lock().map_err(|_| VecError::Collective {
                reason: "rank slot storage poisoned by a panicked rank".to_string(),
            })?;
            reduce(&slots)
        };
        // All ranks have read; slots may be reused by the next collective.
        self.shared.barrier.wait();
        Ok(result)
    }
}

impl Communicator for ThreadComm {
    fn size(&self) -> usize {
        self.shared.size
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn allreduce_sum(&self, value: f64) -> VecResult<f64> {
        self.allreduce_with(value, |slots| slots.iter().sum())
    }

    fn allreduce_max(&self, value: f64) -> VecResult<f64> {
        self.allreduce_with(value, |slots| slots.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)))
    }
}
