//! distvec — rank-partitioned vectors and the communicator seam.
//!
//! Purpose
//! -------
//! Provide the narrow distributed linear-algebra surface consumed by the
//! optimization driver: a communicator abstraction for SPMD rank groups
//! ([`Communicator`], with [`LocalComm`] and [`ThreadComm`] implementations)
//! and a vector object ([`DistVector`]) whose rank-local storage is either
//! owned or a zero-copy view over a caller buffer.
//!
//! Key behaviors
//! -------------
//! - Collective vector creation with partition validation (local lengths
//!   must sum to the global length on every rank).
//! - Zero-copy binding of flat buffers into vector objects, with the
//!   buffer-outlives-binding invariant enforced by lifetimes.
//! - Collective L1/L∞ norms that return the identical value on every rank.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every rank of a group calls the same sequence of collective operations
//!   in the same order; violating this lock-step discipline deadlocks the
//!   group (documented on [`Communicator`]).
//! - Errors from collectives are observed identically on all ranks.
//!
//! Downstream usage
//! ----------------
//! - The driver (`crate::driver`) owns the flat buffers and binds them into
//!   `DistVector`s scoped to each iteration; the subproblem solver and the
//!   norm-based diagnostics operate on the bound vectors.

pub mod comm;
pub mod errors;
pub mod vector;

pub use self::comm::{Communicator, LocalComm, ThreadComm};
pub use self::errors::{VecError, VecResult};
pub use self::vector::DistVector;
