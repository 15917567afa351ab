//! Error types for distributed vector creation and collective operations.
//!
//! This module centralizes the failure modes of the linear-algebra layer:
//!
//! - **Partition errors**: [`VecError::SizeMismatch`] when the rank-local
//!   lengths do not sum to the requested global length.
//! - **Collective errors**: [`VecError::Collective`] when a reduction cannot
//!   complete across the rank group (e.g. a poisoned shared slot).
//!
//! Creation and reduction failures are derived from collectively-computed
//! values, so every rank in a group observes the same error variant for the
//! same operation.

/// Result alias for distributed vector operations.
pub type VecResult<T> = Result<T, VecError>;

#[derive(Debug, Clone, PartialEq)]
pub enum VecError {
    // ---- Partition ----
    /// Rank-local lengths do not sum to the global length.
    SizeMismatch {
        global: usize,
        local_sum: usize,
    },

    // ---- Collectives ----
    /// A collective reduction failed to complete across the rank group.
    Collective {
        reason: String,
    },
}

impl std::fmt::Display for VecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VecError::SizeMismatch { global, local_sum } => {
                write!(
                    f,
                    "Partition mismatch: local lengths sum to {local_sum}, expected global \
                     length {global}"
                )
            }
            VecError::Collective { reason } => {
                write!(f, "Collective operation failed: {reason}")
            }
        }
    }
}

impl std::error::Error for VecError {}
