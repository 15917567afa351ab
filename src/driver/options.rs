//! Driver configuration.
//!
//! The only recognized option is the move-limit fraction controlling the
//! trust-region width (see `driver::move_limit`). It is validated on
//! construction so the iteration loop can assume a sane value.
use crate::driver::errors::{DriverError, DriverResult};

/// Default move-limit fraction: each variable may move at most 20% of its
/// full bound range per iteration.
pub const DEFAULT_MOVE_LIMIT_FRACTION: f64 = 0.2;

/// Driver-level configuration.
///
/// Fields:
/// - `move_limit_fraction: f64` — fraction of each variable's permanent
///   bound range `ub - lb` it may move in a single iteration; must be
///   finite and in `(0, 1]`.
///
/// Constructor:
/// - `new(move_limit_fraction) -> DriverResult<Self>` — validates the
///   fraction.
///
/// Default:
/// - `move_limit_fraction`: [`DEFAULT_MOVE_LIMIT_FRACTION`] (`0.2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverOptions {
    pub move_limit_fraction: f64,
}

impl DriverOptions {
    /// Create validated driver options.
    ///
    /// # Errors
    /// Returns [`DriverError::InvalidMoveLimit`] if the fraction is
    /// non-finite, not strictly positive, or greater than one.
    pub fn new(move_limit_fraction: f64) -> DriverResult<Self> {
        let options = DriverOptions { move_limit_fraction };
        options.validate()?;
        Ok(options)
    }

    /// Re-check the invariants documented on the fields.
    ///
    /// # Errors
    /// Returns [`DriverError::InvalidMoveLimit`] for an out-of-range
    /// fraction.
    pub fn validate(&self) -> DriverResult<()> {
        let fraction = self.move_limit_fraction;
        if !fraction.is_finite() {
            return Err(DriverError::InvalidMoveLimit {
                fraction,
                reason: "Move-limit fraction must be finite.",
            });
        }
        if fraction <= 0.0 {
            return Err(DriverError::InvalidMoveLimit {
                fraction,
                reason: "Move-limit fraction must be strictly positive.",
            });
        }
        if fraction > 1.0 {
            return Err(DriverError::InvalidMoveLimit {
                fraction,
                reason: "Move-limit fraction must not exceed the full bound range.",
            });
        }
        Ok(())
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        DriverOptions { move_limit_fraction: DEFAULT_MOVE_LIMIT_FRACTION }
    }
}
