//! Trust-region move limits for the per-iteration bound box.
//!
//! Each outer iteration the solver is only allowed to move a variable a
//! fixed fraction of its full bound range away from the current iterate:
//! the temporary box `[x - f·(ub−lb), x + f·(ub−lb)]`, intersected with the
//! permanent bounds. This keeps the convex subproblem inside the region
//! where the linearization is trustworthy.
use ndarray::{ArrayView1, ArrayViewMut1, Zip};

/// Recompute the temporary move-limit box for the current iterate.
///
/// For every local variable `i`:
/// - `lb_temp[i] = max(lb[i], x[i] - fraction·(ub[i]−lb[i]))`
/// - `ub_temp[i] = min(ub[i], x[i] + fraction·(ub[i]−lb[i]))`
///
/// The result is always a subset of the permanent box. When
/// `ub[i] == lb[i]` the temporary box collapses to that single point and
/// the variable is effectively fixed.
///
/// # Panics
/// Panics if the five views do not all have the same length; the driver
/// sizes them from one buffer set.
pub fn tighten_bounds(
    lb: ArrayView1<'_, f64>, ub: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>, fraction: f64,
    lb_temp: ArrayViewMut1<'_, f64>, ub_temp: ArrayViewMut1<'_, f64>,
) {
    Zip::from(lb_temp).and(ub_temp).and(lb).and(ub).and(x).for_each(
        |lb_t, ub_t, &lb_i, &ub_i, &x_i| {
            let span = fraction * (ub_i - lb_i);
            *lb_t = (x_i - span).max(lb_i);
            *ub_t = (x_i + span).min(ub_i);
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The subset property: the temporary box never escapes the permanent
    //   box.
    // - The symmetric width `2·f·(ub−lb)` for interior iterates.
    // - Collapse to a single point for fixed variables (`lb == ub`).
    // -------------------------------------------------------------------------

    fn apply(lb: &Array1<f64>, ub: &Array1<f64>, x: &Array1<f64>, f: f64) -> (Array1<f64>, Array1<f64>) {
        let mut lb_t = Array1::zeros(lb.len());
        let mut ub_t = Array1::zeros(ub.len());
        tighten_bounds(lb.view(), ub.view(), x.view(), f, lb_t.view_mut(), ub_t.view_mut());
        (lb_t, ub_t)
    }

    #[test]
    // Purpose
    // -------
    // Verify the temporary box is always a subset of the permanent box,
    // including iterates sitting on a bound.
    //
    // Given
    // -----
    // - Bounds [0, 1] per variable, iterates at 0.0, 0.5 and 1.0,
    //   fraction 0.2.
    //
    // Expect
    // ------
    // - `lb <= lb_temp <= ub_temp <= ub` for every variable.
    fn temporary_box_is_subset_of_permanent_box() {
        // Arrange
        let lb = array![0.0_f64, 0.0, 0.0];
        let ub = array![1.0_f64, 1.0, 1.0];
        let x = array![0.0_f64, 0.5, 1.0];

        // Act
        let (lb_t, ub_t) = apply(&lb, &ub, &x, 0.2);

        // Assert
        for i in 0..3 {
            assert!(lb[i] <= lb_t[i], "lb_temp[{i}] escaped below the permanent bound");
            assert!(lb_t[i] <= ub_t[i], "box [{i}] inverted");
            assert!(ub_t[i] <= ub[i], "ub_temp[{i}] escaped above the permanent bound");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that an interior iterate gets the full symmetric window of
    // width `2·f·(ub−lb)` centered on the iterate.
    //
    // Given
    // -----
    // - Bounds [-1, 3] (range 4), iterate 1.0, fraction 0.2.
    //
    // Expect
    // ------
    // - `lb_temp == 0.2` and `ub_temp == 1.8` (1.0 ∓/± 0.8).
    fn interior_iterate_gets_symmetric_window() {
        let lb = array![-1.0_f64];
        let ub = array![3.0_f64];
        let x = array![1.0_f64];

        let (lb_t, ub_t) = apply(&lb, &ub, &x, 0.2);

        assert!((lb_t[0] - 0.2).abs() < 1e-15);
        assert!((ub_t[0] - 1.8).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a variable with `lb == ub` collapses to that point.
    //
    // Given
    // -----
    // - Bounds [2, 2], iterate 2.0, fraction 0.2.
    //
    // Expect
    // ------
    // - `lb_temp == ub_temp == 2.0`.
    fn fixed_variable_collapses_to_a_point() {
        let lb = array![2.0_f64];
        let ub = array![2.0_f64];
        let x = array![2.0_f64];

        let (lb_t, ub_t) = apply(&lb, &ub, &x, 0.2);

        assert_eq!(lb_t[0], 2.0);
        assert_eq!(ub_t[0], 2.0);
    }
}
