//! Shared numeric tolerances and scale-free comparisons.
//!
//! Every threshold that more than one stage of the pipeline relies on lives
//! here so segmentation, clustering and guard fitting agree on what "equal"
//! and "zero" mean.

use ndarray::ArrayView1;

/// Magnitude below which a standard deviation counts as zero.
///
/// Matches rounding the deviation to ten decimal places.
pub const ZERO_STD_TOL: f64 = 5e-11;

/// Relative difference at or below which two guard samples are treated as
/// the same state.
pub const NEAR_IDENTICAL_TOL: f64 = 1e-4;

/// Relative tolerance used when comparing step sizes across trajectories.
pub const STEP_SIZE_RTOL: f64 = 1e-9;

/// Floor for non-positive curvature in the SMO pair update.
pub const SMO_TAU: f64 = 1e-12;

/// Default KKT violation tolerance of the SMO solver.
pub const SMO_STOP_TOL: f64 = 1e-3;

/// Scale-free distance between two vectors.
///
/// Returns `‖a − b‖ / (‖a‖ + ‖b‖)`, or the plain `‖a − b‖` when both norms
/// vanish. The result lies in `[0, 1]` whenever the denominator is positive.
pub fn relative_difference(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let diff = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt();
    let denom = l2_norm(a) + l2_norm(b);
    if denom == 0.0 {
        diff
    } else {
        diff / denom
    }
}

/// Euclidean norm of a vector view.
pub fn l2_norm(v: ArrayView1<f64>) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Whether two step sizes agree up to [`STEP_SIZE_RTOL`].
pub fn steps_agree(a: f64, b: f64) -> bool {
    (a - b).abs() <= STEP_SIZE_RTOL * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify the relative difference on ordinary, opposite and zero vectors.
    //
    // Given
    // -----
    // - (3, 4) vs (3, 4), (1, 0) vs (-1, 0), and two zero vectors.
    //
    // Expect
    // ------
    // - 0, 1 and 0 respectively; the zero case falls back to `‖a − b‖`.
    fn relative_difference_cases() {
        let a = array![3.0, 4.0];
        assert_eq!(relative_difference(a.view(), a.view()), 0.0);

        let p = array![1.0, 0.0];
        let q = array![-1.0, 0.0];
        assert_relative_eq!(relative_difference(p.view(), q.view()), 1.0);

        let z = array![0.0, 0.0];
        assert_eq!(relative_difference(z.view(), z.view()), 0.0);

        let r = array![2.0, 0.0];
        assert_relative_eq!(relative_difference(r.view(), z.view()), 1.0);
    }

    #[test]
    fn steps_agree_is_relative() {
        assert!(steps_agree(0.01, 0.01 + 1e-13));
        assert!(!steps_agree(0.01, 0.011));
    }
}
