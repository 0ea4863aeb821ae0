//! Minimum-norm linear least squares via SVD.
//!
//! Purpose
//! -------
//! Solve the multi-output regressions the pipeline needs: intercept-free
//! polynomial flow fits (`Φ · Θ ≈ Ẏ`) and affine reset maps
//! (`X · B + 1·cᵀ ≈ Y`).
//!
//! Key behaviors
//! -------------
//! - [`solve_least_squares`] returns the minimum-norm solution. Singular
//!   values below `max(n, p) · ε · σ_max` are discarded, so rank-deficient
//!   designs (constant columns, repeated rows, a single observation) produce
//!   a finite answer instead of an error.
//! - [`fit_affine`] centres both sides, solves the centred system, and
//!   recovers the intercept as `ȳ − x̄ · B`. A design whose columns are all
//!   constant therefore yields zero slopes and the target mean as
//!   intercept.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; non-finite solutions are reported as
//!   `OptError::NonFiniteSolution`.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::optimization::errors::{OptError, OptResult};

/// Affine least-squares fit `targets ≈ design · slopes + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineFit {
    /// `p × k` slope matrix; column `j` maps the design onto target `j`.
    pub slopes: Array2<f64>,
    /// Length-`k` intercept vector.
    pub intercept: Array1<f64>,
}

/// Minimum-norm solution `Θ` of `design · Θ ≈ targets`.
///
/// Parameters
/// ----------
/// - `design`: `n × p` matrix.
/// - `targets`: `n × k` matrix.
///
/// Returns
/// -------
/// `p × k` coefficient matrix.
///
/// Errors
/// ------
/// - `EmptyDesign` when `n == 0`.
/// - `RowCountMismatch` when row counts differ.
/// - `DecompositionFailed` / `NonFiniteSolution` from the SVD backend.
pub fn solve_least_squares(design: ArrayView2<f64>, targets: ArrayView2<f64>) -> OptResult<Array2<f64>> {
    let (n, p) = design.dim();
    let k = targets.ncols();
    if n == 0 {
        return Err(OptError::EmptyDesign);
    }
    if targets.nrows() != n {
        return Err(OptError::RowCountMismatch { design: n, targets: targets.nrows() });
    }

    let a = DMatrix::from_fn(n, p, |i, j| design[[i, j]]);
    let b = DMatrix::from_fn(n, k, |i, j| targets[[i, j]]);
    let svd = a.svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = sigma_max * (n.max(p) as f64) * f64::EPSILON;
    let solution = svd
        .solve(&b, cutoff)
        .map_err(|reason| OptError::DecompositionFailed { reason: reason.to_string() })?;

    let out = Array2::from_shape_fn((p, k), |(i, j)| solution[(i, j)]);
    check_finite(&out)?;
    Ok(out)
}

/// Affine fit with intercept, solved on centred data.
///
/// Errors
/// ------
/// Same as [`solve_least_squares`].
pub fn fit_affine(design: ArrayView2<f64>, targets: ArrayView2<f64>) -> OptResult<AffineFit> {
    if design.nrows() == 0 {
        return Err(OptError::EmptyDesign);
    }
    if targets.nrows() != design.nrows() {
        return Err(OptError::RowCountMismatch { design: design.nrows(), targets: targets.nrows() });
    }
    let x_mean = design.mean_axis(Axis(0)).ok_or(OptError::EmptyDesign)?;
    let y_mean = targets.mean_axis(Axis(0)).ok_or(OptError::EmptyDesign)?;
    let x_centred = &design - &x_mean;
    let y_centred = &targets - &y_mean;

    let slopes = solve_least_squares(x_centred.view(), y_centred.view())?;
    let intercept = &y_mean - &x_mean.dot(&slopes);
    if let Some((j, &value)) = intercept.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::NonFiniteSolution { row: 0, col: j, value });
    }
    Ok(AffineFit { slopes, intercept })
}

fn check_finite(m: &Array2<f64>) -> OptResult<()> {
    match m.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(OptError::NonFiniteSolution { row, col, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact recovery on consistent full-rank systems.
    // - Minimum-norm behavior on rank-deficient designs.
    // - Intercept recovery and degenerate designs for `fit_affine`.
    // - Input validation errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify exact recovery of coefficients from a consistent system.
    //
    // Given
    // -----
    // - `y = 2·a − b` sampled at four points (two targets: y and 3y).
    //
    // Expect
    // ------
    // - Θ = [[2, 6], [-1, -3]].
    fn solves_consistent_system() {
        // Arrange
        let design = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, -1.0]];
        let targets = array![[2.0, 6.0], [-1.0, -3.0], [1.0, 3.0], [5.0, 15.0]];

        // Act
        let theta = solve_least_squares(design.view(), targets.view()).unwrap();

        // Assert
        assert_relative_eq!(theta[[0, 0]], 2.0, epsilon = 1e-10);
        assert_relative_eq!(theta[[1, 0]], -1.0, epsilon = 1e-10);
        assert_relative_eq!(theta[[0, 1]], 6.0, epsilon = 1e-10);
        assert_relative_eq!(theta[[1, 1]], -3.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Verify the minimum-norm answer when a design column is identically zero.
    //
    // Given
    // -----
    // - Column 0 all zeros, column 1 equal to the target.
    //
    // Expect
    // ------
    // - Coefficient 0 for the zero column, 1 for the other.
    fn zero_column_gets_zero_coefficient() {
        let design = array![[0.0, 1.0], [0.0, 2.0], [0.0, 3.0]];
        let targets = array![[1.0], [2.0], [3.0]];
        let theta = solve_least_squares(design.view(), targets.view()).unwrap();
        assert_relative_eq!(theta[[0, 0]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(theta[[1, 0]], 1.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Verify slope and intercept recovery for an affine map.
    //
    // Given
    // -----
    // - `y = -0.8·x + 0.5` at five points.
    //
    // Expect
    // ------
    // - slope −0.8, intercept 0.5.
    fn fit_affine_recovers_slope_and_intercept() {
        let design = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let targets = design.mapv(|x| -0.8 * x + 0.5);
        let fit = fit_affine(design.view(), targets.view()).unwrap();
        assert_relative_eq!(fit.slopes[[0, 0]], -0.8, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept[0], 0.5, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a constant design yields zero slope and the target mean.
    //
    // Given
    // -----
    // - A single repeated design row with varying targets.
    //
    // Expect
    // ------
    // - slope 0, intercept = mean(targets).
    fn fit_affine_constant_design_returns_mean() {
        let design = array![[2.0], [2.0], [2.0]];
        let targets = array![[1.0], [2.0], [6.0]];
        let fit = fit_affine(design.view(), targets.view()).unwrap();
        assert_relative_eq!(fit.slopes[[0, 0]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_empty_and_mismatched_inputs() {
        let empty = Array2::<f64>::zeros((0, 2));
        let t = Array2::<f64>::zeros((0, 1));
        assert_eq!(solve_least_squares(empty.view(), t.view()), Err(OptError::EmptyDesign));

        let design = array![[1.0], [2.0]];
        let targets = array![[1.0]];
        assert_eq!(
            fit_affine(design.view(), targets.view()),
            Err(OptError::RowCountMismatch { design: 2, targets: 1 })
        );
    }
}
