//! Correlation of two signals along a warping path.
//!
//! For each variable, the samples paired by the path form two equally long
//! series; their Pearson correlation measures whether the segments move
//! together. A variable that is numerically constant on either side carries
//! no shape information and is left out. The score is the minimum over the
//! remaining variables, or `1.0` when none remain.

use ndarray::ArrayView2;
use statrs::statistics::Statistics;

use crate::optimization::numerical_stability::ZERO_STD_TOL;

/// Minimum per-variable Pearson correlation of `a` and `b` along `path`.
///
/// Parameters
/// ----------
/// - `a`, `b`: signals, one sample per row, equal column counts.
/// - `path`: index pairs into the rows of `a` and `b`.
pub fn path_correlation(a: ArrayView2<f64>, b: ArrayView2<f64>, path: &[(usize, usize)]) -> f64 {
    let mut score: Option<f64> = None;
    for var in 0..a.ncols() {
        let xs: Vec<f64> = path.iter().map(|&(i, _)| a[[i, var]]).collect();
        let ys: Vec<f64> = path.iter().map(|&(_, j)| b[[j, var]]).collect();
        let sx = xs.iter().population_std_dev();
        let sy = ys.iter().population_std_dev();
        if !(sx >= ZERO_STD_TOL && sy >= ZERO_STD_TOL) {
            continue;
        }
        let cov = xs.iter().population_covariance(ys.iter());
        let r = (cov / (sx * sy)).clamp(-1.0, 1.0);
        score = Some(score.map_or(r, |s| s.min(r)));
    }
    score.unwrap_or(1.0)
}
