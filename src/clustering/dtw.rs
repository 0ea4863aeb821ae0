//! Banded dynamic time warping between two multivariate sequences.
//!
//! Purpose
//! -------
//! Align two segment signals of possibly different lengths and report the
//! accumulated Euclidean cost together with the warping path, so the caller
//! can normalize the distance and correlate the aligned samples.
//!
//! Key behaviors
//! -------------
//! - Cells are restricted to a band around the length-scaled diagonal of
//!   half-width `radius + ⌈slope⌉`; the band always contains a monotone
//!   path from `(0, 0)` to `(n−1, m−1)`.
//! - Only the band is stored, row by row, so memory is `O(n · band)`.
//! - The path is recovered by backtracking, preferring the diagonal step on
//!   ties.

use ndarray::ArrayView2;

/// Warping result.
#[derive(Debug, Clone, PartialEq)]
pub struct DtwAlignment {
    /// Accumulated cost along the optimal path.
    pub cost: f64,
    /// Aligned index pairs `(i, j)`, from `(0, 0)` to `(n−1, m−1)`.
    pub path: Vec<(usize, usize)>,
}

impl DtwAlignment {
    /// Cost divided by the summed sequence lengths.
    pub fn normalized_cost(&self, n: usize, m: usize) -> f64 {
        if n + m == 0 {
            0.0
        } else {
            self.cost / (n + m) as f64
        }
    }
}

struct Band {
    lo: Vec<usize>,
    hi: Vec<usize>,
    acc: Vec<Vec<f64>>,
}

impl Band {
    fn get(&self, i: usize, j: usize) -> f64 {
        if j < self.lo[i] || j > self.hi[i] {
            f64::INFINITY
        } else {
            self.acc[i][j - self.lo[i]]
        }
    }
}

/// Align rows of `a` with rows of `b`.
///
/// Parameters
/// ----------
/// - `a`, `b`: sequences with one point per row and equal column counts.
/// - `radius`: extra half-width of the band beyond the diagonal slope.
///
/// Returns
/// -------
/// A [`DtwAlignment`]; empty inputs give zero cost and an empty path.
pub fn dtw(a: ArrayView2<f64>, b: ArrayView2<f64>, radius: usize) -> DtwAlignment {
    let n = a.nrows();
    let m = b.nrows();
    if n == 0 || m == 0 {
        return DtwAlignment { cost: 0.0, path: Vec::new() };
    }

    let slope = if n > 1 { (m - 1) as f64 / (n - 1) as f64 } else { m as f64 };
    let width = radius + slope.ceil() as usize;
    let mut lo = Vec::with_capacity(n);
    let mut hi = Vec::with_capacity(n);
    for i in 0..n {
        let centre = if n > 1 { (i as f64 * slope).round() as usize } else { 0 };
        lo.push(if i == 0 { 0 } else { centre.saturating_sub(width) });
        hi.push(if i == n - 1 { m - 1 } else { (centre + width).min(m - 1) });
    }

    let mut band = Band { lo, hi, acc: Vec::with_capacity(n) };
    for i in 0..n {
        let (row_lo, row_hi) = (band.lo[i], band.hi[i]);
        let mut row = vec![f64::INFINITY; row_hi - row_lo + 1];
        for j in row_lo..=row_hi {
            let cost = euclidean(a.row(i), b.row(j));
            let best = if i == 0 && j == 0 {
                0.0
            } else {
                let up = if i > 0 { band.get(i - 1, j) } else { f64::INFINITY };
                let diag = if i > 0 && j > 0 { band.get(i - 1, j - 1) } else { f64::INFINITY };
                let left = if j > row_lo { row[j - 1 - row_lo] } else { f64::INFINITY };
                diag.min(up).min(left)
            };
            row[j - row_lo] = cost + best;
        }
        band.acc.push(row);
    }

    let cost = band.get(n - 1, m - 1);
    let path = backtrack(&band, n, m);
    DtwAlignment { cost, path }
}

fn backtrack(band: &Band, n: usize, m: usize) -> Vec<(usize, usize)> {
    let (mut i, mut j) = (n - 1, m - 1);
    let mut path = vec![(i, j)];
    while i > 0 || j > 0 {
        let diag = if i > 0 && j > 0 { band.get(i - 1, j - 1) } else { f64::INFINITY };
        let up = if i > 0 { band.get(i - 1, j) } else { f64::INFINITY };
        let left = if j > 0 { band.get(i, j - 1) } else { f64::INFINITY };
        if diag <= up && diag <= left {
            i -= 1;
            j -= 1;
        } else if up <= left {
            i -= 1;
        } else {
            j -= 1;
        }
        path.push((i, j));
    }
    path.reverse();
    path
}

fn euclidean(u: ndarray::ArrayView1<f64>, v: ndarray::ArrayView1<f64>) -> f64 {
    u.iter().zip(v.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}
