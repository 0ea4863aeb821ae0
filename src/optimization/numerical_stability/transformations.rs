//! Feature rescaling for well-conditioned kernel training.
//!
//! Provides a per-column min-max map `z = s·x + o` onto `[0, 1]` and keeps
//! `s` and `o` so that a polynomial learned in `z` can be rewritten in the
//! original coordinates by exact substitution.
//!
//! # Provided items
//! - [`MinMaxScaling::fit`]: derive `s = 1 / (max − min)` and
//!   `o = −min / (max − min)` per column.
//! - [`MinMaxScaling::transform`]: apply the map to a matrix.
//!
//! # Degenerate columns
//! A column with zero range maps to the constant `0` (`s = o = 0`), so the
//! variable drops out of anything learned on the scaled data.

use ndarray::{Array2, ArrayView2};

/// Per-column affine map onto `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaling {
    scale: Vec<f64>,
    offset: Vec<f64>,
}

impl MinMaxScaling {
    /// Fit on the rows of `x`.
    ///
    /// # Parameters
    /// - `x`: samples as rows; an empty matrix yields an all-zero map.
    pub fn fit(x: ArrayView2<f64>) -> Self {
        let mut scale = Vec::with_capacity(x.ncols());
        let mut offset = Vec::with_capacity(x.ncols());
        for column in x.columns() {
            let lo = column.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = hi - lo;
            if range.is_finite() && range > 0.0 {
                scale.push(1.0 / range);
                offset.push(-lo / range);
            } else {
                scale.push(0.0);
                offset.push(0.0);
            }
        }
        MinMaxScaling { scale, offset }
    }

    /// `s_i` per column.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// `o_i` per column.
    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    /// Apply `z = s·x + o` column-wise.
    pub fn transform(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let mut out = x.to_owned();
        for (mut column, (&s, &o)) in out.columns_mut().into_iter().zip(self.scale.iter().zip(&self.offset)) {
            column.mapv_inplace(|v| s * v + o);
        }
        out
    }
}
