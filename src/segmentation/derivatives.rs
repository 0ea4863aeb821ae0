//! Multistep derivative estimates and polynomial features.
//!
//! Purpose
//! -------
//! For every interior row `i ∈ [M, N − M)` of the sample matrix, compute
//! the complete polynomial feature vector of the state and two independent
//! derivative estimates: a backward multistep formula over rows
//! `i, i−1, …, i−M` and its mirror image over `i, i+1, …, i+M`.
//!
//! Key behaviors
//! -------------
//! - [`MultistepStencil`] holds the fixed weights for orders 2 through 6;
//!   the forward estimate negates the weights and walks forward in time.
//! - [`DerivativeTable`] stores features and both estimates row-aligned and
//!   is addressed by sample-matrix row, hiding the `M`-row offset.
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimates are computed over the concatenated matrix; callers that need
//!   per-trajectory validity must restrict themselves to rows whose whole
//!   stencil lies inside one trajectory.
//! - Both estimates are exact for polynomial trajectories of degree `≤ M`.
//!
//! Performance
//! -----------
//! - Memory is `(N − 2M) × (|basis| + 2L)` doubles; the feature basis size
//!   grows as `C(L + d, d)`.

use ndarray::{s, Array2, ArrayView1, ArrayView2};

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    polynomial::monomial::{complete_basis, Monomial},
    trajectory::SampleArena,
};

/// Fixed multistep weights for one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultistepStencil {
    order: usize,
    /// Weights for `y[i], y[i−1], …, y[i−M]`.
    weights: &'static [f64],
    /// Divisor applied together with the step size.
    denominator: f64,
}

const ORDER_2: [f64; 3] = [3.0, -4.0, 1.0];
const ORDER_3: [f64; 4] = [11.0, -18.0, 9.0, -2.0];
const ORDER_4: [f64; 5] = [25.0, -48.0, 36.0, -16.0, 3.0];
const ORDER_5: [f64; 6] = [137.0, -300.0, 300.0, -200.0, 75.0, -12.0];
const ORDER_6: [f64; 7] = [147.0, -360.0, 450.0, -400.0, 225.0, -72.0, 10.0];

impl MultistepStencil {
    /// Stencil for order `M`.
    ///
    /// Errors
    /// ------
    /// - `InvalidStepOrder` when `M ∉ 2..=6`.
    pub fn new(order: usize) -> InferenceResult<Self> {
        let (weights, denominator): (&'static [f64], f64) = match order {
            2 => (&ORDER_2, 2.0),
            3 => (&ORDER_3, 6.0),
            4 => (&ORDER_4, 12.0),
            5 => (&ORDER_5, 60.0),
            6 => (&ORDER_6, 60.0),
            _ => return Err(InferenceError::InvalidStepOrder { order }),
        };
        Ok(MultistepStencil { order, weights, denominator })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Backward estimate at `row`; requires `row ≥ M`.
    pub fn backward(&self, values: ArrayView2<f64>, row: usize, step: f64) -> ndarray::Array1<f64> {
        let mut acc = ndarray::Array1::zeros(values.ncols());
        for (k, &w) in self.weights.iter().enumerate() {
            acc.scaled_add(w, &values.row(row - k));
        }
        acc / (self.denominator * step)
    }

    /// Forward estimate at `row`; requires `row + M < N`.
    pub fn forward(&self, values: ArrayView2<f64>, row: usize, step: f64) -> ndarray::Array1<f64> {
        let mut acc = ndarray::Array1::zeros(values.ncols());
        for (k, &w) in self.weights.iter().enumerate() {
            acc.scaled_add(-w, &values.row(row + k));
        }
        acc / (self.denominator * step)
    }
}

/// Row-aligned features and derivative estimates for rows `[M, N − M)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeTable {
    order: usize,
    degree: u32,
    n_inputs: usize,
    basis: Vec<Monomial>,
    features: Array2<f64>,
    backward: Array2<f64>,
    forward: Array2<f64>,
}

impl DerivativeTable {
    /// Compute features and both estimates over the whole arena.
    ///
    /// Parameters
    /// ----------
    /// - `arena`: concatenated samples.
    /// - `order`: multistep order `M ∈ 2..=6`.
    /// - `degree`: total degree `d` of the feature basis.
    ///
    /// Errors
    /// ------
    /// - `InvalidStepOrder` for an unsupported `M`.
    pub fn compute(arena: &SampleArena, order: usize, degree: u32) -> InferenceResult<Self> {
        let stencil = MultistepStencil::new(order)?;
        let values = arena.values();
        let n = arena.len();
        let n_vars = arena.n_vars();
        let valid = n.saturating_sub(2 * order);
        let basis = complete_basis(n_vars, degree);

        let mut features = Array2::zeros((valid, basis.len()));
        let mut backward = Array2::zeros((valid, n_vars));
        let mut forward = Array2::zeros((valid, n_vars));
        let mut point = vec![0.0; n_vars];
        for r in 0..valid {
            let row = r + order;
            for (slot, v) in point.iter_mut().zip(values.row(row)) {
                *slot = *v;
            }
            for (k, m) in basis.iter().enumerate() {
                features[[r, k]] = m.evaluate(&point);
            }
            backward.row_mut(r).assign(&stencil.backward(values, row, arena.step()));
            forward.row_mut(r).assign(&stencil.forward(values, row, arena.step()));
        }

        Ok(DerivativeTable { order, degree, n_inputs: arena.n_inputs(), basis, features, backward, forward })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Monomials labelling the feature columns.
    pub fn basis(&self) -> &[Monomial] {
        &self.basis
    }

    /// Number of rows with both estimates available.
    pub fn valid_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Whether sample row `row` has an entry.
    pub fn covers(&self, row: usize) -> bool {
        row >= self.order && row - self.order < self.valid_rows()
    }

    /// Full feature matrix; row `r` corresponds to sample row `r + M`.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn backward(&self) -> ArrayView2<'_, f64> {
        self.backward.view()
    }

    pub fn forward(&self) -> ArrayView2<'_, f64> {
        self.forward.view()
    }

    /// Feature vector at sample row `row`.
    pub fn features_at(&self, row: usize) -> ArrayView1<'_, f64> {
        self.features.row(row - self.order)
    }

    /// Backward estimate at sample row `row`, all variables.
    pub fn backward_at(&self, row: usize) -> ArrayView1<'_, f64> {
        self.backward.row(row - self.order)
    }

    pub fn forward_at(&self, row: usize) -> ArrayView1<'_, f64> {
        self.forward.row(row - self.order)
    }

    /// Backward estimate at `row`, output variables only.
    pub fn backward_outputs_at(&self, row: usize) -> ArrayView1<'_, f64> {
        self.backward.slice(s![row - self.order, self.n_inputs..])
    }

    /// Forward estimate at `row`, output variables only.
    pub fn forward_outputs_at(&self, row: usize) -> ArrayView1<'_, f64> {
        self.forward.slice(s![row - self.order, self.n_inputs..])
    }
}
