//! C-support vector classification solved by sequential minimal optimization.
//!
//! Purpose
//! -------
//! Train a binary soft-margin classifier with a polynomial kernel and expose
//! the quantities needed to turn it back into an explicit polynomial:
//! support vectors, signed dual coefficients `α_i·y_i`, and the offset `ρ`.
//!
//! Key behaviors
//! -------------
//! - Solves the dual
//!   `min ½ αᵀQα − 1ᵀα  s.t.  yᵀα = 0, 0 ≤ α ≤ C`, `Q_ij = y_i y_j K(x_i, x_j)`
//!   with second-order working-set selection and analytic pair updates.
//! - Stops when the maximal KKT violation drops below `tolerance` or after
//!   `max_iter` iterations (logged at `warn` level; the current iterate is
//!   kept).
//! - Decision function `f(x) = Σ_i a_i K(sv_i, x) − ρ`; `f(x) > 0` predicts
//!   `+1`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Labels are exactly `+1.0` / `-1.0` and both classes are present.
//! - The Gram matrix is computed once; intended for the small sample sizes
//!   produced by transition links.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::warn;

use crate::optimization::{
    errors::{OptError, OptResult},
    numerical_stability::{SMO_STOP_TOL, SMO_TAU},
    svm::kernel::PolynomialKernel,
};

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvcOptions {
    /// Penalty `C > 0`.
    pub penalty: f64,
    pub kernel: PolynomialKernel,
    /// KKT violation tolerance.
    pub tolerance: f64,
    /// Iteration cap; `None` uses `max(100_000, 100·n)`.
    pub max_iter: Option<usize>,
}

impl SvcOptions {
    /// Options with the default tolerance and iteration cap.
    ///
    /// Errors
    /// ------
    /// - `InvalidPenalty` when `penalty` is not positive and finite.
    pub fn new(penalty: f64, kernel: PolynomialKernel) -> OptResult<Self> {
        let opts = SvcOptions { penalty, kernel, tolerance: SMO_STOP_TOL, max_iter: None };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> OptResult<()> {
        if !self.penalty.is_finite() || self.penalty <= 0.0 {
            return Err(OptError::InvalidPenalty { value: self.penalty, reason: "must be positive and finite" });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(OptError::InvalidTolerance {
                value: self.tolerance,
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Trained classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SvcModel {
    support_vectors: Array2<f64>,
    dual_coefficients: Array1<f64>,
    rho: f64,
    kernel: PolynomialKernel,
    iterations: usize,
    converged: bool,
}

impl SvcModel {
    /// Rows are the support vectors, in training order.
    pub fn support_vectors(&self) -> ArrayView2<'_, f64> {
        self.support_vectors.view()
    }

    /// Signed dual coefficients `α_i·y_i`, aligned with `support_vectors`.
    pub fn dual_coefficients(&self) -> ArrayView1<'_, f64> {
        self.dual_coefficients.view()
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn kernel(&self) -> PolynomialKernel {
        self.kernel
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// `Σ a_i K(sv_i, x) − ρ`.
    pub fn decision_value(&self, x: ArrayView1<f64>) -> f64 {
        self.support_vectors
            .rows()
            .into_iter()
            .zip(self.dual_coefficients.iter())
            .map(|(sv, a)| a * self.kernel.evaluate(sv, x))
            .sum::<f64>()
            - self.rho
    }

    /// Predicted label, `+1.0` or `-1.0`.
    pub fn predict(&self, x: ArrayView1<f64>) -> f64 {
        if self.decision_value(x) > 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Fraction of rows whose predicted label matches `labels`.
    pub fn accuracy(&self, features: ArrayView2<f64>, labels: &[f64]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let hits = features.rows().into_iter().zip(labels).filter(|(x, y)| self.predict(x.view()) == **y).count();
        hits as f64 / labels.len() as f64
    }
}

/// Train a C-SVC on `features` (rows are samples) and `labels` (±1).
///
/// Errors
/// ------
/// - `LabelCountMismatch`, `InvalidLabel`, `SingleClass` for malformed data.
/// - Any option validation error.
pub fn fit_svc(features: ArrayView2<f64>, labels: &[f64], options: &SvcOptions) -> OptResult<SvcModel> {
    options.validate()?;
    validate_labels(features, labels)?;

    let n = labels.len();
    let c = options.penalty;
    let y = labels;
    let k = options.kernel.gram(features);
    let q = |i: usize, j: usize| y[i] * y[j] * k[[i, j]];

    let mut alpha = vec![0.0_f64; n];
    let mut grad = vec![-1.0_f64; n];
    let max_iter = options.max_iter.unwrap_or_else(|| (100 * n).max(100_000));
    let is_upper = |a: f64| a >= c;
    let is_lower = |a: f64| a <= 0.0;

    let mut iterations = 0;
    let mut converged = false;
    while iterations < max_iter {
        // Working set: i maximizes the violation, j maximizes the second-order gain.
        let mut g_max = f64::NEG_INFINITY;
        let mut i_sel = None;
        for t in 0..n {
            let candidate = if y[t] > 0.0 {
                (!is_upper(alpha[t])).then(|| -grad[t])
            } else {
                (!is_lower(alpha[t])).then(|| grad[t])
            };
            if let Some(v) = candidate {
                if v >= g_max {
                    g_max = v;
                    i_sel = Some(t);
                }
            }
        }

        let mut g_max2 = f64::NEG_INFINITY;
        let mut j_sel = None;
        let mut obj_diff_min = f64::INFINITY;
        if let Some(i) = i_sel {
            for t in 0..n {
                let (grad_diff, curvature) = if y[t] > 0.0 {
                    if is_lower(alpha[t]) {
                        continue;
                    }
                    g_max2 = g_max2.max(grad[t]);
                    (g_max + grad[t], k[[i, i]] + k[[t, t]] - 2.0 * y[i] * q(i, t))
                } else {
                    if is_upper(alpha[t]) {
                        continue;
                    }
                    g_max2 = g_max2.max(-grad[t]);
                    (g_max - grad[t], k[[i, i]] + k[[t, t]] + 2.0 * y[i] * q(i, t))
                };
                if grad_diff > 0.0 {
                    let denom = if curvature > 0.0 { curvature } else { SMO_TAU };
                    let obj_diff = -(grad_diff * grad_diff) / denom;
                    if obj_diff <= obj_diff_min {
                        obj_diff_min = obj_diff;
                        j_sel = Some(t);
                    }
                }
            }
        }

        let (i, j) = match (i_sel, j_sel) {
            (Some(i), Some(j)) if g_max + g_max2 >= options.tolerance => (i, j),
            _ => {
                converged = true;
                break;
            }
        };
        iterations += 1;

        let (old_ai, old_aj) = (alpha[i], alpha[j]);
        if y[i] != y[j] {
            let curvature = positive_or_tau(k[[i, i]] + k[[j, j]] + 2.0 * q(i, j));
            let delta = (-grad[i] - grad[j]) / curvature;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;
            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let curvature = positive_or_tau(k[[i, i]] + k[[j, j]] - 2.0 * q(i, j));
            let delta = (grad[i] - grad[j]) / curvature;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;
            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }

        let (d_ai, d_aj) = (alpha[i] - old_ai, alpha[j] - old_aj);
        for t in 0..n {
            grad[t] += q(i, t) * d_ai + q(j, t) * d_aj;
        }
    }

    if !converged {
        warn!(iterations, "SMO reached the iteration cap before meeting the KKT tolerance");
    }

    let rho = compute_rho(&alpha, &grad, y, c);
    let sv_index: Vec<usize> = (0..n).filter(|&t| alpha[t] > 0.0).collect();
    let mut support_vectors = Array2::zeros((sv_index.len(), features.ncols()));
    for (row, &t) in sv_index.iter().enumerate() {
        support_vectors.row_mut(row).assign(&features.row(t));
    }
    let dual_coefficients = sv_index.iter().map(|&t| alpha[t] * y[t]).collect();

    Ok(SvcModel { support_vectors, dual_coefficients, rho, kernel: options.kernel, iterations, converged })
}

fn positive_or_tau(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        SMO_TAU
    }
}

/// Offset from free variables, or the midpoint of the feasible interval when
/// every multiplier sits at a bound.
fn compute_rho(alpha: &[f64], grad: &[f64], y: &[f64], c: f64) -> f64 {
    let mut upper = f64::INFINITY;
    let mut lower = f64::NEG_INFINITY;
    let mut free_sum = 0.0;
    let mut free_count = 0usize;
    for t in 0..alpha.len() {
        let yg = y[t] * grad[t];
        if alpha[t] >= c {
            if y[t] < 0.0 {
                upper = upper.min(yg);
            } else {
                lower = lower.max(yg);
            }
        } else if alpha[t] <= 0.0 {
            if y[t] > 0.0 {
                upper = upper.min(yg);
            } else {
                lower = lower.max(yg);
            }
        } else {
            free_count += 1;
            free_sum += yg;
        }
    }
    if free_count > 0 {
        free_sum / free_count as f64
    } else {
        (upper + lower) / 2.0
    }
}

fn validate_labels(features: ArrayView2<f64>, labels: &[f64]) -> OptResult<()> {
    if features.nrows() != labels.len() {
        return Err(OptError::LabelCountMismatch { rows: features.nrows(), labels: labels.len() });
    }
    if let Some((index, &value)) = labels.iter().enumerate().find(|(_, &v)| v != 1.0 && v != -1.0) {
        return Err(OptError::InvalidLabel { index, value });
    }
    let positives = labels.iter().filter(|&&v| v > 0.0).count();
    if positives == 0 || positives == labels.len() {
        return Err(OptError::SingleClass);
    }
    Ok(())
}
