//! Polynomial kernel for the support vector classifier.
//!
//! `K(u, v) = (γ · ⟨u, v⟩ + coef0)^degree`. The same three parameters are
//! later used to expand a trained classifier back into an explicit
//! polynomial, so they are kept together in one validated value.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::optimization::errors::{OptError, OptResult};

/// Inhomogeneous polynomial kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialKernel {
    pub degree: u32,
    pub gamma: f64,
    pub coef0: f64,
}

impl PolynomialKernel {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `InvalidKernelParameter` when `degree == 0`, `gamma` is not
    ///   positive and finite, or `coef0` is negative or non-finite.
    pub fn new(degree: u32, gamma: f64, coef0: f64) -> OptResult<Self> {
        if degree == 0 {
            return Err(OptError::InvalidKernelParameter {
                name: "degree",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(OptError::InvalidKernelParameter {
                name: "gamma",
                value: gamma,
                reason: "must be positive and finite",
            });
        }
        if !coef0.is_finite() || coef0 < 0.0 {
            return Err(OptError::InvalidKernelParameter {
                name: "coef0",
                value: coef0,
                reason: "must be non-negative and finite",
            });
        }
        Ok(PolynomialKernel { degree, gamma, coef0 })
    }

    /// Kernel value for a pair of points.
    pub fn evaluate(&self, u: ArrayView1<f64>, v: ArrayView1<f64>) -> f64 {
        (self.gamma * u.dot(&v) + self.coef0).powi(self.degree as i32)
    }

    /// Full Gram matrix `K[i, j] = K(x_i, x_j)`.
    pub fn gram(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let n = x.nrows();
        let mut k = Array2::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                let value = self.evaluate(x.row(i), x.row(j));
                k[[i, j]] = value;
                k[[j, i]] = value;
            }
        }
        k
    }
}
