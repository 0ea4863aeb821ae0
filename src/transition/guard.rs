//! Guard inference: a polynomial inequality separating pre-jump states from
//! jump states.
//!
//! Purpose
//! -------
//! For one connection, label the sample just before each jump `+1` and the
//! jump sample itself `−1`, train a polynomial-kernel classifier on
//! min-max scaled states, and rewrite its decision function as an explicit
//! polynomial in the original variables.
//!
//! Key behaviors
//! -------------
//! - Hyper-parameters:
//!   - any link whose two samples are near-identical → `C = 1`,
//!     `γ = 1/L`, `coef0 = 1`, no search;
//!   - at most five links → `C = 100`, `γ = 1/L`, `coef0 = 1`;
//!   - otherwise a seeded stratified 5-fold grid search over
//!     `C ∈ {0.1, 1, 10, 100, 1000}`, `coef0 ∈ {0, 1, 0.1}`,
//!     `γ ∈ {0.1, 1/L, 0.01}`.
//! - Expansion: `(γ⟨s, z⟩ + coef0)^b` is expanded with the multinomial
//!   theorem over the `L` variables plus the constant slot, summed over
//!   support vectors with their signed dual coefficients, and `ρ` is
//!   subtracted from the constant term.
//! - The scaled polynomial is mapped back by substituting `z = s·x + o`
//!   and divided by the absolute value of its first coefficient when that
//!   is non-zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - The emitted guard is positive on the source side of the jump and
//!   non-positive at the jump.
//! - Its first coefficient in canonical order is exactly `-1`, `0` or `1`.

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::{
        errors::OptResult,
        numerical_stability::{relative_difference, MinMaxScaling, NEAR_IDENTICAL_TOL},
        svm::{fit_svc, grid_search, PolynomialKernel, SvcCandidate, SvcModel, SvcOptions},
    },
    polynomial::{
        monomial::{exponents_of_degree, multinomial, Monomial},
        Polynomial,
    },
    transition::connection::{Connection, Link},
    trajectory::SampleArena,
};

const PENALTY_GRID: [f64; 5] = [0.1, 1.0, 10.0, 100.0, 1000.0];
const COEF0_GRID: [f64; 3] = [0.0, 1.0, 0.1];
const N_FOLDS: usize = 5;
const DEFAULT_PENALTY: f64 = 100.0;
const NEAR_IDENTICAL_PENALTY: f64 = 1.0;

/// A fitted guard with the classifier settings that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardModel {
    /// `g(x) > 0` before the jump, `g(x) ≤ 0` at it.
    pub polynomial: Polynomial,
    pub penalty: f64,
    pub kernel: PolynomialKernel,
    /// Training accuracy on the scaled samples.
    pub accuracy: f64,
}

/// Fit the guard of one connection.
///
/// Parameters
/// ----------
/// - `arena`: sample matrix; every variable is a guard feature.
/// - `connection`: the jumps to separate; must have at least one link.
/// - `variables`: names of all variables, in column order.
/// - `degree`: kernel and polynomial degree `b ≥ 1`.
/// - `seed`: fold-shuffling seed for the grid search.
///
/// Errors
/// ------
/// - `GuardFitFailed` when the classifier back-end rejects the data or a
///   parameter.
/// - `Polynomial` when mapping back to the original coordinates fails.
pub fn infer_guard(
    arena: &SampleArena, connection: &Connection, variables: &[String], degree: u32, seed: u64,
) -> InferenceResult<GuardModel> {
    let (model, candidate, scaling, accuracy) = train_classifier(arena, &connection.links, degree, seed)
        .map_err(|source| InferenceError::GuardFitFailed { src: connection.src, dst: connection.dst, source })?;
    debug!(
        src = connection.src,
        dst = connection.dst,
        links = connection.links.len(),
        penalty = candidate.penalty,
        gamma = candidate.kernel.gamma,
        coef0 = candidate.kernel.coef0,
        accuracy,
        "guard classifier trained"
    );

    let scaled_guard = expand_decision_function(&model, variables);
    let mut polynomial = scaled_guard.substitute_affine(scaling.scale(), scaling.offset())?;
    normalize_leading(&mut polynomial);

    Ok(GuardModel { polynomial, penalty: candidate.penalty, kernel: candidate.kernel, accuracy })
}

/// Scale the labelled samples, choose hyper-parameters and train.
fn train_classifier(
    arena: &SampleArena, links: &[Link], degree: u32, seed: u64,
) -> OptResult<(SvcModel, SvcCandidate, MinMaxScaling, f64)> {
    let (features, labels) = labelled_samples(arena, links);
    let scaling = MinMaxScaling::fit(features.view());
    let scaled = scaling.transform(features.view());

    let default_gamma = 1.0 / arena.n_vars() as f64;
    let near_identical = links
        .iter()
        .any(|link| relative_difference(arena.row(link.end - 1), arena.row(link.end)) <= NEAR_IDENTICAL_TOL);

    let candidate = if near_identical {
        SvcCandidate { penalty: NEAR_IDENTICAL_PENALTY, kernel: PolynomialKernel::new(degree, default_gamma, 1.0)? }
    } else if links.len() <= N_FOLDS {
        SvcCandidate { penalty: DEFAULT_PENALTY, kernel: PolynomialKernel::new(degree, default_gamma, 1.0)? }
    } else {
        let grid = candidate_grid(degree, default_gamma)?;
        grid_search(scaled.view(), &labels, &grid, N_FOLDS, seed)?.best
    };

    let model = fit_svc(scaled.view(), &labels, &SvcOptions::new(candidate.penalty, candidate.kernel)?)?;
    let accuracy = model.accuracy(scaled.view(), &labels);
    Ok((model, candidate, scaling, accuracy))
}

/// Rows `end − 1` labelled `+1` followed by rows `end` labelled `−1`.
fn labelled_samples(arena: &SampleArena, links: &[Link]) -> (Array2<f64>, Vec<f64>) {
    let n_vars = arena.n_vars();
    let mut features = Array2::zeros((2 * links.len(), n_vars));
    let mut labels = Vec::with_capacity(2 * links.len());
    for (k, link) in links.iter().enumerate() {
        features.row_mut(k).assign(&arena.row(link.end - 1));
        labels.push(1.0);
    }
    for (k, link) in links.iter().enumerate() {
        features.row_mut(links.len() + k).assign(&arena.row(link.end));
        labels.push(-1.0);
    }
    (features, labels)
}

/// Grid in search order: penalty outermost, then `coef0`, then `γ`.
fn candidate_grid(degree: u32, default_gamma: f64) -> OptResult<Vec<SvcCandidate>> {
    let gammas = [0.1, default_gamma, 0.01];
    let mut grid = Vec::with_capacity(PENALTY_GRID.len() * COEF0_GRID.len() * gammas.len());
    for &penalty in &PENALTY_GRID {
        for &coef0 in &COEF0_GRID {
            for &gamma in &gammas {
                grid.push(SvcCandidate { penalty, kernel: PolynomialKernel::new(degree, gamma, coef0)? });
            }
        }
    }
    Ok(grid)
}

/// Decision function of `model` as a polynomial in the scaled variables.
fn expand_decision_function(model: &SvcModel, variables: &[String]) -> Polynomial {
    let kernel = model.kernel();
    let n_vars = variables.len();
    let mut poly = Polynomial::zero_basis(variables.to_vec(), kernel.degree);
    let terms = exponents_of_degree(n_vars + 1, kernel.degree);

    for (sv, &a) in model.support_vectors().rows().into_iter().zip(model.dual_coefficients()) {
        for exponents in &terms {
            let (var_part, constant_part) = exponents.split_at(n_vars);
            let value = a
                * multinomial(exponents)
                * kernel.gamma.powi(var_part.iter().sum::<u32>() as i32)
                * support_power(sv, var_part)
                * kernel.coef0.powi(constant_part[0] as i32);
            poly.add_term(Monomial::new(var_part.to_vec()), value);
        }
    }
    poly.add_term(Monomial::constant(n_vars), -model.rho());
    poly
}

fn support_power(sv: ArrayView1<f64>, exponents: &[u32]) -> f64 {
    sv.iter().zip(exponents).map(|(&z, &e)| z.powi(e as i32)).product()
}

/// Divide by `|c₀|`, `c₀` the first coefficient, unless it is zero.
fn normalize_leading(poly: &mut Polynomial) {
    if let Some(lead) = poly.leading_coefficient() {
        if lead != 0.0 && lead.is_finite() {
            poly.divide(lead.abs());
        }
    }
}
