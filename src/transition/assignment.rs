//! Reset maps of transitions.
//!
//! The assignment of a connection is the affine least-squares map from the
//! state at each jump's `end` row to the state at its `start` row, fitted
//! over all variables and then restricted to the output variables. A
//! declared [`Annotation`] replaces the regressed row of its variable.

use std::collections::BTreeMap;

use ndarray::Array1;

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::least_squares::fit_affine,
    polynomial::{monomial::Monomial, Polynomial},
    transition::{annotation::Annotation, connection::Link},
    trajectory::SampleArena,
    utils::gather_rows,
};

/// `x'_v = coefficients · x + intercept` for one assigned variable.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineRow {
    /// One coefficient per variable, in column order.
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

impl AffineRow {
    /// Degree-1 polynomial over `variables` with every basis term present.
    pub fn to_polynomial(&self, variables: &[String]) -> Polynomial {
        let nvars = variables.len();
        let mut poly = Polynomial::zero_basis(variables.to_vec(), 1);
        for (index, &c) in self.coefficients.iter().enumerate() {
            poly.set_term(Monomial::variable(nvars, index), c);
        }
        poly.set_term(Monomial::constant(nvars), self.intercept);
        poly
    }
}

/// Fit the assignment rows of the output variables for one connection.
///
/// Parameters
/// ----------
/// - `arena`: sample matrix.
/// - `links`: the connection's jumps; must be non-empty.
/// - `annotations`: overrides keyed by variable column index.
///
/// Returns
/// -------
/// One [`AffineRow`] per output variable, in output order.
///
/// Errors
/// ------
/// - `RegressionFailed { stage: "assignment", .. }` from the affine fit.
pub fn infer_assignment(
    arena: &SampleArena, links: &[Link], annotations: &BTreeMap<usize, Annotation>,
) -> InferenceResult<Vec<AffineRow>> {
    let ends: Vec<usize> = links.iter().map(|l| l.end).collect();
    let starts: Vec<usize> = links.iter().map(|l| l.start).collect();
    let sources = gather_rows(arena.values(), &ends);
    let targets = gather_rows(arena.values(), &starts);
    let fit = fit_affine(sources.view(), targets.view())
        .map_err(|source| InferenceError::RegressionFailed { stage: "assignment", source })?;

    let rows = (arena.n_inputs()..arena.n_vars())
        .map(|col| {
            let mut row = AffineRow { coefficients: fit.slopes.column(col).to_owned(), intercept: fit.intercept[col] };
            if let Some(annotation) = annotations.get(&col) {
                annotation.apply(col, targets.column(col), &mut row);
            }
            row
        })
        .collect();
    Ok(rows)
}
