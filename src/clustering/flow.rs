//! Per-mode flow regression.
//!
//! Each mode's flow is the intercept-free least-squares fit of the backward
//! derivative estimates of the output variables onto the polynomial
//! features of the full state, stacked over the ODE ranges of the mode's
//! first `cap` member segments. The constant monomial is part of the
//! feature basis, so the fit still carries an offset term.

use ndarray::{Array2, Axis};
use tracing::debug;

use crate::{
    clustering::agglomerate::ModePartition,
    inference::errors::{InferenceError, InferenceResult},
    optimization::least_squares::solve_least_squares,
    segmentation::{DerivativeTable, Segmentation},
};

/// Fit one coefficient matrix per mode.
///
/// Parameters
/// ----------
/// - `table`: features and derivative estimates, indexed by sample row.
/// - `segmentation`: segments referenced by `partition`.
/// - `partition`: mode membership.
/// - `cap`: maximal number of member segments stacked into one design.
///
/// Returns
/// -------
/// For mode `k`, a `|basis| × n_outputs` matrix whose column `j` holds the
/// coefficients of output `j`'s derivative in feature-basis order.
///
/// Errors
/// ------
/// - `RegressionFailed { stage: "flow", .. }` when the solver rejects the
///   stacked system.
pub fn fit_flows(
    table: &DerivativeTable, segmentation: &Segmentation, partition: &ModePartition, cap: usize,
) -> InferenceResult<Vec<Array2<f64>>> {
    partition
        .modes()
        .iter()
        .enumerate()
        .map(|(mode, members)| {
            let rows: Vec<usize> =
                members.iter().take(cap).flat_map(|&id| segmentation.segment(id).ode.rows()).collect();
            let design = table.features().select(Axis(0), &shifted(&rows, table.order()));
            let n_outputs = rows.first().map_or(0, |&row| table.backward_outputs_at(row).len());
            let targets =
                Array2::from_shape_fn((rows.len(), n_outputs), |(r, k)| table.backward_outputs_at(rows[r])[k]);
            let coefficients = solve_least_squares(design.view(), targets.view())
                .map_err(|source| InferenceError::RegressionFailed { stage: "flow", source })?;
            debug!(mode, samples = rows.len(), segments = members.len().min(cap), "flow fitted");
            Ok(coefficients)
        })
        .collect()
}

fn shifted(rows: &[usize], order: usize) -> Vec<usize> {
    rows.iter().map(|&r| r - order).collect()
}
