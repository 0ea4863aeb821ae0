//! The `infer` entry point.
//!
//! Purpose
//! -------
//! Run every stage on a set of trajectories and assemble the resulting
//! [`Automaton`]:
//! concatenation → derivative estimation → segmentation → clustering →
//! flow regression → invariants → transitions.
//!
//! Invariants & assumptions
//! ------------------------
//! - All validation (options, variable names, annotations, trajectory
//!   shapes) happens before any numerical work.
//! - The sample matrix is built once and only read afterwards; stages pass
//!   spans and row indices, never copies of trajectories.
//! - No randomness other than the seeded guard grid search, so a run is
//!   reproducible bit for bit.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    clustering::{cluster_segments, fit_flows, ClusteringConfig, ModePartition},
    inference::{
        automaton::{Automaton, Mode},
        errors::{InferenceError, InferenceResult},
        invariant::compute_invariants,
        options::InferenceOptions,
    },
    polynomial::Polynomial,
    segmentation::{segment_trajectories, DerivativeTable, SegmenterConfig, Segmentation},
    trajectory::{SampleArena, Trajectory},
    transition::{infer_transitions, Annotation, TransitionConfig},
    utils::first_duplicate,
};

/// Infer a polynomial hybrid automaton from sampled trajectories.
///
/// Parameters
/// ----------
/// - `trajectories`: `(times, values)` pairs sharing one sample step; the
///   columns of `values` are the input variables followed by the outputs.
/// - `input_variables`: names of the exogenous columns; may be empty.
/// - `output_variables`: names of the state columns whose dynamics are
///   learned; must not be empty.
/// - `options`: run configuration, see [`InferenceOptions`].
///
/// Returns
/// -------
/// The automaton, with every polynomial expressed over inputs followed by
/// outputs.
///
/// Errors
/// ------
/// - Option errors from [`InferenceOptions::validate`].
/// - `NoVariables`, `DuplicateVariable` for bad variable declarations.
/// - `UnknownAnnotationVariable` when an annotation names an undeclared
///   variable.
/// - Trajectory validation errors from [`SampleArena::from_trajectories`].
/// - `TrajectoryTooShort`, `NoSmoothSamples`, `NoSegments` from segmentation.
/// - `RegressionFailed`, `GuardFitFailed`, `Polynomial` from the fits.
pub fn infer(
    trajectories: &[Trajectory], input_variables: &[String], output_variables: &[String],
    options: &InferenceOptions,
) -> InferenceResult<Automaton> {
    options.validate()?;
    if output_variables.is_empty() {
        return Err(InferenceError::NoVariables);
    }
    let variables: Vec<String> = input_variables.iter().chain(output_variables).cloned().collect();
    if let Some(name) = first_duplicate(&variables) {
        return Err(InferenceError::DuplicateVariable { name: name.to_string() });
    }
    let annotations = annotation_table(&options.annotations, input_variables, &variables)?;

    let arena = SampleArena::from_trajectories(trajectories, input_variables.len(), output_variables.len())?;
    info!(
        trajectories = arena.spans().len(),
        samples = arena.len(),
        step = arena.step(),
        "trajectories concatenated"
    );

    let table = DerivativeTable::compute(&arena, options.multistep_order, options.ode_degree)?;
    let segmenter = SegmenterConfig {
        coarse_tol: options.coarse_tol,
        fine_tol: options.fine_tol,
        filter_last_segment: options.filter_last_segment,
    };
    let segmentation = segment_trajectories(&arena, &table, &segmenter)?;
    info!(segments = segmentation.len(), "segmentation done");

    let clustering = ClusteringConfig {
        distance_threshold: options.active_distance_threshold(),
        correlation_threshold: options.clustering_correlation_threshold,
        dtw_radius: options.dtw_radius,
    };
    let partition = cluster_segments(&arena, &segmentation, &clustering);
    info!(modes = partition.len(), "clustering done");

    let flows = fit_flows(&table, &segmentation, &partition, options.ode_speedup_cap)?;
    let invariants = compute_invariants(&arena, &segmentation, &partition, &variables, options.compute_invariant);
    let modes = flows
        .iter()
        .zip(invariants)
        .enumerate()
        .map(|(id, (coefficients, invariant))| {
            let flow = output_variables
                .iter()
                .zip(coefficients.columns())
                .map(|(name, column)| {
                    let rhs = Polynomial::from_basis(variables.clone(), options.ode_degree, &column.to_vec())?;
                    Ok((name.clone(), rhs))
                })
                .collect::<InferenceResult<Vec<_>>>()?;
            Ok(Mode { id, invariant, flow })
        })
        .collect::<InferenceResult<Vec<_>>>()?;

    let transition_config = TransitionConfig { guard_degree: options.guard_degree, guard_seed: options.guard_seed };
    let transitions = infer_transitions(
        &arena,
        &segmentation,
        &partition,
        &variables,
        output_variables,
        &annotations,
        &transition_config,
    )?;
    info!(modes = modes.len(), transitions = transitions.len(), "automaton assembled");

    Ok(Automaton {
        initial_mode: initial_mode(&segmentation, &partition),
        modes,
        transitions,
        input_variables: input_variables.to_vec(),
        output_variables: output_variables.to_vec(),
    })
}

/// Re-key annotations by column index; annotations on inputs are dropped.
fn annotation_table(
    annotations: &BTreeMap<String, Annotation>, input_variables: &[String], variables: &[String],
) -> InferenceResult<BTreeMap<usize, Annotation>> {
    let mut table = BTreeMap::new();
    for (name, annotation) in annotations {
        let col = variables
            .iter()
            .position(|v| v == name)
            .ok_or_else(|| InferenceError::UnknownAnnotationVariable { name: name.clone() })?;
        if col < input_variables.len() {
            warn!(variable = %name, "annotation on an input variable ignored");
            continue;
        }
        table.insert(col, annotation.clone());
    }
    Ok(table)
}

/// Mode of the earliest segment.
fn initial_mode(segmentation: &Segmentation, partition: &ModePartition) -> usize {
    segmentation
        .segments()
        .iter()
        .enumerate()
        .min_by_key(|(_, segment)| segment.exact.start)
        .map_or(0, |(id, _)| partition.mode_of(id))
}
