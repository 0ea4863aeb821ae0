//! transition — discrete jumps between modes.
//!
//! Purpose
//! -------
//! Turn consecutive segment pairs into transitions: find which modes jump
//! into which, learn where each jump fires (guard) and what it does to the
//! state (assignment).
//!
//! Key behaviors
//! -------------
//! - [`discover_connections`] groups observed jumps by `(src, dst)`.
//! - [`infer_guard`] trains a polynomial-kernel classifier and expands it
//!   into a normalized guard polynomial.
//! - [`infer_assignment`] fits affine reset maps and applies
//!   [`Annotation`] overrides.
//! - [`infer_transitions`] runs all three and numbers the results.
//!
//! Invariants & assumptions
//! ------------------------
//! - One transition per non-empty connection, ids in discovery order.
//! - No transitions at all when there is a single mode and no trajectory
//!   was split.

pub mod annotation;
pub mod assignment;
pub mod connection;
pub mod guard;

use std::collections::BTreeMap;

use tracing::info;

use crate::{
    clustering::ModePartition,
    inference::{automaton::Transition, errors::InferenceResult},
    segmentation::Segmentation,
    trajectory::SampleArena,
};

pub use self::annotation::{parse_annotations, Annotation};
pub use self::assignment::{infer_assignment, AffineRow};
pub use self::connection::{discover_connections, Connection, Link};
pub use self::guard::{infer_guard, GuardModel};

/// Settings of the transition stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub guard_degree: u32,
    pub guard_seed: u64,
}

/// Infer every transition of the automaton.
///
/// Parameters
/// ----------
/// - `variables`: names of all variables, inputs first.
/// - `output_variables`: names of the assigned variables, in output order.
/// - `annotations`: overrides keyed by variable column index.
///
/// Errors
/// ------
/// - `GuardFitFailed`, `RegressionFailed` or `Polynomial` from the
///   per-connection fits.
pub fn infer_transitions(
    arena: &SampleArena, segmentation: &Segmentation, partition: &ModePartition, variables: &[String],
    output_variables: &[String], annotations: &BTreeMap<usize, Annotation>, config: &TransitionConfig,
) -> InferenceResult<Vec<Transition>> {
    if partition.len() == 1 && segmentation.one_segment_per_trajectory() {
        info!("single mode without jumps, no transitions");
        return Ok(Vec::new());
    }

    let connections = discover_connections(segmentation, partition);
    info!(connections = connections.len(), "connections discovered");

    connections
        .iter()
        .enumerate()
        .map(|(id, connection)| {
            let guard = infer_guard(arena, connection, variables, config.guard_degree, config.guard_seed)?;
            let rows = infer_assignment(arena, &connection.links, annotations)?;
            let assignments =
                output_variables.iter().cloned().zip(rows.iter().map(|row| row.to_polynomial(variables))).collect();
            Ok(Transition { id, src: connection.src, dst: connection.dst, guard: guard.polynomial, assignments })
        })
        .collect()
}

pub mod prelude {
    pub use super::annotation::Annotation;
    pub use super::connection::{Connection, Link};
    pub use super::infer_transitions;
}
