//! Bounding-box invariants of modes.
//!
//! Purpose
//! -------
//! Describe, per mode, the region of state space the mode was observed in:
//! for each variable the minimum and maximum over every sample of every
//! member segment's exact range.
//!
//! Conventions
//! -----------
//! - An [`Invariant`] without ranges means "unconstrained"; it is what every
//!   mode gets when invariant computation is switched off, and it contains
//!   every point.

use std::fmt;

use crate::{clustering::ModePartition, segmentation::Segmentation, trajectory::SampleArena};

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.min, self.max)
    }
}

/// Per-variable ranges, in variable order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Invariant {
    ranges: Vec<(String, Range)>,
}

impl Invariant {
    pub fn new(ranges: Vec<(String, Range)>) -> Self {
        Invariant { ranges }
    }

    /// The invariant without constraints.
    pub fn unconstrained() -> Self {
        Invariant::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(String, Range)] {
        &self.ranges
    }

    /// Range of the variable called `name`.
    pub fn range(&self, name: &str) -> Option<&Range> {
        self.ranges.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Whether `point`, ordered like the ranges, satisfies every bound.
    pub fn contains(&self, point: &[f64]) -> bool {
        self.ranges.iter().zip(point).all(|((_, range), &value)| range.contains(value))
    }
}

/// Bounding boxes of every mode over its members' exact ranges.
///
/// Parameters
/// ----------
/// - `variables`: names of all variables in column order.
/// - `enabled`: when `false`, every mode gets [`Invariant::unconstrained`].
pub fn compute_invariants(
    arena: &SampleArena, segmentation: &Segmentation, partition: &ModePartition, variables: &[String], enabled: bool,
) -> Vec<Invariant> {
    partition
        .modes()
        .iter()
        .map(|members| {
            if !enabled {
                return Invariant::unconstrained();
            }
            let mut bounds = vec![Range { min: f64::INFINITY, max: f64::NEG_INFINITY }; variables.len()];
            for &id in members {
                for row in segmentation.segment(id).exact.rows() {
                    for (bound, &value) in bounds.iter_mut().zip(arena.row(row)) {
                        bound.min = bound.min.min(value);
                        bound.max = bound.max.max(value);
                    }
                }
            }
            Invariant::new(variables.iter().cloned().zip(bounds).collect())
        })
        .collect()
}
