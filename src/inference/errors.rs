//! Unified error handling for the inference pipeline.
//!
//! This module defines `InferenceError`, the error type returned by
//! [`crate::inference::infer`] and every pipeline stage. It groups
//! configuration mistakes, malformed trajectories, annotation problems and
//! stage failures, and wraps the lower-level polynomial and solver errors so
//! stages can propagate with `?`. An alias `InferenceResult<T>` standardizes
//! the return type.

use crate::{optimization::errors::OptError, polynomial::errors::PolynomialError};

/// Unified error type for hybrid-automaton inference.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Options ----
    /// Multistep order must be in `2..=6`.
    InvalidStepOrder {
        order: usize,
    },

    /// Polynomial degrees must be at least 1.
    InvalidDegree {
        name: &'static str,
        degree: u32,
    },

    /// Segmentation tolerances must be positive and finite.
    InvalidTolerance {
        name: &'static str,
        value: f64,
    },

    /// Clustering thresholds out of range.
    InvalidThreshold {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The ODE speedup cap must be at least 1.
    InvalidOdeSpeedup,

    /// The DTW band radius must be at least 1.
    InvalidDtwRadius,

    // ---- Trajectories ----
    /// No trajectories were supplied.
    EmptyTrajectories,

    /// No output variables were declared.
    NoVariables,

    /// A variable name occurs twice across inputs and outputs.
    DuplicateVariable {
        name: String,
    },

    /// A trajectory has fewer samples than the derivative stencil needs.
    TrajectoryTooShort {
        trajectory: usize,
        samples: usize,
        needed: usize,
    },

    /// Time vector and value matrix disagree in length.
    TimeLengthMismatch {
        trajectory: usize,
        times: usize,
        rows: usize,
    },

    /// Column count differs from the declared variable count.
    DimensionMismatch {
        trajectory: usize,
        expected: usize,
        found: usize,
    },

    /// A trajectory's step size differs from the first trajectory's.
    StepSizeMismatch {
        trajectory: usize,
        expected: f64,
        found: f64,
    },

    /// The first two time stamps are not strictly increasing.
    NonUniformStep {
        trajectory: usize,
        step: f64,
    },

    /// A sample is NaN or infinite.
    NonFiniteSample {
        trajectory: usize,
        row: usize,
        col: usize,
    },

    /// No row of a trajectory has agreeing backward and forward derivative
    /// estimates, so it yields no segment.
    NoSmoothSamples {
        trajectory: usize,
    },

    // ---- Annotations ----
    /// Annotation names a variable that is not declared.
    UnknownAnnotationVariable {
        name: String,
    },

    /// Annotation is malformed (e.g. an empty pool).
    InvalidAnnotation {
        text: String,
        reason: &'static str,
    },

    // ---- Pipeline stages ----
    /// Segmentation produced no segments.
    NoSegments,

    /// A regression stage failed.
    RegressionFailed {
        stage: &'static str,
        source: OptError,
    },

    /// Guard classifier training failed for a connection.
    GuardFitFailed {
        src: usize,
        dst: usize,
        source: OptError,
    },

    // ---- Wrapped ----
    Polynomial(PolynomialError),
    Optimization(OptError),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl From<PolynomialError> for InferenceError {
    fn from(err: PolynomialError) -> Self {
        InferenceError::Polynomial(err)
    }
}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::Optimization(err)
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferenceError::RegressionFailed { source, .. } | InferenceError::GuardFitFailed { source, .. } => {
                Some(source)
            }
            InferenceError::Polynomial(err) => Some(err),
            InferenceError::Optimization(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Options ----
            InferenceError::InvalidStepOrder { order } => {
                write!(f, "Inference Error: multistep order {} not in 2..=6", order)
            }
            InferenceError::InvalidDegree { name, degree } => {
                write!(f, "Inference Error: {} = {} must be at least 1", name, degree)
            }
            InferenceError::InvalidTolerance { name, value } => {
                write!(f, "Inference Error: {} = {} must be positive and finite", name, value)
            }
            InferenceError::InvalidThreshold { name, value, reason } => {
                write!(f, "Inference Error: {} = {}: {}", name, value, reason)
            }
            InferenceError::InvalidOdeSpeedup => {
                write!(f, "Inference Error: ode_speedup_cap must be at least 1")
            }
            InferenceError::InvalidDtwRadius => {
                write!(f, "Inference Error: dtw_radius must be at least 1")
            }

            // ---- Trajectories ----
            InferenceError::EmptyTrajectories => write!(f, "Inference Error: no trajectories supplied"),
            InferenceError::NoVariables => write!(f, "Inference Error: no output variables declared"),
            InferenceError::DuplicateVariable { name } => {
                write!(f, "Inference Error: variable '{}' declared more than once", name)
            }
            InferenceError::TrajectoryTooShort { trajectory, samples, needed } => write!(
                f,
                "Inference Error: trajectory {} has {} samples, needs at least {}",
                trajectory, samples, needed
            ),
            InferenceError::TimeLengthMismatch { trajectory, times, rows } => write!(
                f,
                "Inference Error: trajectory {} has {} time stamps but {} sample rows",
                trajectory, times, rows
            ),
            InferenceError::DimensionMismatch { trajectory, expected, found } => write!(
                f,
                "Inference Error: trajectory {} has {} columns, expected {}",
                trajectory, found, expected
            ),
            InferenceError::StepSizeMismatch { trajectory, expected, found } => write!(
                f,
                "Inference Error: trajectory {} has step size {}, expected {}",
                trajectory, found, expected
            ),
            InferenceError::NonUniformStep { trajectory, step } => write!(
                f,
                "Inference Error: trajectory {} has non-positive step size {}",
                trajectory, step
            ),
            InferenceError::NonFiniteSample { trajectory, row, col } => write!(
                f,
                "Inference Error: trajectory {} has a non-finite sample at ({}, {})",
                trajectory, row, col
            ),
            InferenceError::NoSmoothSamples { trajectory } => write!(
                f,
                "Inference Error: trajectory {} has no sample where derivative estimates agree",
                trajectory
            ),

            // ---- Annotations ----
            InferenceError::UnknownAnnotationVariable { name } => {
                write!(f, "Inference Error: annotation for unknown variable '{}'", name)
            }
            InferenceError::InvalidAnnotation { text, reason } => {
                write!(f, "Inference Error: invalid annotation '{}': {}", text, reason)
            }

            // ---- Pipeline stages ----
            InferenceError::NoSegments => write!(f, "Inference Error: segmentation produced no segments"),
            InferenceError::RegressionFailed { stage, source } => {
                write!(f, "Inference Error: {} regression failed: {}", stage, source)
            }
            InferenceError::GuardFitFailed { src, dst, source } => write!(
                f,
                "Inference Error: guard for transition {} -> {} failed: {}",
                src, dst, source
            ),

            // ---- Wrapped ----
            InferenceError::Polynomial(err) => write!(f, "{}", err),
            InferenceError::Optimization(err) => write!(f, "{}", err),
        }
    }
}
