//! Trajectory containers and the concatenated sample arena.
//!
//! Purpose
//! -------
//! Accept the caller's independent trajectories (time vector plus one state
//! row per sample), validate them against each other and the declared
//! variables, and merge them into one row-major sample matrix `Y` with one
//! [`Span`] per source trajectory.
//!
//! Key behaviors
//! -------------
//! - [`SampleArena::from_trajectories`] checks non-emptiness, time/row
//!   agreement, column count, finiteness, and a shared step size
//!   `h = t[1] − t[0]`, then stacks all rows in input order.
//! - Trajectory spans are contiguous and partition the rows of `Y`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Columns are input variables followed by output variables.
//! - Step size is read from the first two samples of each trajectory;
//!   sampling is assumed uniform beyond that.
//! - The arena is never mutated after construction.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::numerical_stability::steps_agree,
    trajectory::span::Span,
};

/// One sampled trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Sample times, one per row of `values`.
    pub times: Array1<f64>,
    /// `n × L` state matrix, inputs then outputs.
    pub values: Array2<f64>,
}

impl Trajectory {
    pub fn new(times: Array1<f64>, values: Array2<f64>) -> Self {
        Trajectory { times, values }
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }
}

/// Concatenated, validated samples of every trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleArena {
    times: Array1<f64>,
    values: Array2<f64>,
    spans: Vec<Span>,
    step: f64,
    n_inputs: usize,
    n_outputs: usize,
}

impl SampleArena {
    /// Validate and concatenate trajectories.
    ///
    /// Parameters
    /// ----------
    /// - `trajectories`: ordered trajectories; order fixes row order.
    /// - `n_inputs`, `n_outputs`: declared variable counts.
    ///
    /// Errors
    /// ------
    /// - `EmptyTrajectories` for an empty list.
    /// - `TimeLengthMismatch`, `DimensionMismatch`, `NonFiniteSample`.
    /// - `TrajectoryTooShort` when a trajectory has fewer than two samples.
    /// - `NonUniformStep` for a non-positive first step.
    /// - `StepSizeMismatch` when steps differ across trajectories.
    pub fn from_trajectories(trajectories: &[Trajectory], n_inputs: usize, n_outputs: usize) -> InferenceResult<Self> {
        if trajectories.is_empty() {
            return Err(InferenceError::EmptyTrajectories);
        }
        let n_vars = n_inputs + n_outputs;
        let mut step: Option<f64> = None;
        for (index, traj) in trajectories.iter().enumerate() {
            validate_trajectory(index, traj, n_vars)?;
            let h = traj.times[1] - traj.times[0];
            if !(h > 0.0) {
                return Err(InferenceError::NonUniformStep { trajectory: index, step: h });
            }
            match step {
                None => step = Some(h),
                Some(expected) if !steps_agree(expected, h) => {
                    return Err(InferenceError::StepSizeMismatch { trajectory: index, expected, found: h });
                }
                Some(_) => {}
            }
        }
        let step = step.ok_or(InferenceError::EmptyTrajectories)?;

        let total: usize = trajectories.iter().map(Trajectory::len).sum();
        let mut times = Array1::zeros(total);
        let mut values = Array2::zeros((total, n_vars));
        let mut spans = Vec::with_capacity(trajectories.len());
        let mut offset = 0;
        for traj in trajectories {
            let n = traj.len();
            times.slice_mut(s![offset..offset + n]).assign(&traj.times);
            values.slice_mut(s![offset..offset + n, ..]).assign(&traj.values);
            spans.push(Span::new(offset, offset + n - 1));
            offset += n;
        }

        Ok(SampleArena { times, values, spans, step, n_inputs, n_outputs })
    }

    /// The full sample matrix `Y`.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Output-variable slice of one row.
    pub fn output_row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![index, self.n_inputs..])
    }

    /// Output-variable columns over a span, rows in order.
    pub fn output_block(&self, span: Span) -> ArrayView2<'_, f64> {
        self.values.slice(s![span.start..=span.end, self.n_inputs..])
    }

    /// One span per source trajectory, in input order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    pub fn n_vars(&self) -> usize {
        self.n_inputs + self.n_outputs
    }
}

fn validate_trajectory(index: usize, traj: &Trajectory, n_vars: usize) -> InferenceResult<()> {
    if traj.times.len() != traj.values.nrows() {
        return Err(InferenceError::TimeLengthMismatch {
            trajectory: index,
            times: traj.times.len(),
            rows: traj.values.nrows(),
        });
    }
    if traj.values.ncols() != n_vars {
        return Err(InferenceError::DimensionMismatch {
            trajectory: index,
            expected: n_vars,
            found: traj.values.ncols(),
        });
    }
    if traj.len() < 2 {
        return Err(InferenceError::TrajectoryTooShort { trajectory: index, samples: traj.len(), needed: 2 });
    }
    if let Some(((row, col), _)) = traj.values.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteSample { trajectory: index, row, col });
    }
    if let Some((row, _)) = traj.times.iter().enumerate().find(|(_, t)| !t.is_finite()) {
        return Err(InferenceError::NonFiniteSample { trajectory: index, row, col: 0 });
    }
    Ok(())
}
