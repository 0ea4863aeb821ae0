//! Two-pass segmentation of trajectories into smooth pieces.
//!
//! Purpose
//! -------
//! Split every trajectory into maximal runs of samples on which a single
//! smooth flow is plausible, and locate each jump boundary precisely.
//!
//! Key behaviors
//! -------------
//! - Coarse pass: a row "agrees" when the relative difference between its
//!   backward and forward derivative estimates (output variables) is at
//!   most `coarse_tol`. The ODE range of a segment is a maximal run of
//!   agreeing rows.
//! - Fine pass: inside each disagreement window the exact boundary is the
//!   row before the backward estimate first jumps by more than `fine_tol`
//!   relative to its predecessor; without such a jump, the row of largest
//!   change is used.
//! - The next segment's exact range starts right after the boundary; its
//!   ODE range starts where agreement resumes.
//! - Disagreement at the very start of a segment is absorbed into that
//!   segment's exact range; a trailing window that never recovers is
//!   absorbed into the last segment.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only rows `[start + M, end − M]` of each trajectory are visited, so no
//!   stencil crosses a trajectory boundary.
//! - Every segment satisfies `exact.start ≤ ode.start ≤ ode.end ≤ exact.end`
//!   and exact ranges of one trajectory are contiguous and disjoint.

use tracing::debug;

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::numerical_stability::relative_difference,
    segmentation::derivatives::DerivativeTable,
    trajectory::{SampleArena, Span},
};

/// One smooth piece of one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Rows used for flow regression.
    pub ode: Span,
    /// Rows from just after the previous jump up to this segment's jump.
    pub exact: Span,
    /// Index of the owning trajectory.
    pub trajectory: usize,
}

/// Ordered segments plus per-trajectory membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    segments: Vec<Segment>,
    by_trajectory: Vec<Vec<usize>>,
}

impl Segmentation {
    /// Group segments by their `trajectory` field. Segments must already be
    /// ordered by trajectory and position.
    pub fn new(segments: Vec<Segment>, n_trajectories: usize) -> Self {
        let mut by_trajectory = vec![Vec::new(); n_trajectories];
        for (id, seg) in segments.iter().enumerate() {
            if let Some(list) = by_trajectory.get_mut(seg.trajectory) {
                list.push(id);
            }
        }
        Segmentation { segments, by_trajectory }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: usize) -> &Segment {
        &self.segments[id]
    }

    /// Segment ids per trajectory, in time order.
    pub fn by_trajectory(&self) -> &[Vec<usize>] {
        &self.by_trajectory
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether no trajectory contains more than one segment.
    pub fn one_segment_per_trajectory(&self) -> bool {
        self.by_trajectory.iter().all(|ids| ids.len() <= 1)
    }
}

/// Tolerances and flags of the segmenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterConfig {
    pub coarse_tol: f64,
    pub fine_tol: f64,
    pub filter_last_segment: bool,
}

/// Segment every trajectory of `arena`.
///
/// Errors
/// ------
/// - `TrajectoryTooShort` when a trajectory has fewer than `2M + 1` samples.
/// - `NoSmoothSamples` when no visited row of a trajectory has agreeing
///   backward and forward estimates.
/// - `NoSegments` when nothing survives (e.g. every trajectory had a single
///   segment and `filter_last_segment` is set).
pub fn segment_trajectories(
    arena: &SampleArena, table: &DerivativeTable, config: &SegmenterConfig,
) -> InferenceResult<Segmentation> {
    let m = table.order();
    let mut segments = Vec::new();
    for (trajectory, span) in arena.spans().iter().enumerate() {
        if span.len() < 2 * m + 1 {
            return Err(InferenceError::TrajectoryTooShort { trajectory, samples: span.len(), needed: 2 * m + 1 });
        }
        let lo = span.start + m;
        let hi = span.end - m;
        let mut pieces = segment_range(table, lo, hi, config, trajectory)?;
        if config.filter_last_segment {
            pieces.pop();
        }
        segments.extend(pieces);
    }

    if segments.is_empty() {
        return Err(InferenceError::NoSegments);
    }
    debug!(segments = segments.len(), trajectories = arena.spans().len(), "segmentation complete");
    Ok(Segmentation::new(segments, arena.spans().len()))
}

fn segment_range(
    table: &DerivativeTable, lo: usize, hi: usize, config: &SegmenterConfig, trajectory: usize,
) -> InferenceResult<Vec<Segment>> {
    let agrees = |row: usize| {
        relative_difference(table.backward_outputs_at(row), table.forward_outputs_at(row)) <= config.coarse_tol
    };
    let first_agreeing = |from: usize| (from..=hi).find(|&row| agrees(row));

    let mut out = Vec::new();
    let mut exact_start = lo;
    let mut ode_start = lo;
    loop {
        let disagreement = (ode_start..=hi).find(|&row| !agrees(row));
        let r = match disagreement {
            None => {
                out.push(Segment {
                    ode: Span::new(ode_start, hi),
                    exact: Span::new(exact_start, hi),
                    trajectory,
                });
                break;
            }
            Some(r) => r,
        };
        let resume = first_agreeing(r);

        if r == ode_start {
            match resume {
                Some(j) => {
                    ode_start = j;
                    continue;
                }
                None => {
                    // Nothing left that supports a flow fit; fold the tail into the previous piece.
                    let last = out.last_mut().ok_or(InferenceError::NoSmoothSamples { trajectory })?;
                    last.exact.end = hi;
                    break;
                }
            }
        }

        let ode = Span::new(ode_start, r - 1);
        match resume {
            None => {
                out.push(Segment { ode, exact: Span::new(exact_start, hi), trajectory });
                break;
            }
            Some(j) => {
                let boundary = locate_boundary(table, r, j, config.fine_tol);
                out.push(Segment { ode, exact: Span::new(exact_start, boundary), trajectory });
                exact_start = boundary + 1;
                ode_start = j;
            }
        }
    }
    Ok(out)
}

/// Last row of the outgoing piece inside the window `[r, resume]`.
fn locate_boundary(table: &DerivativeTable, r: usize, resume: usize, fine_tol: f64) -> usize {
    let change =
        |row: usize| relative_difference(table.backward_outputs_at(row), table.backward_outputs_at(row - 1));
    if let Some(k) = (r..=resume).find(|&k| change(k) > fine_tol) {
        return k - 1;
    }
    let mut best = r;
    let mut best_change = f64::NEG_INFINITY;
    for k in r..=resume {
        let c = change(k);
        if c > best_change {
            best_change = c;
            best = k;
        }
    }
    best - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::Trajectory;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Boundary placement on a piecewise-linear signal.
    // - Span containment and contiguity of exact ranges.
    // - Smooth trajectories staying in one segment.
    // - `filter_last_segment`, `NoSegments` and short trajectories.
    // -------------------------------------------------------------------------

    fn triangle(n: usize) -> Trajectory {
        let h = 0.01;
        let times = Array1::from_iter((0..n).map(|i| i as f64 * h));
        let values = Array2::from_shape_fn((n, 1), |(i, _)| {
            let k = i % 200;
            let level = if k <= 100 { k } else { 200 - k };
            level as f64 * 0.01
        });
        Trajectory::new(times, values)
    }

    fn config() -> SegmenterConfig {
        SegmenterConfig { coarse_tol: 0.01, fine_tol: 0.01, filter_last_segment: false }
    }

    fn run(trajs: &[Trajectory], cfg: &SegmenterConfig) -> InferenceResult<Segmentation> {
        let arena = SampleArena::from_trajectories(trajs, 0, 1).unwrap();
        let table = DerivativeTable::compute(&arena, 5, 1).unwrap();
        segment_trajectories(&arena, &table, cfg)
    }

    #[test]
    // Purpose
    // -------
    // Verify that jumps in slope are located at the kink sample.
    //
    // Given
    // -----
    // - A triangle wave with kinks at rows 100, 200, 300, 400, 500, M = 5.
    //
    // Expect
    // ------
    // - Six segments with exact ends 100, 200, 300, 400, 500, 595; ODE
    //   ranges stop 5 rows before each kink and resume 5 rows after it.
    fn triangle_wave_boundaries() {
        // Arrange + Act
        let seg = run(&[triangle(601)], &config()).unwrap();

        // Assert
        let ends: Vec<usize> = seg.segments().iter().map(|s| s.exact.end).collect();
        assert_eq!(ends, vec![100, 200, 300, 400, 500, 595]);
        assert_eq!(seg.segment(0).exact, Span::new(5, 100));
        assert_eq!(seg.segment(0).ode, Span::new(5, 95));
        assert_eq!(seg.segment(1).exact, Span::new(101, 200));
        assert_eq!(seg.segment(1).ode, Span::new(105, 195));
        assert_eq!(seg.by_trajectory(), &[vec![0, 1, 2, 3, 4, 5]]);
    }

    #[test]
    // Purpose
    // -------
    // Verify span containment and contiguity over several trajectories.
    //
    // Given
    // -----
    // - Two triangle waves of different lengths.
    //
    // Expect
    // ------
    // - ode ⊆ exact for every segment; consecutive exact ranges in one
    //   trajectory touch; no segment leaves its trajectory span.
    fn spans_are_nested_and_contiguous() {
        let trajs = [triangle(601), triangle(450)];
        let arena = SampleArena::from_trajectories(&trajs, 0, 1).unwrap();
        let table = DerivativeTable::compute(&arena, 5, 1).unwrap();
        let seg = segment_trajectories(&arena, &table, &config()).unwrap();

        for s in seg.segments() {
            assert!(s.exact.contains_span(&s.ode));
            assert!(arena.spans()[s.trajectory].contains_span(&s.exact));
        }
        for ids in seg.by_trajectory() {
            for pair in ids.windows(2) {
                assert_eq!(seg.segment(pair[0]).exact.end + 1, seg.segment(pair[1]).exact.start);
            }
        }
        assert_eq!(seg.by_trajectory().len(), 2);
    }

    #[test]
    fn smooth_trajectory_is_one_segment() {
        let n = 300;
        let times = Array1::from_iter((0..n).map(|i| i as f64 * 0.01));
        let values = times.mapv(|t| 1.0 + 2.0 * t + 0.5 * t * t).insert_axis(ndarray::Axis(1));
        let seg = run(&[Trajectory::new(times, values)], &config()).unwrap();
        assert_eq!(seg.len(), 1);
        assert_eq!(seg.segment(0).exact, Span::new(5, n - 6));
        assert!(seg.one_segment_per_trajectory());
    }

    #[test]
    fn filter_last_segment_drops_tail_and_can_empty() {
        let cfg = SegmenterConfig { filter_last_segment: true, ..config() };
        let seg = run(&[triangle(601)], &cfg).unwrap();
        assert_eq!(seg.len(), 5);
        assert_eq!(seg.segments().last().map(|s| s.exact.end), Some(500));

        let n = 50;
        let times = Array1::from_iter((0..n).map(|i| i as f64 * 0.01));
        let values = times.clone().insert_axis(ndarray::Axis(1));
        assert_eq!(run(&[Trajectory::new(times, values)], &cfg), Err(InferenceError::NoSegments));
    }

    #[test]
    fn short_trajectory_is_rejected() {
        let times = Array1::from_iter((0..8).map(|i| i as f64 * 0.01));
        let values = times.clone().insert_axis(ndarray::Axis(1));
        assert!(matches!(
            run(&[Trajectory::new(times, values)], &config()),
            Err(InferenceError::TrajectoryTooShort { samples: 8, needed: 11, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a trajectory without any agreeing row is reported instead
    // of disappearing from the segmentation.
    //
    // Given
    // -----
    // - A valid triangle wave followed by a trajectory alternating 0, 1, 0, …
    //   whose backward and forward estimates have opposite signs everywhere.
    //
    // Expect
    // ------
    // - `NoSmoothSamples { trajectory: 1 }`.
    fn trajectory_without_agreeing_rows_is_an_error() {
        // Arrange
        let n = 601;
        let times = Array1::from_iter((0..n).map(|i| i as f64 * 0.01));
        let values = Array2::from_shape_fn((n, 1), |(i, _)| (i % 2) as f64);
        let noise = Trajectory::new(times, values);

        // Act
        let result = run(&[triangle(601), noise], &config());

        // Assert
        assert_eq!(result, Err(InferenceError::NoSmoothSamples { trajectory: 1 }));
    }
}
