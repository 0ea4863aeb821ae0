//! Greedy agglomeration of segments into modes.
//!
//! Purpose
//! -------
//! Group segments whose output signals look alike, across and within
//! trajectories, into modes.
//!
//! Key behaviors
//! -------------
//! - The first remaining segment seeds a new mode and is compared with every
//!   later remaining segment; matches join the mode and leave the pool.
//!   Repeat until the pool is empty.
//! - Two segments match when the path correlation of their output signals is
//!   at least the correlation threshold and, if a distance threshold is
//!   active, their normalized DTW distance is strictly below it.
//! - Comparisons are always made against the seed, not against the growing
//!   mode, so the partition depends on segment order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every segment ends up in exactly one mode; modes are listed in seed
//!   order and members in segment order.

use tracing::debug;

use crate::{
    clustering::{correlation::path_correlation, dtw::dtw},
    segmentation::{Segment, Segmentation},
    trajectory::SampleArena,
};

/// Matching thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusteringConfig {
    /// `None` disables the distance test.
    pub distance_threshold: Option<f64>,
    pub correlation_threshold: f64,
    /// Upper bound on the DTW band radius.
    pub dtw_radius: usize,
}

/// Similarity of two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentComparison {
    /// DTW cost over the summed lengths.
    pub distance: f64,
    /// Minimum path correlation over non-constant output variables.
    pub correlation: f64,
}

impl SegmentComparison {
    pub fn matches(&self, config: &ClusteringConfig) -> bool {
        self.correlation >= config.correlation_threshold
            && config.distance_threshold.map_or(true, |thr| self.distance < thr)
    }
}

/// Segment-to-mode assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePartition {
    modes: Vec<Vec<usize>>,
    mode_of: Vec<usize>,
}

impl ModePartition {
    /// Build from member lists; every segment id below `n_segments` must
    /// appear exactly once.
    pub fn new(modes: Vec<Vec<usize>>, n_segments: usize) -> Self {
        let mut mode_of = vec![0; n_segments];
        for (mode, members) in modes.iter().enumerate() {
            for &id in members {
                mode_of[id] = mode;
            }
        }
        ModePartition { modes, mode_of }
    }

    /// Member segment ids per mode.
    pub fn modes(&self) -> &[Vec<usize>] {
        &self.modes
    }

    pub fn members(&self, mode: usize) -> &[usize] {
        &self.modes[mode]
    }

    pub fn mode_of(&self, segment: usize) -> usize {
        self.mode_of[segment]
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// Compare the output signals of two segments over their exact ranges.
pub fn compare_segments(arena: &SampleArena, a: &Segment, b: &Segment, max_radius: usize) -> SegmentComparison {
    let sa = arena.output_block(a.exact);
    let sb = arena.output_block(b.exact);
    let radius = a.exact.len().min(max_radius);
    let alignment = dtw(sa, sb, radius);
    SegmentComparison {
        distance: alignment.normalized_cost(sa.nrows(), sb.nrows()),
        correlation: path_correlation(sa, sb, &alignment.path),
    }
}

/// Partition all segments into modes.
pub fn cluster_segments(arena: &SampleArena, segmentation: &Segmentation, config: &ClusteringConfig) -> ModePartition {
    let segments = segmentation.segments();
    let mut remaining: Vec<usize> = (0..segments.len()).collect();
    let mut modes = Vec::new();

    while let Some((&seed, rest)) = remaining.split_first() {
        let mut members = vec![seed];
        let mut unmatched = Vec::with_capacity(rest.len());
        for &candidate in rest {
            let cmp = compare_segments(arena, &segments[seed], &segments[candidate], config.dtw_radius);
            if cmp.matches(config) {
                members.push(candidate);
            } else {
                unmatched.push(candidate);
            }
        }
        debug!(mode = modes.len(), seed, size = members.len(), "mode formed");
        modes.push(members);
        remaining = unmatched;
    }

    ModePartition::new(modes, segments.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::Segmentation;
    use crate::trajectory::{Span, Trajectory};
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Matching rules (correlation and optional distance threshold).
    // - Greedy seed-order grouping on hand-built segments.
    // - Determinism of the partition.
    // -------------------------------------------------------------------------

    /// Rising ramp, falling ramp, rising ramp shifted up by 0.5, rising ramp.
    fn fixture() -> (SampleArena, Segmentation) {
        let n = 40;
        let values = Array2::from_shape_fn((n, 1), |(i, _)| {
            let k = (i % 10) as f64;
            match i / 10 {
                0 => k,
                1 => 9.0 - k,
                2 => 0.5 + k,
                _ => k,
            }
        });
        let times = Array1::from_iter((0..n).map(|i| i as f64));
        let arena = SampleArena::from_trajectories(&[Trajectory::new(times, values)], 0, 1).unwrap();
        let segments = (0..4)
            .map(|s| Segment {
                ode: Span::new(10 * s + 1, 10 * s + 8),
                exact: Span::new(10 * s, 10 * s + 9),
                trajectory: 0,
            })
            .collect();
        (arena, Segmentation::new(segments, 1))
    }

    #[test]
    // Purpose
    // -------
    // Verify grouping with both thresholds active.
    //
    // Given
    // -----
    // - Four segments: up, down, up + 0.5, up. Distance threshold 0.1,
    //   correlation 0.8.
    //
    // Expect
    // ------
    // - Modes {0, 3}, {1}, {2}: the shifted ramp correlates perfectly but its
    //   normalized distance is 0.25.
    fn groups_by_shape_and_distance() {
        // Arrange
        let (arena, seg) = fixture();
        let cfg = ClusteringConfig { distance_threshold: Some(0.1), correlation_threshold: 0.8, dtw_radius: 5 };

        // Act
        let partition = cluster_segments(&arena, &seg, &cfg);

        // Assert
        assert_eq!(partition.modes(), &[vec![0, 3], vec![1], vec![2]]);
        assert_eq!(partition.mode_of(3), 0);
        assert_eq!(partition.mode_of(2), 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify that disabling the distance test merges by shape alone.
    //
    // Given
    // -----
    // - The same fixture with `distance_threshold = None`.
    //
    // Expect
    // ------
    // - Modes {0, 2, 3}, {1}.
    fn disabled_distance_merges_by_correlation_only() {
        let (arena, seg) = fixture();
        let cfg = ClusteringConfig { distance_threshold: None, correlation_threshold: 0.8, dtw_radius: 5 };
        let partition = cluster_segments(&arena, &seg, &cfg);
        assert_eq!(partition.modes(), &[vec![0, 2, 3], vec![1]]);
    }

    #[test]
    fn clustering_is_deterministic() {
        let (arena, seg) = fixture();
        let cfg = ClusteringConfig { distance_threshold: Some(0.1), correlation_threshold: 0.8, dtw_radius: 5 };
        assert_eq!(cluster_segments(&arena, &seg, &cfg), cluster_segments(&arena, &seg, &cfg));
    }

    #[test]
    fn comparison_of_identical_segments() {
        let (arena, seg) = fixture();
        let cmp = compare_segments(&arena, seg.segment(0), seg.segment(3), 5);
        assert_eq!(cmp.distance, 0.0);
        assert!((cmp.correlation - 1.0).abs() < 1e-12);
    }
}
