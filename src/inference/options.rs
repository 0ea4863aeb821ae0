//! Configuration for a single inference run.
//!
//! Purpose
//! -------
//! Hold every tunable of the pipeline in one plain data carrier with
//! documented defaults, and reject out-of-domain values before any
//! computation starts.
//!
//! Key behaviors
//! -------------
//! - [`InferenceOptions::default`] reproduces the reference configuration
//!   (linear flows and guards, fifth-order multistep estimates, 1 %
//!   segmentation tolerances, distance 0.1 / correlation 0.8 clustering).
//! - [`InferenceOptions::validate`] checks ranges; annotation names are
//!   checked later against the declared variables.
//!
//! Conventions
//! -----------
//! - A distance threshold of `None` or `Some(0.0)` disables the DTW
//!   distance test; clustering then relies on correlation alone.

use std::collections::BTreeMap;

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    transition::annotation::Annotation,
};

/// Options for [`crate::inference::infer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferenceOptions {
    /// Total degree of the flow polynomials.
    pub ode_degree: u32,
    /// Kernel (and polynomial) degree of guards.
    pub guard_degree: u32,
    /// Order `M` of the backward/forward multistep derivative estimates.
    pub multistep_order: usize,
    /// Relative tolerance of the backward-vs-forward derivative test.
    pub coarse_tol: f64,
    /// Relative tolerance of the consecutive backward-derivative test.
    pub fine_tol: f64,
    /// Upper bound on the normalized DTW distance; `None` disables it.
    pub clustering_distance_threshold: Option<f64>,
    /// Lower bound on the path correlation for merging segments.
    pub clustering_correlation_threshold: f64,
    /// Number of segments per mode used for flow regression.
    pub ode_speedup_cap: usize,
    /// Whether modes get bounding-box invariants.
    pub compute_invariant: bool,
    /// Drop the last segment of every trajectory.
    pub filter_last_segment: bool,
    /// Per-variable assignment overrides.
    pub annotations: BTreeMap<String, Annotation>,
    /// Half-width of the DTW band around the scaled diagonal.
    pub dtw_radius: usize,
    /// Seed for guard cross-validation fold shuffling.
    pub guard_seed: u64,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        InferenceOptions {
            ode_degree: 1,
            guard_degree: 1,
            multistep_order: 5,
            coarse_tol: 0.01,
            fine_tol: 0.01,
            clustering_distance_threshold: Some(0.1),
            clustering_correlation_threshold: 0.8,
            ode_speedup_cap: 10,
            compute_invariant: true,
            filter_last_segment: false,
            annotations: BTreeMap::new(),
            dtw_radius: 5,
            guard_seed: 0,
        }
    }
}

impl InferenceOptions {
    /// Check every field against its domain.
    ///
    /// Errors
    /// ------
    /// - `InvalidDegree` for a zero flow or guard degree.
    /// - `InvalidStepOrder` for `multistep_order ∉ 2..=6`.
    /// - `InvalidTolerance` for non-positive or non-finite tolerances.
    /// - `InvalidThreshold` for a negative/non-finite distance threshold or a
    ///   correlation threshold outside `[-1, 1]`.
    /// - `InvalidOdeSpeedup` / `InvalidDtwRadius` for zero caps.
    pub fn validate(&self) -> InferenceResult<()> {
        if self.ode_degree == 0 {
            return Err(InferenceError::InvalidDegree { name: "ode_degree", degree: 0 });
        }
        if self.guard_degree == 0 {
            return Err(InferenceError::InvalidDegree { name: "guard_degree", degree: 0 });
        }
        if !(2..=6).contains(&self.multistep_order) {
            return Err(InferenceError::InvalidStepOrder { order: self.multistep_order });
        }
        for (name, value) in [("coarse_tol", self.coarse_tol), ("fine_tol", self.fine_tol)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InferenceError::InvalidTolerance { name, value });
            }
        }
        if let Some(value) = self.clustering_distance_threshold {
            if !value.is_finite() || value < 0.0 {
                return Err(InferenceError::InvalidThreshold {
                    name: "clustering_distance_threshold",
                    value,
                    reason: "must be non-negative and finite",
                });
            }
        }
        let corr = self.clustering_correlation_threshold;
        if !corr.is_finite() || !(-1.0..=1.0).contains(&corr) {
            return Err(InferenceError::InvalidThreshold {
                name: "clustering_correlation_threshold",
                value: corr,
                reason: "must lie in [-1, 1]",
            });
        }
        if self.ode_speedup_cap == 0 {
            return Err(InferenceError::InvalidOdeSpeedup);
        }
        if self.dtw_radius == 0 {
            return Err(InferenceError::InvalidDtwRadius);
        }
        Ok(())
    }

    /// Distance threshold with the disabled cases folded into `None`.
    pub fn active_distance_threshold(&self) -> Option<f64> {
        self.clustering_distance_threshold.filter(|&v| v > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - That `InferenceOptions::default` matches the documented defaults.
    // - That `validate` rejects each out-of-domain field.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the documented defaults.
    //
    // Given
    // -----
    // - `InferenceOptions::default()`.
    //
    // Expect
    // ------
    // - Degrees 1/1, order 5, tolerances 0.01, thresholds 0.1/0.8, cap 10,
    //   invariants on, no last-segment filtering, no annotations, radius 5.
    fn default_matches_documented_values() {
        // Arrange + Act
        let opts = InferenceOptions::default();

        // Assert
        assert_eq!(opts.ode_degree, 1);
        assert_eq!(opts.guard_degree, 1);
        assert_eq!(opts.multistep_order, 5);
        assert_eq!(opts.coarse_tol, 0.01);
        assert_eq!(opts.fine_tol, 0.01);
        assert_eq!(opts.clustering_distance_threshold, Some(0.1));
        assert_eq!(opts.clustering_correlation_threshold, 0.8);
        assert_eq!(opts.ode_speedup_cap, 10);
        assert!(opts.compute_invariant);
        assert!(!opts.filter_last_segment);
        assert!(opts.annotations.is_empty());
        assert_eq!(opts.dtw_radius, 5);
        assert!(opts.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify that each invalid field is reported with the matching variant.
    //
    // Given
    // -----
    // - Defaults with one field broken at a time.
    //
    // Expect
    // ------
    // - The corresponding `InferenceError`.
    fn validate_rejects_out_of_domain_fields() {
        let base = InferenceOptions::default();

        let opts = InferenceOptions { multistep_order: 7, ..base.clone() };
        assert_eq!(opts.validate(), Err(InferenceError::InvalidStepOrder { order: 7 }));

        let opts = InferenceOptions { multistep_order: 1, ..base.clone() };
        assert_eq!(opts.validate(), Err(InferenceError::InvalidStepOrder { order: 1 }));

        let opts = InferenceOptions { ode_degree: 0, ..base.clone() };
        assert!(matches!(opts.validate(), Err(InferenceError::InvalidDegree { name: "ode_degree", .. })));

        let opts = InferenceOptions { fine_tol: 0.0, ..base.clone() };
        assert!(matches!(opts.validate(), Err(InferenceError::InvalidTolerance { name: "fine_tol", .. })));

        let opts = InferenceOptions { clustering_distance_threshold: Some(-0.5), ..base.clone() };
        assert!(matches!(opts.validate(), Err(InferenceError::InvalidThreshold { .. })));

        let opts = InferenceOptions { clustering_correlation_threshold: 1.5, ..base.clone() };
        assert!(matches!(opts.validate(), Err(InferenceError::InvalidThreshold { .. })));

        let opts = InferenceOptions { ode_speedup_cap: 0, ..base.clone() };
        assert_eq!(opts.validate(), Err(InferenceError::InvalidOdeSpeedup));

        let opts = InferenceOptions { dtw_radius: 0, ..base };
        assert_eq!(opts.validate(), Err(InferenceError::InvalidDtwRadius));
    }

    #[test]
    fn zero_distance_threshold_disables_test() {
        let opts = InferenceOptions { clustering_distance_threshold: Some(0.0), ..Default::default() };
        assert!(opts.validate().is_ok());
        assert_eq!(opts.active_distance_threshold(), None);
        assert_eq!(InferenceOptions::default().active_distance_threshold(), Some(0.1));
    }
}
