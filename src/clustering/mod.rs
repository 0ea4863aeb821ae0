//! clustering — merging segments into modes and fitting their flows.
//!
//! Purpose
//! -------
//! Decide which segments, across and within trajectories, follow the same
//! continuous dynamics, and fit one polynomial ODE per resulting mode.
//!
//! Key behaviors
//! -------------
//! - [`dtw`] aligns two segment signals inside a band around the diagonal.
//! - [`path_correlation`] scores how well aligned signals move together.
//! - [`cluster_segments`] runs the greedy seed-first agglomeration.
//! - [`fit_flows`] regresses backward derivatives on polynomial features
//!   over each mode's first member segments.
//!
//! Invariants & assumptions
//! ------------------------
//! - Clustering is a function of segment order and thresholds only; the
//!   same input always yields the same partition and coefficients.
//! - Only output variables enter the similarity tests; flows are fitted over
//!   every variable.

pub mod agglomerate;
pub mod correlation;
pub mod dtw;
pub mod flow;

pub use self::agglomerate::{cluster_segments, compare_segments, ClusteringConfig, ModePartition, SegmentComparison};
pub use self::correlation::path_correlation;
pub use self::dtw::{dtw, DtwAlignment};
pub use self::flow::fit_flows;

pub mod prelude {
    pub use super::agglomerate::{cluster_segments, ClusteringConfig, ModePartition};
    pub use super::flow::fit_flows;
}
