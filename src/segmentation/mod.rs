//! segmentation — derivative estimation and trajectory segmentation.
//!
//! Purpose
//! -------
//! Turn the concatenated samples into smooth pieces: estimate derivatives
//! with fixed multistep formulas, then cut each trajectory wherever the
//! backward and forward estimates disagree.
//!
//! Key behaviors
//! -------------
//! - [`DerivativeTable::compute`] evaluates the complete polynomial feature
//!   basis and both derivative estimates for rows `[M, N − M)`.
//! - [`segment_trajectories`] runs the coarse/fine two-pass segmenter per
//!   trajectory and returns a [`Segmentation`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Each [`Segment`] satisfies `ode ⊆ exact` and belongs to exactly one
//!   trajectory.
//! - Segments are ordered by trajectory, then by time.
//!
//! Downstream usage
//! ----------------
//! - Clustering reads exact ranges for DTW comparison and ODE ranges, through
//!   the same [`DerivativeTable`], for flow regression.
//! - Transition inference reads consecutive exact ranges per trajectory.

pub mod derivatives;
pub mod segmenter;

pub use self::derivatives::{DerivativeTable, MultistepStencil};
pub use self::segmenter::{segment_trajectories, Segment, SegmenterConfig, Segmentation};

pub mod prelude {
    pub use super::derivatives::DerivativeTable;
    pub use super::segmenter::{segment_trajectories, Segment, SegmenterConfig, Segmentation};
}
