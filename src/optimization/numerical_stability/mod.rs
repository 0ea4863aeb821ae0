//! numerical_stability — shared tolerances, scale-free comparisons and
//! feature rescaling.
//!
//! Purpose
//! -------
//! Centralize the small numeric thresholds the inference pipeline depends on
//! (zero standard deviation, near-identical guard samples, step-size
//! agreement, SMO curvature floor) together with the relative-difference
//! measure used by segmentation and guard fitting, and the min-max map that
//! conditions classifier inputs.
//!
//! Conventions
//! -----------
//! - Pure helpers on `ndarray` views; no logging.

pub mod tolerances;
pub mod transformations;

pub use self::tolerances::{
    l2_norm, relative_difference, steps_agree, NEAR_IDENTICAL_TOL, SMO_STOP_TOL, SMO_TAU, STEP_SIZE_RTOL,
    ZERO_STD_TOL,
};
pub use self::transformations::MinMaxScaling;

pub mod prelude {
    pub use super::tolerances::{relative_difference, NEAR_IDENTICAL_TOL, ZERO_STD_TOL};
    pub use super::transformations::MinMaxScaling;
}
