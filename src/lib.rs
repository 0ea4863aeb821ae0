//! rust_hybrid_learner — passive inference of polynomial hybrid automata.
//!
//! Purpose
//! -------
//! Learn a hybrid automaton (modes with polynomial ODE flows and box
//! invariants, transitions with polynomial guards and affine reset maps)
//! from sampled input/output trajectories of a system that switches between
//! continuous regimes.
//!
//! Key behaviors
//! -------------
//! - [`infer`] runs the whole pipeline: trajectory concatenation, multistep
//!   derivative estimation, change-point segmentation, DTW-based mode
//!   clustering, flow regression, invariant computation, and transition
//!   inference.
//! - Every stage lives in its own module and can be driven directly for
//!   diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - All trajectories share one fixed sample step; the columns of each
//!   value matrix are the input variables followed by the outputs.
//! - The run is single-threaded and deterministic; the only randomness is
//!   the seeded fold shuffling of the guard grid search.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray` arrays with samples as rows.
//! - Failures are returned as [`InferenceError`]; the library never panics
//!   on bad input.
//! - Progress is reported through `tracing`; no subscriber is installed.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::{Array1, Array2};
//! use rust_hybrid_learner::{infer, InferenceOptions, Trajectory};
//!
//! let times = Array1::linspace(0.0, 1.0, 101);
//! let values = Array2::<f64>::zeros((101, 2));
//! let inputs = vec!["u".to_string()];
//! let outputs = vec!["x".to_string()];
//! let automaton = infer(&[Trajectory::new(times, values)], &inputs, &outputs, &InferenceOptions::default())?;
//! println!("{automaton}");
//! # Ok::<(), rust_hybrid_learner::InferenceError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each module; end-to-end scenarios and the
//!   polynomial text property test live under `tests/`.

pub mod clustering;
pub mod inference;
pub mod optimization;
pub mod polynomial;
pub mod segmentation;
pub mod trajectory;
pub mod transition;
pub mod utils;

pub use crate::inference::{infer, Automaton, InferenceError, InferenceOptions, InferenceResult, Mode, Transition};
pub use crate::polynomial::Polynomial;
pub use crate::trajectory::Trajectory;
pub use crate::transition::{parse_annotations, Annotation};

pub mod prelude {
    pub use crate::inference::prelude::*;
    pub use crate::polynomial::prelude::*;
    pub use crate::trajectory::prelude::*;
    pub use crate::transition::prelude::*;
}
