//! optimization — numerical back-ends and their unified error surface.
//!
//! Purpose
//! -------
//! Keep the numerical solvers the inference pipeline relies on behind small,
//! typed entry points: SVD-based least squares for flows and reset maps, an
//! SMO solver and cross-validated model selection for guard classifiers, and
//! the shared tolerances both depend on.
//!
//! Key behaviors
//! -------------
//! - [`least_squares`]: minimum-norm multi-output regression
//!   ([`solve_least_squares`]) and centred affine fits ([`fit_affine`]) on
//!   top of `nalgebra`'s SVD.
//! - [`svm`]: polynomial-kernel C-SVC, seeded grid search.
//! - [`numerical_stability`]: tolerances and the relative-difference measure.
//! - Failures surface as [`OptError`] with the alias [`OptResult`].
//!
//! Conventions
//! -----------
//! - Inputs and outputs are `ndarray` matrices with rows as observations;
//!   conversion to `nalgebra` happens inside the solver.
//! - Only the SMO iteration-cap warning and the grid-search choice are
//!   logged; everything else is silent and pure.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests on small systems with known answers.

pub mod errors;
pub mod least_squares;
pub mod numerical_stability;
pub mod svm;

pub use self::errors::{OptError, OptResult};
pub use self::least_squares::{fit_affine, solve_least_squares, AffineFit};

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::least_squares::{fit_affine, solve_least_squares, AffineFit};
    pub use super::numerical_stability::prelude::*;
    pub use super::svm::prelude::*;
}
