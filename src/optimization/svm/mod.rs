//! svm — binary C-support vector classification with a polynomial kernel.
//!
//! Purpose
//! -------
//! Back the guard inference step: separate "just before a jump" samples from
//! "at the jump" samples and keep enough of the trained model (support
//! vectors, signed dual coefficients, offset, kernel parameters) to rebuild
//! the decision function as an explicit polynomial.
//!
//! Key behaviors
//! -------------
//! - [`PolynomialKernel`] validates and evaluates `(γ⟨u, v⟩ + coef0)^d`.
//! - [`fit_svc`] trains by SMO with second-order working-set selection.
//! - [`grid_search`] selects `(C, γ, coef0)` by seeded stratified k-fold
//!   cross-validation.
//!
//! Conventions
//! -----------
//! - Labels are `+1.0` / `-1.0`; a positive decision value predicts `+1`.

pub mod kernel;
pub mod model_selection;
pub mod smo;

pub use self::kernel::PolynomialKernel;
pub use self::model_selection::{grid_search, stratified_k_fold, CvSplit, GridSearchOutcome, SvcCandidate};
pub use self::smo::{fit_svc, SvcModel, SvcOptions};

pub mod prelude {
    pub use super::kernel::PolynomialKernel;
    pub use super::model_selection::{grid_search, SvcCandidate};
    pub use super::smo::{fit_svc, SvcModel, SvcOptions};
}
