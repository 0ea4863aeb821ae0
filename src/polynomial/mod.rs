//! polynomial — symbolic polynomials over named variables.
//!
//! Purpose
//! -------
//! Provide the single polynomial representation used for every symbolic
//! artifact the inference pipeline emits: ODE right-hand sides, guard
//! conditions and reset maps.
//!
//! Key behaviors
//! -------------
//! - [`Monomial`] and [`complete_basis`] fix the canonical graded-descending
//!   monomial order shared by regression features and printed output.
//! - [`Polynomial`] stores a coefficient map, evaluates, multiplies,
//!   performs exact affine substitution, and round-trips through the text
//!   form `x * y * 1.5 + 3.0`.
//! - [`multinomial`] and [`exponents_of_degree`] support kernel expansion
//!   when guards are recovered from a polynomial-kernel classifier.
//!
//! Conventions
//! -----------
//! - Variable order is the order of the `variables` slice; inside the
//!   pipeline that is inputs followed by outputs.
//! - Errors are reported via [`PolynomialError`]; no routine panics on
//!   malformed text.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each submodule; the randomized print/parse round
//!   trip is a proptest in `tests/polynomial_text.rs`.

pub mod errors;
pub mod expr;
pub mod monomial;

pub use self::errors::{PolynomialError, PolynomialResult};
pub use self::expr::Polynomial;
pub use self::monomial::{
    basis_size, complete_basis, exponents_of_degree, multinomial, ncombs_of_degree, Monomial,
};

pub mod prelude {
    pub use super::errors::{PolynomialError, PolynomialResult};
    pub use super::expr::Polynomial;
    pub use super::monomial::{complete_basis, Monomial};
}
