//! Error surface for polynomial construction, evaluation and parsing.
//!
//! `PolynomialError` groups arity problems (wrong number of variables or
//! coefficients) with the failures the symbolic parser can report. An alias
//! `PolynomialResult<T>` standardizes return types across the module.

/// Result alias for polynomial operations.
pub type PolynomialResult<T> = Result<T, PolynomialError>;

/// Unified error type for polynomial routines.
#[derive(Debug, Clone, PartialEq)]
pub enum PolynomialError {
    // ---- Construction ----
    /// A point or exponent vector does not match the number of variables.
    ArityMismatch { expected: usize, found: usize },

    /// A coefficient slice does not match the size of the monomial basis.
    CoefficientCountMismatch { expected: usize, found: usize },

    /// An affine substitution received non-finite scale or offset values.
    NonFiniteSubstitution { index: usize, scale: f64, offset: f64 },

    // ---- Parsing ----
    /// The expression contains no terms.
    EmptyExpression,

    /// A character that cannot start any token.
    UnexpectedCharacter { position: usize, found: char },

    /// A token appeared where the grammar does not allow it.
    UnexpectedToken { position: usize, found: String },

    /// The expression ended in the middle of a term.
    UnexpectedEnd,

    /// A numeric literal that `f64` parsing rejects.
    InvalidNumber { text: String },

    /// An identifier that is not among the declared variables.
    UnknownVariable { name: String },
}

impl std::error::Error for PolynomialError {}

impl std::fmt::Display for PolynomialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            PolynomialError::ArityMismatch { expected, found } => write!(
                f,
                "Polynomial Error: expected {} variables, found {}",
                expected, found
            ),
            PolynomialError::CoefficientCountMismatch { expected, found } => write!(
                f,
                "Polynomial Error: basis has {} monomials but {} coefficients were given",
                expected, found
            ),
            PolynomialError::NonFiniteSubstitution { index, scale, offset } => write!(
                f,
                "Polynomial Error: non-finite substitution for variable {} (scale = {}, offset = {})",
                index, scale, offset
            ),

            // ---- Parsing ----
            PolynomialError::EmptyExpression => {
                write!(f, "Polynomial Error: empty expression")
            }
            PolynomialError::UnexpectedCharacter { position, found } => write!(
                f,
                "Polynomial Error: unexpected character '{}' at position {}",
                found, position
            ),
            PolynomialError::UnexpectedToken { position, found } => write!(
                f,
                "Polynomial Error: unexpected token '{}' at position {}",
                found, position
            ),
            PolynomialError::UnexpectedEnd => {
                write!(f, "Polynomial Error: expression ended inside a term")
            }
            PolynomialError::InvalidNumber { text } => {
                write!(f, "Polynomial Error: invalid numeric literal '{}'", text)
            }
            PolynomialError::UnknownVariable { name } => {
                write!(f, "Polynomial Error: unknown variable '{}'", name)
            }
        }
    }
}
