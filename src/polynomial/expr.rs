//! `Polynomial` — a named-variable polynomial with a canonical text form.
//!
//! Purpose
//! -------
//! Carry the symbolic output of inference (mode flows, transition guards and
//! assignments) as an exact coefficient map over named variables, and
//! convert it to and from the text form `x * x * 1.0 + x * y * 2.0 + 3.0`.
//!
//! Key behaviors
//! -------------
//! - Terms are stored in a `BTreeMap<Monomial, f64>`, so iteration, printing
//!   and the "leading coefficient" all follow the canonical basis order.
//! - Zero coefficients are kept when explicitly inserted; a flow fitted over
//!   the complete basis prints every basis term.
//! - Coefficients print with `{:?}`, which round-trips `f64` exactly through
//!   [`Polynomial::parse`]. The one normalization: the empty polynomial
//!   prints as `0.0` and parses back as a single zero constant term, which
//!   has the same value and the same coefficient for every monomial.
//! - [`Polynomial::substitute_affine`] rewrites `x_i ↦ s_i·x_i + o_i`
//!   exactly, including cross terms, for any degree.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every stored monomial has `variables.len()` exponents.
//! - Variable names are identifiers (`[A-Za-z_][A-Za-z0-9_]*`) when the text
//!   form must parse back.

use std::collections::BTreeMap;
use std::fmt;

use crate::polynomial::{
    errors::{PolynomialError, PolynomialResult},
    monomial::{complete_basis, Monomial},
};

/// Polynomial over an ordered list of named variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    variables: Vec<String>,
    terms: BTreeMap<Monomial, f64>,
}

impl Polynomial {
    /// The empty (zero) polynomial.
    pub fn zero(variables: Vec<String>) -> Self {
        Polynomial { variables, terms: BTreeMap::new() }
    }

    /// A polynomial consisting of a single constant term.
    pub fn constant(variables: Vec<String>, value: f64) -> Self {
        let mut poly = Polynomial::zero(variables);
        let nvars = poly.nvars();
        poly.terms.insert(Monomial::constant(nvars), value);
        poly
    }

    /// Build from coefficients listed in complete-basis order.
    ///
    /// Parameters
    /// ----------
    /// - `variables`: variable names; defines the arity.
    /// - `degree`: maximal total degree of the basis.
    /// - `coefficients`: one value per basis monomial, canonical order.
    ///
    /// Errors
    /// ------
    /// - `CoefficientCountMismatch` when the slice length differs from the
    ///   basis size.
    pub fn from_basis(variables: Vec<String>, degree: u32, coefficients: &[f64]) -> PolynomialResult<Self> {
        let basis = complete_basis(variables.len(), degree);
        if basis.len() != coefficients.len() {
            return Err(PolynomialError::CoefficientCountMismatch {
                expected: basis.len(),
                found: coefficients.len(),
            });
        }
        let terms = basis.into_iter().zip(coefficients.iter().copied()).collect();
        Ok(Polynomial { variables, terms })
    }

    /// Complete basis of `degree` with every coefficient set to zero.
    pub fn zero_basis(variables: Vec<String>, degree: u32) -> Self {
        let terms = complete_basis(variables.len(), degree).into_iter().map(|m| (m, 0.0)).collect();
        Polynomial { variables, terms }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    /// Highest total degree among stored terms (0 for the zero polynomial).
    pub fn degree(&self) -> u32 {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, f64)> + '_ {
        self.terms.iter().map(|(m, &c)| (m, c))
    }

    /// Coefficient of `monomial`, zero when absent.
    pub fn coefficient(&self, monomial: &Monomial) -> f64 {
        self.terms.get(monomial).copied().unwrap_or(0.0)
    }

    /// Coefficient of the monomial with the given exponents.
    pub fn coefficient_of(&self, exponents: &[u32]) -> f64 {
        self.coefficient(&Monomial::new(exponents.to_vec()))
    }

    pub fn constant_term(&self) -> f64 {
        self.coefficient(&Monomial::constant(self.nvars()))
    }

    /// Coefficient of the first term in canonical order.
    pub fn leading_coefficient(&self) -> Option<f64> {
        self.terms.values().next().copied()
    }

    /// Coefficients in canonical order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.values().copied().collect()
    }

    /// Add `coefficient` to the term for `monomial`, inserting it if absent.
    pub fn add_term(&mut self, monomial: Monomial, coefficient: f64) {
        *self.terms.entry(monomial).or_insert(0.0) += coefficient;
    }

    /// Overwrite the term for `monomial`.
    pub fn set_term(&mut self, monomial: Monomial, coefficient: f64) {
        self.terms.insert(monomial, coefficient);
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.terms.values_mut().for_each(|c| *c *= factor);
    }

    /// Divide every coefficient by `divisor`.
    ///
    /// Unlike scaling by the reciprocal, a coefficient equal in magnitude to
    /// `divisor` becomes exactly `±1`.
    pub fn divide(&mut self, divisor: f64) {
        self.terms.values_mut().for_each(|c| *c /= divisor);
    }

    /// Evaluate at `point`, ordered like `variables()`.
    ///
    /// Errors
    /// ------
    /// - `ArityMismatch` when `point.len() != nvars()`.
    pub fn evaluate(&self, point: &[f64]) -> PolynomialResult<f64> {
        if point.len() != self.nvars() {
            return Err(PolynomialError::ArityMismatch { expected: self.nvars(), found: point.len() });
        }
        Ok(self.terms.iter().map(|(m, c)| c * m.evaluate(point)).sum())
    }

    /// Sum of two polynomials over the same variables.
    pub fn sum(&self, other: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (m, c) in other.terms() {
            out.add_term(m.clone(), c);
        }
        out
    }

    /// Product of two polynomials over the same variables.
    pub fn product(&self, other: &Polynomial) -> Polynomial {
        let mut out = Polynomial::zero(self.variables.clone());
        for (m1, c1) in self.terms() {
            for (m2, c2) in other.terms() {
                out.add_term(m1.product(m2), c1 * c2);
            }
        }
        out
    }

    /// Rewrite the polynomial under `x_i ↦ scale[i]·x_i + offset[i]`.
    ///
    /// The result contains every monomial of the complete basis up to this
    /// polynomial's degree, so its text form is independent of which
    /// coefficients happened to cancel.
    ///
    /// Errors
    /// ------
    /// - `ArityMismatch` when `scale` or `offset` length differs from `nvars()`.
    /// - `NonFiniteSubstitution` for a NaN/∞ scale or offset.
    pub fn substitute_affine(&self, scale: &[f64], offset: &[f64]) -> PolynomialResult<Polynomial> {
        let nvars = self.nvars();
        for len in [scale.len(), offset.len()] {
            if len != nvars {
                return Err(PolynomialError::ArityMismatch { expected: nvars, found: len });
            }
        }
        let mut linear = Vec::with_capacity(nvars);
        for (index, (&s, &o)) in scale.iter().zip(offset).enumerate() {
            if !s.is_finite() || !o.is_finite() {
                return Err(PolynomialError::NonFiniteSubstitution { index, scale: s, offset: o });
            }
            let mut lin = Polynomial::zero(self.variables.clone());
            lin.add_term(Monomial::variable(nvars, index), s);
            lin.add_term(Monomial::constant(nvars), o);
            linear.push(lin);
        }

        let mut out = Polynomial::zero_basis(self.variables.clone(), self.degree());
        for (monomial, coefficient) in self.terms() {
            let mut expanded = Polynomial::constant(self.variables.clone(), coefficient);
            for (lin, &e) in linear.iter().zip(monomial.exponents()) {
                for _ in 0..e {
                    expanded = expanded.product(lin);
                }
            }
            out = out.sum(&expanded);
        }
        Ok(out)
    }

    /// Parse the text form produced by `Display`.
    ///
    /// Accepts sums and differences of terms; a term is a product of
    /// variable names and numeric literals in any order, each optionally
    /// preceded by a sign. Repeated monomials accumulate.
    ///
    /// Errors
    /// ------
    /// - `UnknownVariable` for identifiers outside `variables`.
    /// - `EmptyExpression`, `UnexpectedCharacter`, `UnexpectedToken`,
    ///   `UnexpectedEnd`, `InvalidNumber` for malformed input.
    pub fn parse(text: &str, variables: &[String]) -> PolynomialResult<Polynomial> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(PolynomialError::EmptyExpression);
        }
        let mut poly = Polynomial::zero(variables.to_vec());
        let mut cursor = 0;
        let mut sign = 1.0;
        loop {
            while let Some((_, tok)) = tokens.get(cursor) {
                match tok {
                    Token::Plus => {}
                    Token::Minus => sign = -sign,
                    _ => break,
                }
                cursor += 1;
            }
            let (monomial, coefficient) = parse_term(&tokens, &mut cursor, variables)?;
            poly.add_term(monomial, sign * coefficient);
            sign = 1.0;
            match tokens.get(cursor) {
                None => break,
                Some((_, Token::Plus)) => cursor += 1,
                Some((_, Token::Minus)) => {
                    sign = -1.0;
                    cursor += 1;
                }
                Some((position, tok)) => {
                    return Err(PolynomialError::UnexpectedToken {
                        position: *position,
                        found: tok.to_string(),
                    });
                }
            }
        }
        Ok(poly)
    }
}

/// Terms in canonical order; the empty polynomial prints as `0.0`.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0.0");
        }
        for (i, (monomial, coefficient)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            for (name, &e) in self.variables.iter().zip(monomial.exponents()) {
                for _ in 0..e {
                    write!(f, "{} * ", name)?;
                }
            }
            write!(f, "{:?}", coefficient)?;
        }
        Ok(())
    }
}

// ---- Tokenizer ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Plus,
    Minus,
    Star,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "{}", name),
            Token::Number(v) => write!(f, "{:?}", v),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
        }
    }
}

fn tokenize(text: &str) -> PolynomialResult<Vec<(usize, Token)>> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                tokens.push((i, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((i, Token::Minus));
                i += 1;
            }
            '*' => {
                tokens.push((i, Token::Star));
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| PolynomialError::InvalidNumber { text: literal.clone() })?;
                tokens.push((start, Token::Number(value)));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(chars[start..i].iter().collect())));
            }
            other => return Err(PolynomialError::UnexpectedCharacter { position: i, found: other }),
        }
    }
    Ok(tokens)
}

fn parse_term(
    tokens: &[(usize, Token)], cursor: &mut usize, variables: &[String],
) -> PolynomialResult<(Monomial, f64)> {
    let mut exponents = vec![0u32; variables.len()];
    let mut coefficient = 1.0;
    loop {
        let mut sign = 1.0;
        while let Some((_, Token::Minus | Token::Plus)) = tokens.get(*cursor) {
            if tokens[*cursor].1 == Token::Minus {
                sign = -sign;
            }
            *cursor += 1;
        }
        match tokens.get(*cursor) {
            Some((_, Token::Number(v))) => coefficient *= sign * v,
            Some((_, Token::Ident(name))) => {
                let index = variables
                    .iter()
                    .position(|v| v == name)
                    .ok_or_else(|| PolynomialError::UnknownVariable { name: name.clone() })?;
                exponents[index] += 1;
                coefficient *= sign;
            }
            Some((position, tok)) => {
                return Err(PolynomialError::UnexpectedToken { position: *position, found: tok.to_string() });
            }
            None => return Err(PolynomialError::UnexpectedEnd),
        }
        *cursor += 1;
        match tokens.get(*cursor) {
            Some((_, Token::Star)) => *cursor += 1,
            _ => break,
        }
    }
    Ok((Monomial::new(exponents), coefficient))
}

// ---- Optional serde support -----------------------------------------------------

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Polynomial;
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct PolynomialRepr {
        variables: Vec<String>,
        expression: String,
    }

    impl Serialize for Polynomial {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            PolynomialRepr { variables: self.variables.clone(), expression: self.to_string() }
                .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Polynomial {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = PolynomialRepr::deserialize(deserializer)?;
            Polynomial::parse(&repr.expression, &repr.variables).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Text form printing in canonical order and parsing back.
    // - Parser tolerance for signs, subtraction and coefficient placement.
    // - Evaluation, products and exact affine substitution.
    //
    // Randomized print/parse round trips live in `tests/polynomial_text.rs`.
    // -------------------------------------------------------------------------

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    // Purpose
    // -------
    // Verify the printed form of a complete degree-2 basis.
    //
    // Given
    // -----
    // - Variables (x, y) with coefficients 1..=6 in basis order.
    //
    // Expect
    // ------
    // - `x * x * 1.0 + x * y * 2.0 + y * y * 3.0 + x * 4.0 + y * 5.0 + 6.0`.
    fn display_lists_terms_in_basis_order() {
        // Arrange
        let p = Polynomial::from_basis(vars(&["x", "y"]), 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        // Act
        let text = p.to_string();

        // Assert
        assert_eq!(text, "x * x * 1.0 + x * y * 2.0 + y * y * 3.0 + x * 4.0 + y * 5.0 + 6.0");
    }

    #[test]
    // Purpose
    // -------
    // Verify that printing then parsing reproduces the coefficient map,
    // including zero and negative coefficients.
    //
    // Given
    // -----
    // - A degree-1 polynomial over (u, x) with a negative and a zero term.
    //
    // Expect
    // ------
    // - Parsed polynomial equals the original exactly.
    fn parse_inverts_display() {
        // Arrange
        let names = vars(&["u", "x"]);
        let p = Polynomial::from_basis(names.clone(), 1, &[-9.8, 0.0, 1.5e-12]).unwrap();

        // Act
        let q = Polynomial::parse(&p.to_string(), &names).unwrap();

        // Assert
        assert_eq!(p, q);
    }

    #[test]
    // Purpose
    // -------
    // Verify parser tolerance for leading coefficients and subtraction.
    //
    // Given
    // -----
    // - `"2 * x * y - 3.5 * y + -1"` over (x, y).
    //
    // Expect
    // ------
    // - xy → 2, y → -3.5, constant → -1.
    fn parse_accepts_subtraction_and_leading_coefficients() {
        // Arrange
        let names = vars(&["x", "y"]);

        // Act
        let p = Polynomial::parse("2 * x * y - 3.5 * y + -1", &names).unwrap();

        // Assert
        assert_eq!(p.coefficient_of(&[1, 1]), 2.0);
        assert_eq!(p.coefficient_of(&[0, 1]), -3.5);
        assert_eq!(p.constant_term(), -1.0);
        assert_eq!(p.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Verify that malformed input produces descriptive errors.
    //
    // Given
    // -----
    // - Unknown identifiers, a trailing operator, a stray character and an
    //   empty string.
    //
    // Expect
    // ------
    // - The matching `PolynomialError` variant for each.
    fn parse_rejects_malformed_input() {
        let names = vars(&["x"]);
        assert_eq!(
            Polynomial::parse("z * 1.0", &names),
            Err(PolynomialError::UnknownVariable { name: "z".to_string() })
        );
        assert_eq!(Polynomial::parse("x * ", &names), Err(PolynomialError::UnexpectedEnd));
        assert!(matches!(
            Polynomial::parse("x # 2", &names),
            Err(PolynomialError::UnexpectedCharacter { found: '#', .. })
        ));
        assert_eq!(Polynomial::parse("   ", &names), Err(PolynomialError::EmptyExpression));
        assert!(matches!(Polynomial::parse("x 2", &names), Err(PolynomialError::UnexpectedToken { .. })));
    }

    #[test]
    fn evaluate_checks_arity() {
        let p = Polynomial::from_basis(vars(&["x", "y"]), 1, &[2.0, -1.0, 0.5]).unwrap();
        assert_relative_eq!(p.evaluate(&[3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(p.evaluate(&[1.0]), Err(PolynomialError::ArityMismatch { expected: 2, found: 1 }));
        assert_eq!(p.leading_coefficient(), Some(2.0));
        assert_eq!(p.degree(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Verify that affine substitution agrees with evaluating the original
    // polynomial at the transformed point.
    //
    // Given
    // -----
    // - A degree-2 polynomial over (x, y) with cross term, scale (2, -0.5)
    //   and offset (1, 3).
    //
    // Expect
    // ------
    // - q(x, y) == p(2x + 1, -0.5y + 3) at several points, and q keeps the
    //   complete degree-2 basis.
    fn substitute_affine_matches_pointwise_transform() {
        // Arrange
        let names = vars(&["x", "y"]);
        let p = Polynomial::from_basis(names, 2, &[1.0, -2.0, 0.5, 3.0, 0.0, -4.0]).unwrap();
        let scale = [2.0, -0.5];
        let offset = [1.0, 3.0];

        // Act
        let q = p.substitute_affine(&scale, &offset).unwrap();

        // Assert
        assert_eq!(q.len(), 6);
        for &(x, y) in &[(0.0, 0.0), (1.0, 2.0), (-3.0, 0.25), (10.0, -7.0)] {
            let direct = p.evaluate(&[scale[0] * x + offset[0], scale[1] * y + offset[1]]).unwrap();
            assert_relative_eq!(q.evaluate(&[x, y]).unwrap(), direct, epsilon = 1e-9);
        }
    }

    #[test]
    fn substitute_affine_rejects_bad_inputs() {
        let p = Polynomial::constant(vars(&["x"]), 1.0);
        assert!(matches!(p.substitute_affine(&[1.0, 2.0], &[0.0]), Err(PolynomialError::ArityMismatch { .. })));
        assert!(matches!(
            p.substitute_affine(&[f64::NAN], &[0.0]),
            Err(PolynomialError::NonFiniteSubstitution { index: 0, .. })
        ));
    }

    #[test]
    fn product_expands_binomial() {
        let names = vars(&["x"]);
        let lin = Polynomial::from_basis(names, 1, &[1.0, 1.0]).unwrap();
        let sq = lin.product(&lin);
        assert_eq!(sq.coefficient_of(&[2]), 1.0);
        assert_eq!(sq.coefficient_of(&[1]), 2.0);
        assert_eq!(sq.constant_term(), 1.0);
    }
}
