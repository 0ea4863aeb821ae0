//! Monomials, the canonical monomial basis, and multinomial helpers.
//!
//! Purpose
//! -------
//! Represent a monomial `x_1^{e_1} · … · x_n^{e_n}` by its exponent vector and
//! fix a single ordering of monomials that every polynomial in the crate
//! shares: flow feature columns, guard coefficients and printed expressions
//! all enumerate monomials in this order.
//!
//! Conventions
//! -----------
//! - Canonical order is graded-descending: higher total degree first; ties
//!   are broken by comparing exponent vectors lexicographically, larger
//!   first. Over `(x, y, z)` with degree 2 this yields
//!   `x², xy, xz, y², yz, z², x, y, z, 1`.
//! - The constant monomial always comes last.

use std::cmp::Ordering;

/// Exponent vector of a single monomial.
///
/// Ordering follows the canonical graded-descending convention described in
/// the module docs, so a `BTreeMap<Monomial, _>` iterates in basis order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Monomial {
    exponents: Vec<u32>,
}

impl Monomial {
    pub fn new(exponents: Vec<u32>) -> Self {
        Monomial { exponents }
    }

    /// The monomial `1` over `nvars` variables.
    pub fn constant(nvars: usize) -> Self {
        Monomial { exponents: vec![0; nvars] }
    }

    /// The monomial `x_index` over `nvars` variables.
    pub fn variable(nvars: usize, index: usize) -> Self {
        let mut exponents = vec![0; nvars];
        if index < nvars {
            exponents[index] = 1;
        }
        Monomial { exponents }
    }

    pub fn exponents(&self) -> &[u32] {
        &self.exponents
    }

    pub fn nvars(&self) -> usize {
        self.exponents.len()
    }

    /// Total degree `Σ e_i`.
    pub fn degree(&self) -> u32 {
        self.exponents.iter().sum()
    }

    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Evaluate at `point`; the caller guarantees `point.len() == nvars`.
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        self.exponents
            .iter()
            .zip(point)
            .filter(|(e, _)| **e > 0)
            .map(|(&e, &x)| x.powi(e as i32))
            .product()
    }

    /// Product of two monomials over the same variables.
    pub fn product(&self, other: &Monomial) -> Monomial {
        let exponents = self.exponents.iter().zip(&other.exponents).map(|(a, b)| a + b).collect();
        Monomial { exponents }
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        other.degree().cmp(&self.degree()).then_with(|| other.exponents.cmp(&self.exponents))
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Exponent vectors of exact total degree `degree` over `nvars` variables,
/// in lexicographically descending order.
pub fn exponents_of_degree(nvars: usize, degree: u32) -> Vec<Vec<u32>> {
    let mut out = Vec::with_capacity(ncombs_of_degree(nvars, degree));
    let mut current = Vec::with_capacity(nvars);
    fill_exponents(nvars, degree, &mut current, &mut out);
    out
}

fn fill_exponents(remaining_vars: usize, remaining_degree: u32, current: &mut Vec<u32>, out: &mut Vec<Vec<u32>>) {
    if remaining_vars == 0 {
        if remaining_degree == 0 {
            out.push(current.clone());
        }
        return;
    }
    if remaining_vars == 1 {
        current.push(remaining_degree);
        out.push(current.clone());
        current.pop();
        return;
    }
    for e in (0..=remaining_degree).rev() {
        current.push(e);
        fill_exponents(remaining_vars - 1, remaining_degree - e, current, out);
        current.pop();
    }
}

/// All monomials of total degree `≤ degree` over `nvars` variables, in
/// canonical order. Size is `C(nvars + degree, degree)`.
pub fn complete_basis(nvars: usize, degree: u32) -> Vec<Monomial> {
    (0..=degree)
        .rev()
        .flat_map(|d| exponents_of_degree(nvars, d))
        .map(Monomial::new)
        .collect()
}

/// Number of monomials of exact degree `degree` over `nvars` variables
/// (stars and bars, `C(nvars + degree - 1, degree)`).
pub fn ncombs_of_degree(nvars: usize, degree: u32) -> usize {
    if nvars == 0 {
        return usize::from(degree == 0);
    }
    binomial(nvars + degree as usize - 1, degree as usize)
}

/// Size of the complete basis of degree `≤ degree` over `nvars` variables.
pub fn basis_size(nvars: usize, degree: u32) -> usize {
    binomial(nvars + degree as usize, degree as usize)
}

/// Multinomial coefficient `n! / Π r_i!` with `n = Σ r_i`.
///
/// Accumulated as a product of binomial factors so intermediate values stay
/// close to the final magnitude.
pub fn multinomial(exponents: &[u32]) -> f64 {
    let mut result = 1.0;
    let mut running = 0u32;
    for &r in exponents {
        for k in 1..=r {
            running += 1;
            result *= running as f64 / k as f64;
        }
    }
    result.round()
}

fn binomial(n: usize, k: usize) -> usize {
    let k = k.min(n.saturating_sub(k));
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The canonical graded-descending order of the complete basis.
    // - Monomial counting and multinomial coefficients.
    // - Evaluation and products of monomials.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the canonical basis order over three variables at degree 2.
    //
    // Given
    // -----
    // - `nvars = 3`, `degree = 2`.
    //
    // Expect
    // ------
    // - x², xy, xz, y², yz, z², x, y, z, 1 in that order.
    fn complete_basis_is_graded_descending() {
        // Act
        let basis = complete_basis(3, 2);
        let exps: Vec<&[u32]> = basis.iter().map(|m| m.exponents()).collect();

        // Assert
        let expected: Vec<&[u32]> = vec![
            &[2, 0, 0],
            &[1, 1, 0],
            &[1, 0, 1],
            &[0, 2, 0],
            &[0, 1, 1],
            &[0, 0, 2],
            &[1, 0, 0],
            &[0, 1, 0],
            &[0, 0, 1],
            &[0, 0, 0],
        ];
        assert_eq!(exps, expected);
    }

    #[test]
    // Purpose
    // -------
    // Verify that sorting with `Ord` reproduces the generated basis order.
    //
    // Given
    // -----
    // - The degree-3 basis over two variables, reversed.
    //
    // Expect
    // ------
    // - Sorting restores the generated order.
    fn ord_matches_generation_order() {
        // Arrange
        let basis = complete_basis(2, 3);
        let mut shuffled: Vec<Monomial> = basis.iter().rev().cloned().collect();

        // Act
        shuffled.sort();

        // Assert
        assert_eq!(shuffled, basis);
    }

    #[test]
    // Purpose
    // -------
    // Check counting helpers against the generated sets.
    //
    // Given
    // -----
    // - Several (nvars, degree) pairs including zero variables.
    //
    // Expect
    // ------
    // - `ncombs_of_degree` and `basis_size` agree with enumeration.
    fn counting_helpers_match_enumeration() {
        for nvars in 0..4 {
            for degree in 0..4 {
                assert_eq!(exponents_of_degree(nvars, degree).len(), ncombs_of_degree(nvars, degree));
                assert_eq!(complete_basis(nvars, degree).len(), basis_size(nvars, degree));
            }
        }
        assert_eq!(basis_size(3, 2), 10);
        assert_eq!(complete_basis(0, 2).len(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Verify multinomial coefficients on small known cases.
    //
    // Given
    // -----
    // - Exponent vectors (2, 1), (1, 1, 1), (3) and (0, 0).
    //
    // Expect
    // ------
    // - 3, 6, 1 and 1 respectively.
    fn multinomial_known_values() {
        assert_eq!(multinomial(&[2, 1]), 3.0);
        assert_eq!(multinomial(&[1, 1, 1]), 6.0);
        assert_eq!(multinomial(&[3]), 1.0);
        assert_eq!(multinomial(&[0, 0]), 1.0);
        assert_eq!(multinomial(&[2, 2]), 6.0);
    }

    #[test]
    fn evaluate_and_product() {
        let xy = Monomial::new(vec![1, 1]);
        let x2 = Monomial::new(vec![2, 0]);
        assert_eq!(xy.evaluate(&[2.0, 3.0]), 6.0);
        assert_eq!(xy.product(&x2).exponents(), &[3, 1]);
        assert_eq!(Monomial::constant(2).evaluate(&[5.0, 7.0]), 1.0);
        assert!(Monomial::constant(2).is_constant());
        assert_eq!(Monomial::variable(3, 1).exponents(), &[0, 1, 0]);
    }
}
