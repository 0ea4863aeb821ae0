//! User-declared semantics for reset variables.
//!
//! Purpose
//! -------
//! Let the caller override the regressed assignment of individual variables
//! with knowledge the data cannot reveal reliably: a variable that never
//! jumps, one that only takes values from a finite set, or one that is
//! always reset to the same value.
//!
//! Key behaviors
//! -------------
//! - [`Annotation`] is a closed set of three kinds; [`Annotation::apply`] is
//!   the one place where a kind turns into an assignment row.
//! - Text forms are `continuous`, `pool(v1, v2, ...)` and `constant(v)`;
//!   [`parse_annotations`] reads a `{x: continuous, v: pool(0, 1)}` map.
//!
//! Conventions
//! -----------
//! - `Pool` snaps every observed destination value to its nearest declared
//!   value (first declared wins ties) and keeps the most frequent one, ties
//!   again going to the first declared value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;

use crate::{
    inference::errors::{InferenceError, InferenceResult},
    transition::assignment::AffineRow,
};

/// Override kind for one variable's assignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Annotation {
    /// The variable passes through the jump unchanged.
    Continuous,
    /// The variable is reset to one of these values.
    Pool(Vec<f64>),
    /// The variable is reset to this value.
    Constant(f64),
}

impl Annotation {
    /// Replace `row`, the assignment of variable `variable`, according to
    /// this annotation.
    ///
    /// Parameters
    /// ----------
    /// - `variable`: index of the assigned variable among all variables.
    /// - `observed`: the variable's values at the destination points of the
    ///   connection.
    /// - `row`: the regressed row, overwritten in place.
    pub fn apply(&self, variable: usize, observed: ArrayView1<f64>, row: &mut AffineRow) {
        row.coefficients.fill(0.0);
        match self {
            Annotation::Continuous => {
                row.coefficients[variable] = 1.0;
                row.intercept = 0.0;
            }
            Annotation::Pool(values) => {
                row.intercept = pool_vote(values, observed);
            }
            Annotation::Constant(value) => {
                row.intercept = *value;
            }
        }
    }
}

/// Majority value of `observed` after snapping to `pool`.
fn pool_vote(pool: &[f64], observed: ArrayView1<f64>) -> f64 {
    let mut counts = vec![0usize; pool.len()];
    for &x in observed {
        let mut nearest = 0;
        for (k, &p) in pool.iter().enumerate() {
            if (x - p).abs() < (x - pool[nearest]).abs() {
                nearest = k;
            }
        }
        if let Some(c) = counts.get_mut(nearest) {
            *c += 1;
        }
    }
    let mut winner = 0;
    for (k, &c) in counts.iter().enumerate() {
        if c > counts[winner] {
            winner = k;
        }
    }
    pool.get(winner).copied().unwrap_or(0.0)
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Continuous => write!(f, "continuous"),
            Annotation::Pool(values) => {
                write!(f, "pool(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", v)?;
                }
                write!(f, ")")
            }
            Annotation::Constant(value) => write!(f, "constant({:?})", value),
        }
    }
}

impl FromStr for Annotation {
    type Err = InferenceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let invalid = |reason| InferenceError::InvalidAnnotation { text: text.to_string(), reason };
        if trimmed == "continuous" {
            return Ok(Annotation::Continuous);
        }
        let (head, args) = trimmed
            .strip_suffix(')')
            .and_then(|body| body.split_once('('))
            .ok_or_else(|| invalid("expected continuous, pool(...) or constant(...)"))?;
        let values = args
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|a| a.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| invalid("arguments must be finite numbers"))?;
        match (head.trim(), values.as_slice()) {
            ("pool", []) => Err(invalid("pool needs at least one value")),
            ("pool", _) => Ok(Annotation::Pool(values)),
            ("constant", [value]) => Ok(Annotation::Constant(*value)),
            ("constant", _) => Err(invalid("constant takes exactly one value")),
            _ => Err(invalid("expected continuous, pool(...) or constant(...)")),
        }
    }
}

/// Parse a map of the form `{x: continuous, v: pool(0, 1)}`.
///
/// Braces are optional and an empty string yields an empty map.
///
/// Errors
/// ------
/// - `InvalidAnnotation` for a missing `:`, an empty variable name, a
///   variable listed twice, or a malformed annotation.
pub fn parse_annotations(text: &str) -> InferenceResult<BTreeMap<String, Annotation>> {
    let body = text.trim();
    let body = body.strip_prefix('{').and_then(|b| b.strip_suffix('}')).unwrap_or(body);
    let mut out = BTreeMap::new();
    for entry in split_top_level(body) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (name, annotation) = entry
            .split_once(':')
            .ok_or_else(|| InferenceError::InvalidAnnotation { text: entry.to_string(), reason: "expected name: kind" })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(InferenceError::InvalidAnnotation { text: entry.to_string(), reason: "empty variable name" });
        }
        if out.insert(name.to_string(), annotation.parse()?).is_some() {
            return Err(InferenceError::InvalidAnnotation { text: entry.to_string(), reason: "variable listed twice" });
        }
    }
    Ok(out)
}

/// Split on commas that are not inside parentheses.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
