//! Inclusive row intervals into the shared sample matrix.

use std::ops::RangeInclusive;

/// Inclusive interval `[start, end]` of row indices.
///
/// Spans are plain values: every structure downstream of concatenation
/// refers to samples through spans or explicit row lists, never through
/// copied rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Callers guarantee `start <= end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Span { start, end }
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn contains(&self, row: usize) -> bool {
        self.start <= row && row <= self.end
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
