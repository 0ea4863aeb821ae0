//! Small helpers shared by several pipeline stages.

use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView2, Axis};

/// Copy the listed rows of `values` into a new matrix, in list order.
///
/// Only used for the handful of rows a transition touches; bulk stages read
/// the sample matrix through views.
#[inline]
pub fn gather_rows(values: ArrayView2<f64>, rows: &[usize]) -> Array2<f64> {
    values.select(Axis(0), rows)
}

/// First name that occurs more than once, scanning left to right.
pub fn first_duplicate<'a>(names: impl IntoIterator<Item = &'a String>) -> Option<&'a str> {
    let mut seen = BTreeSet::new();
    names.into_iter().find(|name| !seen.insert(name.as_str())).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn gathers_rows_in_list_order() {
        let m = array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]];
        assert_eq!(gather_rows(m.view(), &[2, 0, 2]), array![[4.0, 5.0], [0.0, 1.0], [4.0, 5.0]]);
        assert_eq!(gather_rows(m.view(), &[]).nrows(), 0);
    }

    #[test]
    fn finds_first_duplicate() {
        let names: Vec<String> = ["u", "x", "v", "x", "u"].iter().map(|s| s.to_string()).collect();
        assert_eq!(first_duplicate(&names), Some("x"));
        assert_eq!(first_duplicate(&names[..3]), None);
    }
}
