//! Discovery of observed mode-to-mode jumps.
//!
//! Every pair of consecutive segments in one trajectory is a jump from the
//! mode of the first to the mode of the second. Jumps are grouped by
//! `(src, dst)` mode pair; self-loops are kept. Pairs are listed by
//! walking `i` over modes and `j` from `i` upwards, emitting `(i, j)` and
//! then `(j, i)`, and skipping pairs that were never observed.

use std::collections::BTreeMap;

use crate::{clustering::ModePartition, segmentation::Segmentation};

/// One observed jump, as sample-matrix rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Last exact row of the outgoing segment.
    pub end: usize,
    /// First exact row of the following segment.
    pub start: usize,
}

/// All jumps between one ordered pair of modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub src: usize,
    pub dst: usize,
    /// In trajectory order, then time order.
    pub links: Vec<Link>,
}

/// Collect every non-empty connection.
pub fn discover_connections(segmentation: &Segmentation, partition: &ModePartition) -> Vec<Connection> {
    let mut grouped: BTreeMap<(usize, usize), Vec<Link>> = BTreeMap::new();
    for ids in segmentation.by_trajectory() {
        for pair in ids.windows(2) {
            let (from, to) = (segmentation.segment(pair[0]), segmentation.segment(pair[1]));
            let key = (partition.mode_of(pair[0]), partition.mode_of(pair[1]));
            grouped.entry(key).or_default().push(Link { end: from.exact.end, start: to.exact.start });
        }
    }

    let n_modes = partition.len();
    let mut out = Vec::with_capacity(grouped.len());
    for i in 0..n_modes {
        for j in i..n_modes {
            let keys = if i == j { vec![(i, i)] } else { vec![(i, j), (j, i)] };
            for key in keys {
                if let Some(links) = grouped.remove(&key) {
                    out.push(Connection { src: key.0, dst: key.1, links });
                }
            }
        }
    }
    out
}
