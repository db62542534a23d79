//! Histogram of simulated outcomes for display.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistogramBin {
    /// Inclusive lower edge of the bin.
    pub lo: i64,
    pub count: usize,
}

/// Clip every sample to `[clip_lo, clip_hi]` and count per bin of `bin_width`.
///
/// Bins are aligned to multiples of `bin_width` and returned in ascending
/// order; empty bins are omitted. A width of 1 counts each distinct value.
/// Non-positive widths are treated as 1, and swapped clip bounds are reordered.
pub fn histogram(diffs: &[i64], clip_lo: i64, clip_hi: i64, bin_width: i64) -> Vec<HistogramBin> {
    let (lo, hi) = if clip_lo <= clip_hi {
        (clip_lo, clip_hi)
    } else {
        (clip_hi, clip_lo)
    };
    let width = bin_width.max(1);

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for d in diffs {
        let clipped = (*d).clamp(lo, hi);
        *counts.entry(clipped.div_euclid(width) * width).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(lo, count)| HistogramBin { lo, count })
        .collect()
}
