//! Per-call indexing statistics.

use serde::Serialize;
use std::fmt;

/// Counters describing one indexing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Rows in the annotated batch.
    pub rows: usize,
    /// Distinct canonical keys observed.
    pub distinct_keys: usize,
    /// Observed keys already present in the prior mapping.
    pub reused_keys: usize,
    /// Keys that received a new index.
    pub minted_keys: usize,
    /// Observed keys left unmapped (closed-set calls only).
    pub excluded_keys: usize,
    /// Rows that received an index.
    pub matched_rows: usize,
    /// Rows left with a null index.
    pub unmatched_rows: usize,
    /// Pairs in the resulting mapping.
    pub mapping_size: usize,
}

impl IndexStats {
    /// Fraction of rows that received an index, in `[0, 1]`.
    ///
    /// An empty batch counts as fully resolved.
    pub fn match_ratio(&self) -> f64 {
        if self.rows == 0 {
            1.0
        } else {
            self.matched_rows as f64 / self.rows as f64
        }
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} matched={} unmatched={} keys={} reused={} minted={} excluded={} mapping={}",
            self.rows,
            self.matched_rows,
            self.unmatched_rows,
            self.distinct_keys,
            self.reused_keys,
            self.minted_keys,
            self.excluded_keys,
            self.mapping_size
        )
    }
}
