//src/thresholds.rs

use crate::error::{ReportError, Result};
use crate::types::ResultEntry;

/// Minimum percentage and minimum clade read count a row needs to be reported.
///
/// The same pair is handed to the reader and the sorter; both filter through
/// [`Thresholds::passes`] so they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pct: f64,
    num: u64,
}

impl Thresholds {
    /// Validates a threshold pair.
    ///
    /// `pct` must be finite and within `[0, 100]`, `num` must be non-negative.
    pub fn new(pct: f64, num: i64) -> Result<Self> {
        if !pct.is_finite() || pct < 0.0 || pct > 100.0 {
            return Err(ReportError::InvalidArgument(format!(
                "percentage threshold must be within [0, 100], got {pct}"
            )));
        }
        let num = u64::try_from(num).map_err(|_| {
            ReportError::InvalidArgument(format!(
                "read count threshold must be non-negative, got {num}"
            ))
        })?;
        Ok(Self { pct, num })
    }

    pub fn pct(&self) -> f64 {
        self.pct
    }

    pub fn num(&self) -> u64 {
        self.num
    }

    /// Qualification uses cumulative clade reads at every rank.
    pub fn passes(&self, percentage: f64, reads_clade: u64) -> bool {
        percentage >= self.pct && reads_clade >= self.num
    }

    pub fn passes_entry(&self, entry: &ResultEntry) -> bool {
        self.passes(entry.percentage, entry.reads_clade)
    }
}

impl Default for Thresholds {
    /// 1% of reads and 10,000 clade reads.
    fn default() -> Self {
        Self { pct: 1.0, num: 10_000 }
    }
}
