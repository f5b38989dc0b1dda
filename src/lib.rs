// src/lib.rs
pub mod batch;
pub mod complex;
pub mod error;
pub mod report_file;
pub mod report_reader;
pub mod result_sorter;
pub mod thresholds;
pub mod types;

use std::path::Path;

pub use crate::batch::summarise_reports_parallel;
pub use crate::error::{ReportError, Result};
pub use crate::report_file::read_report_file;
pub use crate::report_reader::read_report;
pub use crate::result_sorter::sort_result;
pub use crate::thresholds::Thresholds;
pub use crate::types::{BucketValue, Rank, RankBuckets, ResultEntry, SampleSummary, Warnings};

/// Reads and sorts a report in one go.
pub fn summarise_report(report_text: &str, thresholds: &Thresholds) -> Result<SampleSummary> {
    let buckets = read_report(report_text, thresholds)?;
    Ok(sort_result(&buckets, thresholds))
}

/// Same as [`summarise_report`] but validates a raw threshold pair first.
pub fn summarise_report_with(report_text: &str, pct_threshold: f64, num_threshold: i64) -> Result<SampleSummary> {
    let thresholds = Thresholds::new(pct_threshold, num_threshold)?;
    summarise_report(report_text, &thresholds)
}

/// Unified function to load a report (plain or gzipped) and summarise it
pub fn summarise_report_file<P: AsRef<Path>>(path: P, thresholds: &Thresholds) -> Result<SampleSummary> {
    let path = path.as_ref();

    // 1. Load report text
    let text = read_report_file(path)?;

    // 2. Bucket and sort
    let summary = summarise_report(&text, thresholds)?;

    log::info!(
        "{}: top species {}, mykrobe={}",
        path.display(),
        summary.species.name_at(0).unwrap_or("none"),
        summary.warnings.mykrobe
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarise_report_with_validates_first() {
        // invalid thresholds win over an unparseable report
        let err = summarise_report_with("", -1.0, 10).unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(_)));

        let err = summarise_report_with("", 1.0, 10).unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[test]
    fn test_summarise_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tab");
        std::fs::write(
            &path,
            "95.00\t475000\t0\tF\t1762\t  Mycobacteriaceae\n94.00\t470000\t470000\tS\t1773\t    Mycobacterium tuberculosis\n",
        )
        .unwrap();

        let summary = summarise_report_file(&path, &Thresholds::default()).unwrap();
        assert_eq!(summary.family.name_at(0), Some("Mycobacteriaceae"));
        assert!(summary.genus.notes().is_some());
        assert!(summary.warnings.mykrobe);
    }
}
