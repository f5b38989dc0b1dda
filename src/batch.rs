//src/batch.rs

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::summarise_report_file;
use crate::thresholds::Thresholds;
use crate::types::SampleSummary;

/// One finished report: where it came from and what it produced.
pub type BatchItem = (PathBuf, Result<SampleSummary>);

/// Summarises many reports in parallel.
///
/// Every report is independent, so we fold per thread and concatenate.
/// Results come back in input order; a failing report does not stop the rest.
pub fn summarise_reports_parallel<P: AsRef<Path> + Sync>(
    paths: &[P],
    thresholds: &Thresholds,
) -> Vec<BatchItem> {
    let mut indexed: Vec<(usize, BatchItem)> = paths
        .par_iter()
        .enumerate()
        .fold(
            // Thread-local identity
            || Vec::with_capacity(16),
            |mut acc, (idx, path)| {
                let path = path.as_ref();
                let result = summarise_report_file(path, thresholds);
                if let Err(e) = &result {
                    log::error!("{}: {}", path.display(), e);
                }
                acc.push((idx, (path.to_path_buf(), result)));
                acc
            },
        )
        .reduce(Vec::new, merge_partial_results);

    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, item)| item).collect()
}

/// Merges two partial batches from different threads.
fn merge_partial_results(
    mut a: Vec<(usize, BatchItem)>,
    mut b: Vec<(usize, BatchItem)>,
) -> Vec<(usize, BatchItem)> {
    a.append(&mut b);
    a
}
