//src/report_reader.rs

use ahash::AHashMap;
use std::cmp::Ordering;

use crate::complex::is_species_complex;
use crate::error::{ReportError, Result};
use crate::result_sorter::compare_entries;
use crate::thresholds::Thresholds;
use crate::types::{Rank, RankBuckets, RankCode, RankLevel, ReportRow, ResultEntry};

/// Kraken2 indents names by two spaces per level.
const INDENT_WIDTH: usize = 2;

/// Parses one line of a Kraken2 report in either layout:
/// ```text
/// <pct>\t<reads_clade>\t<reads_direct>\t<rank>\t<taxid>\t<name>
/// <pct>\t<reads_clade>\t<reads_direct>\t<minimizers>\t<distinct>\t<rank>\t<taxid>\t<name>
/// ```
/// Returns `None` for anything else (blank lines, headers, bad numbers).
pub fn parse_report_line(line: &str) -> Option<ReportRow> {
    let line = line.trim_end_matches(['\r', '\n']);
    let parts: Vec<&str> = line.split('\t').collect();

    // Standard report, or one written with --report-minimizer-data
    let (rank_str, taxid_str, raw_name) = match parts.len() {
        6 => (parts[3], parts[4], parts[5]),
        8 => {
            // minimizer columns must still be numeric
            parts[3].trim().parse::<u64>().ok()?;
            parts[4].trim().parse::<u64>().ok()?;
            (parts[5], parts[6], parts[7])
        }
        _ => return None,
    };

    let percentage: f64 = parts[0].trim().parse().ok()?;
    if !(0.0..=100.0).contains(&percentage) {
        return None;
    }
    let reads_clade: u64 = parts[1].trim().parse().ok()?;
    let reads_direct: u64 = parts[2].trim().parse().ok()?;
    let taxon_id: u64 = taxid_str.trim().parse().ok()?;

    let name = raw_name.trim();
    if name.is_empty() {
        return None;
    }
    let indent = raw_name.len() - raw_name.trim_start().len();

    Some(ReportRow {
        percentage,
        reads_clade,
        reads_direct,
        rank: RankCode::parse(rank_str),
        taxon_id,
        name: name.to_string(),
        depth: indent / INDENT_WIDTH,
    })
}

/// Parses every well-formed row of a report, dropping the rest.
///
/// Fails only when not a single row could be parsed.
pub fn parse_report(report_text: &str) -> Result<Vec<ReportRow>> {
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for line in report_text.lines() {
        match parse_report_line(line) {
            Some(row) => rows.push(row),
            None => {
                if !line.trim().is_empty() {
                    dropped += 1;
                }
            }
        }
    }

    if dropped > 0 {
        log::debug!("Dropped {dropped} malformed report line(s)");
    }

    if rows.is_empty() {
        return Err(ReportError::Parse(format!(
            "no parseable rows ({dropped} malformed line(s))"
        )));
    }

    Ok(rows)
}

/// Reads a Kraken2 report into per-rank candidate buckets.
///
/// A row lands in the Family, Genus or Species bucket when its rank code is
/// exactly `F`, `G` or `S`, and additionally in the Species complex bucket
/// when it sits at or below genus and carries a complex-style name. Only rows
/// passing `thresholds` are kept. Lists are unordered; `warnings` is left at
/// its default for [`crate::result_sorter::sort_result`] to fill in.
pub fn read_report(report_text: &str, thresholds: &Thresholds) -> Result<RankBuckets> {
    let rows = parse_report(report_text)?;
    Ok(bucket_rows(&rows, thresholds))
}

/// Buckets already-parsed rows.
pub fn bucket_rows(rows: &[ReportRow], thresholds: &Thresholds) -> RankBuckets {
    let mut buckets = RankBuckets::default();
    let mut seen: AHashMap<(Rank, &str), usize> = AHashMap::new();

    for row in rows {
        if !thresholds.passes(row.percentage, row.reads_clade) {
            continue;
        }

        let literal = if row.rank.is_exactly(RankLevel::Family) {
            Some(Rank::Family)
        } else if row.rank.is_exactly(RankLevel::Genus) {
            Some(Rank::Genus)
        } else if row.rank.is_exactly(RankLevel::Species) {
            Some(Rank::Species)
        } else {
            None
        };

        let complex = is_species_complex(&row.rank, &row.name);
        if let Some(rank) = literal {
            push_unique(&mut buckets, &mut seen, rank, row);
        }
        if complex {
            push_unique(&mut buckets, &mut seen, Rank::SpeciesComplex, row);
        }
        if literal.is_none() && !complex && row.rank.is_at_or_below_genus() {
            log::debug!("Not bucketed: {} ({})", row.name, row.rank);
        }
    }

    log::debug!(
        "Candidates: {} family, {} genus, {} species complex, {} species",
        buckets.family.len(),
        buckets.genus.len(),
        buckets.species_complex.len(),
        buckets.species.len()
    );

    buckets
}

/// Adds `row` to `rank`, or replaces an existing entry of the same name if
/// `row` is more abundant.
fn push_unique<'a>(
    buckets: &mut RankBuckets,
    seen: &mut AHashMap<(Rank, &'a str), usize>,
    rank: Rank,
    row: &'a ReportRow,
) {
    let entry = ResultEntry::from(row);
    let bucket = buckets.get_mut(rank);
    match seen.get(&(rank, row.name.as_str())).copied() {
        Some(idx) => {
            if compare_entries(&entry, &bucket[idx]) == Ordering::Less {
                bucket[idx] = entry;
            }
        }
        None => {
            seen.insert((rank, row.name.as_str()), bucket.len());
            bucket.push(entry);
        }
    }
}
