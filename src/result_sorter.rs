//src/result_sorter.rs

use ahash::AHashSet;
use std::cmp::Ordering;

use crate::complex::is_complex_name;
use crate::thresholds::Thresholds;
use crate::types::{BucketValue, Rank, RankBuckets, ResultEntry, SampleSummary, Warnings};

/// Host reads are reported but never count towards sample purity.
pub const HOST_SPECIES: &str = "Homo sapiens";

pub fn is_host(name: &str) -> bool {
    name == HOST_SPECIES
}

/// Orders by clade reads (desc), then percentage (desc), then name.
pub fn compare_entries(a: &ResultEntry, b: &ResultEntry) -> Ordering {
    b.reads_clade
        .cmp(&a.reads_clade)
        .then_with(|| b.percentage.total_cmp(&a.percentage))
        .then_with(|| a.name.cmp(&b.name))
}

/// Filters, sorts and de-duplicates one bucket.
///
/// The threshold check here is the authoritative one; running it over lists
/// the reader already filtered changes nothing.
pub fn sort_bucket(rank: Rank, entries: &[ResultEntry], thresholds: &Thresholds) -> Vec<ResultEntry> {
    let mut kept: Vec<ResultEntry> = entries
        .iter()
        .filter(|e| thresholds.passes_entry(e))
        .filter(|e| rank != Rank::SpeciesComplex || is_complex_name(&e.name))
        .cloned()
        .collect();

    kept.sort_by(compare_entries);

    // most abundant copy of each name wins
    let mut seen = AHashSet::new();
    kept.retain(|e| seen.insert(e.name.clone()));
    kept
}

/// Why a rank has nothing to show.
fn absence_note(rank: Rank, species_called: bool) -> String {
    match rank {
        Rank::Family => "No family classification above threshold".to_string(),
        Rank::Genus => "No genus classification above threshold".to_string(),
        Rank::SpeciesComplex if species_called => {
            "Species identified does not belong to a recognised species complex".to_string()
        }
        Rank::SpeciesComplex => "No species complex classification above threshold".to_string(),
        Rank::Species => "No species classification above threshold".to_string(),
    }
}

/// Computes the purity warning from the final Species list.
///
/// `mykrobe` is set only when exactly one non-host species qualified: none
/// means no confident call, more than one means a mixed sample.
pub fn purity_warnings(species: &[ResultEntry]) -> Warnings {
    let organisms = species.iter().filter(|e| !is_host(&e.name)).count();
    Warnings { mykrobe: organisms == 1 }
}

/// Turns reader buckets into the final summary.
///
/// 1) filter each bucket against `thresholds`
/// 2) sort by abundance and drop duplicate names
/// 3) replace empty buckets with a note
/// 4) derive the mykrobe warning from the Species list
pub fn sort_result(buckets: &RankBuckets, thresholds: &Thresholds) -> SampleSummary {
    let family = sort_bucket(Rank::Family, buckets.get(Rank::Family), thresholds);
    let genus = sort_bucket(Rank::Genus, buckets.get(Rank::Genus), thresholds);
    let species_complex = sort_bucket(Rank::SpeciesComplex, buckets.get(Rank::SpeciesComplex), thresholds);
    let species = sort_bucket(Rank::Species, buckets.get(Rank::Species), thresholds);

    let warnings = purity_warnings(&species);
    let species_called = !species.is_empty();

    let into_value = |rank: Rank, entries: Vec<ResultEntry>| {
        if entries.is_empty() {
            log::debug!("{rank}: no qualifying entries");
            BucketValue::Absent { notes: absence_note(rank, species_called) }
        } else {
            BucketValue::Present(entries)
        }
    };

    let summary = SampleSummary {
        family: into_value(Rank::Family, family),
        genus: into_value(Rank::Genus, genus),
        species_complex: into_value(Rank::SpeciesComplex, species_complex),
        species: into_value(Rank::Species, species),
        warnings,
    };

    match summary.species.entries() {
        None => log::warn!("No confident species call; mykrobe should not be run"),
        Some(entries) if !warnings.mykrobe => log::warn!(
            "Sample looks mixed ({} non-host species); mykrobe should not be run",
            entries.iter().filter(|e| !is_host(&e.name)).count()
        ),
        Some(_) => {}
    }

    summary
}
