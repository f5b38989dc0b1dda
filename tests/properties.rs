//! Property-based tests for report reading and sorting.

use proptest::prelude::*;

use kraken2_report_rs::result_sorter::HOST_SPECIES;
use kraken2_report_rs::{read_report, sort_result, BucketValue, Rank, SampleSummary, Thresholds};

const NAMES: &[&str] = &[
    "Mycobacterium tuberculosis",
    "Mycobacterium avium",
    "Mycobacterium tuberculosis complex",
    "Mycobacterium avium complex (MAC)",
    "Mycobacteriaceae",
    "Mycobacterium",
    "Streptococcus gordonii",
    HOST_SPECIES,
];

const RANKS: &[&str] = &["F", "G", "G1", "S", "S1", "O", "-"];

/// One report line built from arbitrary but well-formed fields.
fn arb_line() -> impl Strategy<Value = String> {
    (
        0.0f64..100.0,
        0u64..1_000_000,
        0usize..NAMES.len(),
        0usize..RANKS.len(),
        0usize..12,
    )
        .prop_map(|(pct, reads, name, rank, depth)| {
            format!(
                "{:.2}\t{}\t{}\t{}\t{}\t{}{}",
                pct,
                reads,
                reads / 2,
                RANKS[rank],
                name + 1,
                "  ".repeat(depth),
                NAMES[name]
            )
        })
}

fn arb_report() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_line(), 1..40).prop_map(|lines| lines.join("\n"))
}

fn summarise(report: &str, pct: f64, num: i64) -> SampleSummary {
    let thresholds = Thresholds::new(pct, num).unwrap();
    let buckets = read_report(report, &thresholds).unwrap();
    sort_result(&buckets, &thresholds)
}

fn len(value: &BucketValue) -> usize {
    value.entries().map_or(0, |e| e.len())
}

proptest! {
    #[test]
    fn summarise_is_deterministic(report in arb_report(), pct in 0.0f64..10.0, num in 0i64..200_000) {
        prop_assert_eq!(summarise(&report, pct, num), summarise(&report, pct, num));
    }

    #[test]
    fn raising_thresholds_never_grows_buckets(
        report in arb_report(),
        pct in 0.0f64..50.0,
        pct_step in 0.0f64..50.0,
        num in 0i64..500_000,
        num_step in 0i64..500_000
    ) {
        let loose = summarise(&report, pct, num);
        let strict = summarise(&report, pct + pct_step, num + num_step);
        for rank in Rank::ALL {
            prop_assert!(len(strict.get(rank)) <= len(loose.get(rank)), "{} grew", rank);
        }
    }

    #[test]
    fn buckets_are_sorted_unique_and_never_empty(report in arb_report(), num in 0i64..200_000) {
        let summary = summarise(&report, 1.0, num);
        for rank in Rank::ALL {
            match summary.get(rank) {
                BucketValue::Present(entries) => {
                    prop_assert!(!entries.is_empty());
                    for pair in entries.windows(2) {
                        prop_assert!(pair[0].reads_clade >= pair[1].reads_clade);
                        if pair[0].reads_clade == pair[1].reads_clade {
                            prop_assert!(pair[0].percentage >= pair[1].percentage);
                        }
                    }
                    let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
                    names.sort_unstable();
                    names.dedup();
                    prop_assert_eq!(names.len(), entries.len());
                    for e in entries {
                        prop_assert!(e.percentage >= 1.0 && e.reads_clade as i64 >= num);
                    }
                }
                BucketValue::Absent { notes } => prop_assert!(!notes.is_empty()),
            }
        }
    }

    #[test]
    fn mykrobe_iff_single_non_host_species(report in arb_report(), num in 0i64..200_000) {
        let summary = summarise(&report, 1.0, num);
        let organisms = summary
            .species
            .entries()
            .map_or(0, |e| e.iter().filter(|e| e.name != HOST_SPECIES).count());
        prop_assert_eq!(summary.warnings.mykrobe, organisms == 1);
    }

    #[test]
    fn sorting_twice_changes_nothing(report in arb_report()) {
        let thresholds = Thresholds::default();
        let buckets = read_report(&report, &thresholds).unwrap();
        let once = sort_result(&buckets, &thresholds);

        let mut again = buckets.clone();
        for rank in Rank::ALL {
            *again.get_mut(rank) = once.get(rank).entries().map(|e| e.to_vec()).unwrap_or_default();
        }
        prop_assert_eq!(sort_result(&again, &thresholds), once);
    }
}
