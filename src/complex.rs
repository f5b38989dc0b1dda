//src/complex.rs

//! Name patterns that mark a taxon as a species complex.
//!
//! Kraken2 reports complexes under whatever intermediate rank the taxonomy
//! gives them (usually `G1`), so membership is decided from the name alone:
//! "Mycobacterium tuberculosis complex", "Mycobacterium avium complex (MAC)".

use crate::types::RankCode;

/// Words that name a complex when they appear as a whole word.
const COMPLEX_KEYWORDS: &[&str] = &["complex"];

/// Allowed length of a parenthesised acronym such as `(MAC)` or `(MTBC)`.
const ACRONYM_LEN: std::ops::RangeInclusive<usize> = 2..=6;

/// True if `name` reads like a species-complex name.
pub fn is_complex_name(name: &str) -> bool {
    has_complex_keyword(name) || has_parenthesised_acronym(name)
}

/// True if a row with this rank and name belongs in the species-complex bucket.
pub fn is_species_complex(rank: &RankCode, name: &str) -> bool {
    rank.is_at_or_below_genus() && is_complex_name(name)
}

fn has_complex_keyword(name: &str) -> bool {
    name.split(|c: char| !c.is_alphanumeric())
        .any(|word| COMPLEX_KEYWORDS.iter().any(|kw| word.eq_ignore_ascii_case(kw)))
}

fn has_parenthesised_acronym(name: &str) -> bool {
    let mut rest = name;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(')') else {
            return false;
        };
        let inner = &after[..close];
        if ACRONYM_LEN.contains(&inner.len()) && inner.chars().all(|c| c.is_ascii_uppercase()) {
            return true;
        }
        rest = &after[close + 1..];
    }
    false
}
