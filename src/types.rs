//src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomic level of a report row, without the numeric depth suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankLevel {
    Unclassified,
    Root,
    Domain,
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
    /// `-`, `no rank`, or anything else we do not recognise.
    Unranked,
}

/// Rank code as written by Kraken2: a letter plus an optional depth suffix.
///
/// `G` is a genus, `G1` is a node one level below a genus (where Kraken2 puts
/// species complexes), `S2` is two levels below a species, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankCode {
    pub level: RankLevel,
    pub sub: u8,
}

impl RankCode {
    pub fn new(level: RankLevel, sub: u8) -> Self {
        Self { level, sub }
    }

    /// Parses a Kraken2 rank code (`S`, `G1`, ...). Anything else, including
    /// rank words such as `species`, maps to `Unranked`.
    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        let level_of = |c: char| match c {
            'U' => Some(RankLevel::Unclassified),
            'R' => Some(RankLevel::Root),
            'D' => Some(RankLevel::Domain),
            'K' => Some(RankLevel::Kingdom),
            'P' => Some(RankLevel::Phylum),
            'C' => Some(RankLevel::Class),
            'O' => Some(RankLevel::Order),
            'F' => Some(RankLevel::Family),
            'G' => Some(RankLevel::Genus),
            'S' => Some(RankLevel::Species),
            _ => None,
        };

        let mut chars = code.chars();
        if let Some(first) = chars.next() {
            let rest = chars.as_str();
            if let Some(level) = level_of(first) {
                if rest.is_empty() {
                    return Self::new(level, 0);
                }
                if let Ok(sub) = rest.parse::<u8>() {
                    return Self::new(level, sub);
                }
            }
        }

        Self::new(RankLevel::Unranked, 0)
    }

    /// True for the plain code of `level`, e.g. `S` but not `S1`.
    pub fn is_exactly(&self, level: RankLevel) -> bool {
        self.level == level && self.sub == 0
    }

    /// Genus, species, or any intermediate code beneath either.
    pub fn is_at_or_below_genus(&self) -> bool {
        matches!(self.level, RankLevel::Genus | RankLevel::Species)
    }
}

impl fmt::Display for RankCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let letter = match self.level {
            RankLevel::Unclassified => "U",
            RankLevel::Root => "R",
            RankLevel::Domain => "D",
            RankLevel::Kingdom => "K",
            RankLevel::Phylum => "P",
            RankLevel::Class => "C",
            RankLevel::Order => "O",
            RankLevel::Family => "F",
            RankLevel::Genus => "G",
            RankLevel::Species => "S",
            RankLevel::Unranked => return write!(f, "-"),
        };
        if self.sub == 0 {
            write!(f, "{letter}")
        } else {
            write!(f, "{letter}{}", self.sub)
        }
    }
}

/// A structured representation of one row in a Kraken2 report.
/// For example:
///  %  reads  taxReads  rank  taxID  taxName
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub percentage: f64,
    pub reads_clade: u64,
    pub reads_direct: u64,
    pub rank: RankCode,
    pub taxon_id: u64,
    /// Name with the indentation stripped.
    pub name: String,
    /// Indentation level of the name (two spaces per level).
    pub depth: usize,
}

/// A filtered, display-ready projection of a [`ReportRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub name: String,
    pub percentage: f64,
    pub reads_clade: u64,
    pub reads_direct: u64,
    pub taxon_id: u64,
}

impl From<&ReportRow> for ResultEntry {
    fn from(row: &ReportRow) -> Self {
        Self {
            name: row.name.clone(),
            percentage: row.percentage,
            reads_clade: row.reads_clade,
            reads_direct: row.reads_direct,
            taxon_id: row.taxon_id,
        }
    }
}

/// The four ranks a summary tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Family,
    Genus,
    SpeciesComplex,
    Species,
}

impl Rank {
    pub const ALL: [Rank; 4] = [Rank::Family, Rank::Genus, Rank::SpeciesComplex, Rank::Species];

    /// Key used in the serialized summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Family => "Family",
            Rank::Genus => "Genus",
            Rank::SpeciesComplex => "Species complex",
            Rank::Species => "Species",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sample-level purity signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warnings {
    /// Exactly one non-host species was confidently identified.
    pub mykrobe: bool,
}

/// Unordered per-rank candidates emitted by the report reader.
///
/// `warnings` is a placeholder here; the sorter computes the real value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankBuckets {
    #[serde(rename = "Family")]
    pub family: Vec<ResultEntry>,
    #[serde(rename = "Genus")]
    pub genus: Vec<ResultEntry>,
    #[serde(rename = "Species complex")]
    pub species_complex: Vec<ResultEntry>,
    #[serde(rename = "Species")]
    pub species: Vec<ResultEntry>,
    #[serde(rename = "Warnings")]
    pub warnings: Warnings,
}

impl RankBuckets {
    pub fn get(&self, rank: Rank) -> &[ResultEntry] {
        match rank {
            Rank::Family => &self.family,
            Rank::Genus => &self.genus,
            Rank::SpeciesComplex => &self.species_complex,
            Rank::Species => &self.species,
        }
    }

    pub fn get_mut(&mut self, rank: Rank) -> &mut Vec<ResultEntry> {
        match rank {
            Rank::Family => &mut self.family,
            Rank::Genus => &mut self.genus,
            Rank::SpeciesComplex => &mut self.species_complex,
            Rank::Species => &mut self.species,
        }
    }
}

/// The value of one rank in a finished summary.
///
/// Serialized untagged: `Present` as a bare array, `Absent` as `{"notes": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketValue {
    /// Non-empty, sorted, unique by name.
    Present(Vec<ResultEntry>),
    /// Nothing qualified at this rank.
    Absent { notes: String },
}

impl BucketValue {
    pub fn entries(&self) -> Option<&[ResultEntry]> {
        match self {
            BucketValue::Present(entries) => Some(entries),
            BucketValue::Absent { .. } => None,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            BucketValue::Present(_) => None,
            BucketValue::Absent { notes } => Some(notes),
        }
    }

    /// Name of the entry at `idx`, if there is one.
    pub fn name_at(&self, idx: usize) -> Option<&str> {
        self.entries()
            .and_then(|entries| entries.get(idx))
            .map(|e| e.name.as_str())
    }
}

/// Final structured result for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    #[serde(rename = "Family")]
    pub family: BucketValue,
    #[serde(rename = "Genus")]
    pub genus: BucketValue,
    #[serde(rename = "Species complex")]
    pub species_complex: BucketValue,
    #[serde(rename = "Species")]
    pub species: BucketValue,
    #[serde(rename = "Warnings")]
    pub warnings: Warnings,
}

impl SampleSummary {
    pub fn get(&self, rank: Rank) -> &BucketValue {
        match rank {
            Rank::Family => &self.family,
            Rank::Genus => &self.genus,
            Rank::SpeciesComplex => &self.species_complex,
            Rank::Species => &self.species,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rank_codes() {
        assert_eq!(RankCode::parse("S"), RankCode::new(RankLevel::Species, 0));
        assert_eq!(RankCode::parse("G1"), RankCode::new(RankLevel::Genus, 1));
        assert_eq!(RankCode::parse(" F2 "), RankCode::new(RankLevel::Family, 2));
        assert_eq!(RankCode::parse("U"), RankCode::new(RankLevel::Unclassified, 0));
        assert_eq!(RankCode::parse("-").level, RankLevel::Unranked);
        assert_eq!(RankCode::parse("Sx").level, RankLevel::Unranked);
    }

    #[test]
    fn test_rank_words_are_unranked() {
        assert_eq!(RankCode::parse("species").level, RankLevel::Unranked);
        assert_eq!(RankCode::parse("Species").level, RankLevel::Unranked);
        assert_eq!(RankCode::parse("genus").level, RankLevel::Unranked);
        assert_eq!(RankCode::parse("superkingdom").level, RankLevel::Unranked);
        assert_eq!(RankCode::parse("no rank").level, RankLevel::Unranked);
    }

    #[test]
    fn test_rank_code_display() {
        for code in ["U", "R", "D", "F", "G", "G1", "S", "S2", "-"] {
            assert_eq!(RankCode::parse(code).to_string(), code);
        }
    }

    #[test]
    fn test_rank_code_predicates() {
        assert!(RankCode::parse("S").is_exactly(RankLevel::Species));
        assert!(!RankCode::parse("S1").is_exactly(RankLevel::Species));
        assert!(RankCode::parse("G1").is_at_or_below_genus());
        assert!(RankCode::parse("S1").is_at_or_below_genus());
        assert!(!RankCode::parse("F").is_at_or_below_genus());
        assert!(!RankCode::parse("-").is_at_or_below_genus());
    }

    #[test]
    fn test_bucket_value_serializes_untagged() {
        let absent = BucketValue::Absent { notes: "nothing".to_string() };
        assert_eq!(serde_json::to_string(&absent).unwrap(), r#"{"notes":"nothing"}"#);

        let present = BucketValue::Present(vec![ResultEntry {
            name: "Mycobacterium".to_string(),
            percentage: 91.5,
            reads_clade: 200_000,
            reads_direct: 10,
            taxon_id: 1763,
        }]);
        let json = serde_json::to_value(&present).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "Mycobacterium");

        let back: BucketValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, present);
    }

    #[test]
    fn test_summary_keys() {
        let notes = || BucketValue::Absent { notes: "n".to_string() };
        let summary = SampleSummary {
            family: notes(),
            genus: notes(),
            species_complex: notes(),
            species: notes(),
            warnings: Warnings::default(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        for rank in Rank::ALL {
            assert!(json.get(rank.as_str()).is_some(), "missing key {rank}");
        }
        assert_eq!(json["Warnings"]["mykrobe"], false);
    }
}
