//! Street-name auditing and abbreviation expansion.
//!
//! Free-text `addr:street` values are entered by hand and mix `St`, `St.`
//! and `Street`. The normalizer expands known abbreviations; the audit
//! collects trailing suffixes outside the expected vocabulary so they can be
//! reviewed and added to the table.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

/// Suffixes that are already in canonical form.
pub const EXPECTED_SUFFIXES: [&str; 12] = [
    "Street",
    "Avenue",
    "Boulevard",
    "Drive",
    "Court",
    "Place",
    "Square",
    "Lane",
    "Road",
    "Trail",
    "Parkway",
    "Commons",
];

/// Abbreviations and their expansions, applied in this order.
pub const ABBREVIATIONS: [(&str, &str); 12] = [
    ("St", "Street"),
    ("Ave", "Avenue"),
    ("Blvd", "Boulevard"),
    ("Dr", "Drive"),
    ("Ct", "Court"),
    ("Pl", "Place"),
    ("Sq", "Square"),
    ("Ln", "Lane"),
    ("Rd", "Road"),
    ("Tr", "Trail"),
    ("Pkwy", "Parkway"),
    ("Cmns", "Commons"),
];

static STREET_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\S+\.?$").expect("invalid regex"));

/// Returns the trailing token of a street name, e.g. `"Ave."` for
/// `"Broadway Ave."`. Only used for auditing.
pub fn audit_suffix(name: &str) -> Option<&str> {
    STREET_TYPE.find(name).map(|found| found.as_str())
}

pub fn is_expected_suffix(suffix: &str) -> bool {
    EXPECTED_SUFFIXES.contains(&suffix)
}

/// How an abbreviation is located inside a street name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Any occurrence, including inside longer words. `"St"` matches inside
    /// `"Street"`, so canonical names are not left alone.
    Substring,
    /// Only occurrences not surrounded by letters, digits or `_`.
    #[default]
    Word,
}

/// Ordered abbreviation to expansion table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationTable {
    entries: Vec<(String, String)>,
}

impl AbbreviationTable {
    /// Builds a table from pairs in application order. Empty abbreviations
    /// are ignored.
    pub fn new<I, A, F>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, F)>,
        A: Into<String>,
        F: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(short, full)| (short.into(), full.into()))
            .filter(|(short, _)| !short.is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(short, full)| (short.as_str(), full.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::new(ABBREVIATIONS)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StreetNormalizer {
    table: AbbreviationTable,
    mode: MatchMode,
}

impl StreetNormalizer {
    pub fn new(table: AbbreviationTable, mode: MatchMode) -> Self {
        Self { table, mode }
    }

    pub fn table(&self) -> &AbbreviationTable {
        &self.table
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Expands every abbreviation found in `name`, once each, in table
    /// order. Any hit strips all periods from the name before the first
    /// occurrence is replaced.
    pub fn normalize(&self, name: &str) -> String {
        let mut name = name.to_string();
        for (short, full) in self.table.entries() {
            if find_abbreviation(&name, short, self.mode).is_none() {
                continue;
            }
            name = name.replace('.', "");
            if let Some(at) = find_abbreviation(&name, short, self.mode) {
                name.replace_range(at..at + short.len(), full);
            }
        }
        name
    }
}

fn find_abbreviation(name: &str, short: &str, mode: MatchMode) -> Option<usize> {
    name.match_indices(short)
        .map(|(at, _)| at)
        .find(|&at| match mode {
            MatchMode::Substring => true,
            MatchMode::Word => {
                is_boundary(name[..at].chars().next_back())
                    && is_boundary(name[at + short.len()..].chars().next())
            }
        })
}

fn is_boundary(neighbor: Option<char>) -> bool {
    !matches!(neighbor, Some(c) if c.is_alphanumeric() || c == '_')
}

/// Unexpected street suffixes mapped to the distinct names they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetTypeAudit {
    types: BTreeMap<String, BTreeSet<String>>,
}

impl StreetTypeAudit {
    pub fn record(&mut self, name: &str) {
        let Some(suffix) = audit_suffix(name) else {
            return;
        };
        if is_expected_suffix(suffix) {
            return;
        }
        self.types
            .entry(suffix.to_string())
            .or_default()
            .insert(name.to_string());
    }

    pub fn names(&self, suffix: &str) -> Option<&BTreeSet<String>> {
        self.types.get(suffix)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.types.iter().map(|(suffix, names)| (suffix.as_str(), names))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
