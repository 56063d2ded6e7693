// static lexical tables: ranked dictionaries, keyboard graphs, the l33t
// substitution table, and the named-regex table

pub mod dictionaries;
pub mod graphs;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

pub use dictionaries::{DictionaryScanner, RankedEntry, USER_INPUTS_DICTIONARY};
pub use graphs::AdjacencyGraph;

/// regex names the guess estimator can price. a character-class name costs
/// base^length; "recent_year" costs the distance from the reference year.
const KNOWN_REGEX_NAMES: &[&str] = &[
    "recent_year",
    "alpha_lower",
    "alpha_upper",
    "alpha",
    "alphanumeric",
    "digits",
    "symbols",
];

/// named regular expressions applied by the regex matcher.
/// names are validated at construction so estimation never sees an
/// unpriceable pattern.
#[derive(Debug, Clone)]
pub struct RegexTable {
    entries: Vec<(String, Regex)>,
}

impl RegexTable {
    /// the default table: a 4-digit recent-year pattern covering 1900-2019
    pub fn default_table() -> Self {
        let recent_year = Regex::new(r"19\d\d|200\d|201\d")
            .unwrap_or_else(|e| unreachable!("recent_year regex is a valid literal: {}", e));
        Self {
            entries: vec![("recent_year".to_string(), recent_year)],
        }
    }

    /// build a custom table from (name, pattern) pairs. unknown names and
    /// invalid patterns are configuration errors.
    pub fn from_patterns(pairs: &[(&str, &str)]) -> Result<Self, String> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (name, pattern) in pairs {
            if !KNOWN_REGEX_NAMES.contains(name) {
                return Err(format!("unknown regex name '{}'", name));
            }
            let regex = Regex::new(pattern)
                .map_err(|e| format!("failed to compile regex '{}': {}", name, e))?;
            entries.push((name.to_string(), regex));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, Regex)] {
        &self.entries
    }
}

/// the standard l33t substitution table: letter -> possible substitutes
pub fn default_l33t_table() -> BTreeMap<char, Vec<char>> {
    [
        ('a', vec!['4', '@']),
        ('b', vec!['8']),
        ('c', vec!['(', '{', '[', '<']),
        ('e', vec!['3']),
        ('g', vec!['6', '9']),
        ('i', vec!['1', '!', '|']),
        ('l', vec!['1', '|', '7']),
        ('o', vec!['0']),
        ('s', vec!['$', '5']),
        ('t', vec!['+', '7']),
        ('x', vec!['%']),
        ('z', vec!['2']),
    ]
    .into_iter()
    .collect()
}

/// every lexical table the matchers read. immutable once built; safe to
/// share across concurrent evaluations. caller-specific tables (extra
/// dictionaries) live in their own value rather than in process-wide state,
/// so concurrent evaluations with different user inputs cannot interfere.
#[derive(Debug)]
pub struct MatcherTables {
    pub dictionaries: DictionaryScanner,
    pub graphs: BTreeMap<String, AdjacencyGraph>,
    pub l33t_table: BTreeMap<char, Vec<char>>,
    pub regexen: RegexTable,
}

impl MatcherTables {
    /// build the default tables from embedded data
    pub fn build() -> Result<Self, String> {
        Ok(Self {
            dictionaries: DictionaryScanner::default_scanner()?,
            graphs: graphs::default_graphs(),
            l33t_table: default_l33t_table(),
            regexen: RegexTable::default_table(),
        })
    }

    /// default tables plus a ranked dictionary of caller-supplied strings
    /// under the reserved name `user_inputs`
    pub fn with_user_inputs(words: &[&str]) -> Result<Self, String> {
        Ok(Self {
            dictionaries: DictionaryScanner::with_user_inputs(words)?,
            graphs: graphs::default_graphs(),
            l33t_table: default_l33t_table(),
            regexen: RegexTable::default_table(),
        })
    }
}

static DEFAULT_TABLES: Lazy<MatcherTables> = Lazy::new(|| {
    MatcherTables::build().unwrap_or_else(|e| unreachable!("embedded tables must build: {}", e))
});

/// the shared read-only default tables, built once per process
pub fn default_tables() -> &'static MatcherTables {
    &DEFAULT_TABLES
}
