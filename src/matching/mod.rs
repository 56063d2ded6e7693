// pattern matchers: each scans the whole password independently and emits
// zero or more overlapping match candidates

pub mod date;
pub mod dictionary;
pub mod regexen;
pub mod repeat;
pub mod sequence;
pub mod spatial;

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use serde::Serialize;

use crate::tables::MatcherTables;

/// the pattern kind and its kind-specific fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum MatchPattern {
    Dictionary {
        /// the matched word, lowercased
        matched_word: String,
        rank: usize,
        dictionary_name: String,
        reversed: bool,
        l33t: bool,
        /// substitute char -> original letter, populated for l33t matches
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        sub: BTreeMap<char, char>,
    },
    Spatial {
        graph: String,
        /// number of direction changes along the key path
        turns: usize,
        shifted_count: usize,
    },
    Repeat {
        base_token: String,
        base_guesses: f64,
        /// the base token's own optimal match sequence
        base_matches: Vec<Match>,
        repeat_count: usize,
    },
    Sequence {
        name: String,
        ascending: bool,
        /// size of the alphabet the sequence runs over
        space: u32,
    },
    Regex {
        name: String,
        matched: String,
    },
    Date {
        separator: String,
        year: i32,
        month: i32,
        day: i32,
    },
    /// synthetic fallback emitted only by the optimal sequence search
    Bruteforce,
}

/// a recognized weak sub-pattern spanning chars `i..=j` of the password
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    #[serde(flatten)]
    pub pattern: MatchPattern,
    /// start char index, inclusive
    pub i: usize,
    /// end char index, inclusive
    pub j: usize,
    pub token: String,
    /// guess estimate, memoized by the first `estimate_guesses` call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses: Option<f64>,
}

impl Match {
    pub fn new(pattern: MatchPattern, i: usize, j: usize, token: String) -> Self {
        Self {
            pattern,
            i,
            j,
            token,
            guesses: None,
        }
    }
}

type MatcherFn = fn(&[char], &MatcherTables) -> Vec<Match>;

const MATCHERS: [MatcherFn; 8] = [
    dictionary::dictionary_match,
    dictionary::reverse_dictionary_match,
    dictionary::l33t_match,
    spatial::spatial_match,
    repeat::repeat_match,
    sequence::sequence_match,
    regexen::regex_match,
    date::date_match,
];

/// run every matcher over the password, merge the candidates, and sort them
/// by (i, j). matchers are independent and fan out in parallel; a panicking
/// matcher is isolated and contributes no candidates.
pub fn omnimatch(password: &str, tables: &MatcherTables) -> Vec<Match> {
    let chars: Vec<char> = password.chars().collect();
    let mut matches: Vec<Match> = MATCHERS
        .par_iter()
        .map(|matcher| {
            panic::catch_unwind(AssertUnwindSafe(|| matcher(&chars, tables)))
                .unwrap_or_default()
        })
        .collect::<Vec<Vec<Match>>>()
        .into_iter()
        .flatten()
        .collect();
    sort_matches(&mut matches);
    matches
}

/// sort on i primary, j secondary; stable, so same-span candidates keep
/// matcher order
pub(crate) fn sort_matches(matches: &mut [Match]) {
    matches.sort_by_key(|m| (m.i, m.j));
}

/// the char-span token `password[i..=j]`
pub(crate) fn token_of(password: &[char], i: usize, j: usize) -> String {
    password[i..=j].iter().collect()
}

/// per-char lowercasing that keeps a 1:1 char mapping (multi-char
/// lowercase expansions keep the original char; the core does not
/// normalize unicode)
pub(crate) fn lowercase_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// map each byte offset of `s` to the index of the char containing it
pub(crate) fn char_index_map(s: &str) -> Vec<usize> {
    let mut map = Vec::with_capacity(s.len());
    for (char_idx, c) in s.chars().enumerate() {
        for _ in 0..c.len_utf8() {
            map.push(char_idx);
        }
    }
    map
}
