// dictionary, reverse-dictionary, and l33t matchers

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::matching::{
    char_index_map, lowercase_char, sort_matches, token_of, Match, MatchPattern,
};
use crate::tables::{DictionaryScanner, MatcherTables};

/// find every dictionary word occurring as a substring, at its word's rank
pub fn dictionary_match(password: &[char], tables: &MatcherTables) -> Vec<Match> {
    let mut matches = scan_dictionaries(password, &tables.dictionaries);
    sort_matches(&mut matches);
    matches
}

/// dictionary matching against the reversed password, with spans mapped back
/// to original coordinates
pub fn reverse_dictionary_match(password: &[char], tables: &MatcherTables) -> Vec<Match> {
    let n = password.len();
    let reversed: Vec<char> = password.iter().rev().copied().collect();
    let mut matches = scan_dictionaries(&reversed, &tables.dictionaries);
    for m in &mut matches {
        let (i, j) = (n - 1 - m.j, n - 1 - m.i);
        m.i = i;
        m.j = j;
        m.token = token_of(password, i, j);
        if let MatchPattern::Dictionary { reversed, .. } = &mut m.pattern {
            *reversed = true;
        }
    }
    sort_matches(&mut matches);
    matches
}

/// dictionary matching through l33t substitutions: enumerate every
/// non-conflicting decoding of the password's substitute characters, decode,
/// and re-run the dictionary scan
pub fn l33t_match(password: &[char], tables: &MatcherTables) -> Vec<Match> {
    let mut matches = Vec::new();
    let subtable = relevant_l33t_subtable(password, &tables.l33t_table);
    for sub in enumerate_l33t_subs(&subtable) {
        if sub.is_empty() {
            break;
        }
        let subbed: Vec<char> = password.iter().map(|c| *sub.get(c).unwrap_or(c)).collect();
        for mut m in scan_dictionaries(&subbed, &tables.dictionaries) {
            let token = token_of(password, m.i, m.j);
            let matched_word = match &m.pattern {
                MatchPattern::Dictionary { matched_word, .. } => matched_word.clone(),
                _ => continue,
            };
            if token.to_lowercase() == matched_word {
                // only keep hits where an actual substitution happened
                continue;
            }
            let match_sub: BTreeMap<char, char> = sub
                .iter()
                .filter(|(subbed_char, _)| token.contains(**subbed_char))
                .map(|(&s, &orig)| (s, orig))
                .collect();
            if let MatchPattern::Dictionary { l33t, sub, .. } = &mut m.pattern {
                *l33t = true;
                *sub = match_sub;
            }
            m.token = token;
            matches.push(m);
        }
    }
    matches.retain(|m| m.token.chars().count() > 1);
    sort_matches(&mut matches);
    matches
}

/// shared scan: lowercase the password (1:1 per char), run the compiled
/// automaton, and convert byte spans back to char spans
fn scan_dictionaries(password: &[char], dictionaries: &DictionaryScanner) -> Vec<Match> {
    let lowered: String = password.iter().map(|&c| lowercase_char(c)).collect();
    let byte_to_char = char_index_map(&lowered);
    let mut matches = Vec::new();
    for (entry, start, end) in dictionaries.scan(&lowered) {
        let i = byte_to_char[start];
        let j = byte_to_char[end - 1];
        matches.push(Match::new(
            MatchPattern::Dictionary {
                matched_word: entry.word.clone(),
                rank: entry.rank,
                dictionary_name: entry.dictionary_name.clone(),
                reversed: false,
                l33t: false,
                sub: BTreeMap::new(),
            },
            i,
            j,
            token_of(password, i, j),
        ));
    }
    matches
}

/// prune the l33t table down to substitute chars that occur in the password
pub(crate) fn relevant_l33t_subtable(
    password: &[char],
    table: &BTreeMap<char, Vec<char>>,
) -> BTreeMap<char, Vec<char>> {
    let password_chars: HashSet<char> = password.iter().copied().collect();
    let mut subtable = BTreeMap::new();
    for (&letter, subs) in table {
        let relevant: Vec<char> = subs
            .iter()
            .copied()
            .filter(|c| password_chars.contains(c))
            .collect();
        if !relevant.is_empty() {
            subtable.insert(letter, relevant);
        }
    }
    subtable
}

/// enumerate every consistent assignment of substitute char -> letter.
/// a substitute char decodes to at most one letter at a time; when two
/// letters compete for the same substitute char, both resolutions are kept.
/// deduplicated by canonical sorted signature. bounded by the number of
/// distinct substitutable letters (at most 12).
pub(crate) fn enumerate_l33t_subs(
    table: &BTreeMap<char, Vec<char>>,
) -> Vec<BTreeMap<char, char>> {
    let mut subs: Vec<Vec<(char, char)>> = vec![Vec::new()];
    for (&letter, sub_chars) in table {
        let mut next_subs: Vec<Vec<(char, char)>> = Vec::new();
        for &l33t_char in sub_chars {
            for sub in &subs {
                match sub.iter().position(|&(c, _)| c == l33t_char) {
                    None => {
                        let mut extended = sub.clone();
                        extended.push((l33t_char, letter));
                        next_subs.push(extended);
                    }
                    Some(dup) => {
                        // the substitute char is taken: keep the original
                        // assignment, and a variant reassigned to this letter
                        next_subs.push(sub.clone());
                        let mut alternative = sub.clone();
                        alternative.remove(dup);
                        alternative.push((l33t_char, letter));
                        next_subs.push(alternative);
                    }
                }
            }
        }
        subs = dedup_subs(next_subs);
    }
    subs.into_iter()
        .map(|pairs| pairs.into_iter().collect())
        .collect()
}

fn dedup_subs(subs: Vec<Vec<(char, char)>>) -> Vec<Vec<(char, char)>> {
    let mut seen: HashSet<Vec<(char, char)>> = HashSet::new();
    let mut deduped = Vec::new();
    for sub in subs {
        let mut signature = sub.clone();
        signature.sort_unstable();
        if seen.insert(signature) {
            deduped.push(sub);
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::default_l33t_table;

    fn tables_with(words: &[&str]) -> MatcherTables {
        MatcherTables {
            dictionaries: DictionaryScanner::build(&[(
                "test".to_string(),
                words.iter().map(|w| w.to_string()).collect(),
            )])
            .unwrap(),
            graphs: crate::tables::graphs::default_graphs(),
            l33t_table: default_l33t_table(),
            regexen: crate::tables::RegexTable::default_table(),
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn matches_words_and_substrings() {
        let tables = tables_with(&["password", "word", "son"]);
        let matches = dictionary_match(&chars("passwords"), &tables);
        let spans: Vec<(usize, usize, &str)> = matches
            .iter()
            .map(|m| {
                let w = match &m.pattern {
                    MatchPattern::Dictionary { matched_word, .. } => matched_word.as_str(),
                    _ => unreachable!(),
                };
                (m.i, m.j, w)
            })
            .collect();
        assert!(spans.contains(&(0, 7, "password")));
        assert!(spans.contains(&(4, 7, "word")));
        // "son" does not occur in "passwords"
        assert!(!spans.iter().any(|(_, _, w)| *w == "son"));
    }

    #[test]
    fn matches_preserve_original_case_in_token() {
        let tables = tables_with(&["password"]);
        let matches = dictionary_match(&chars("PassWord"), &tables);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].token, "PassWord");
        match &matches[0].pattern {
            MatchPattern::Dictionary { matched_word, rank, .. } => {
                assert_eq!(matched_word, "password");
                assert_eq!(*rank, 1);
            }
            other => panic!("expected dictionary match, got {:?}", other),
        }
    }

    #[test]
    fn reverse_match_remaps_spans() {
        let tables = tables_with(&["password"]);
        let matches = reverse_dictionary_match(&chars("drowssap"), &tables);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!((m.i, m.j), (0, 7));
        assert_eq!(m.token, "drowssap");
        match &m.pattern {
            MatchPattern::Dictionary { reversed, matched_word, .. } => {
                assert!(*reversed);
                assert_eq!(matched_word, "password");
            }
            other => panic!("expected dictionary match, got {:?}", other),
        }
    }

    #[test]
    fn reverse_match_inside_longer_password() {
        let tables = tables_with(&["secret"]);
        let matches = reverse_dictionary_match(&chars("xxterceszz"), &tables);
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].i, matches[0].j), (2, 7));
        assert_eq!(matches[0].token, "terces");
    }

    #[test]
    fn l33t_match_basic_substitution() {
        let tables = tables_with(&["password"]);
        let matches = l33t_match(&chars("p4ssw0rd"), &tables);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.token, "p4ssw0rd");
        match &m.pattern {
            MatchPattern::Dictionary { l33t, sub, matched_word, .. } => {
                assert!(*l33t);
                assert_eq!(matched_word, "password");
                assert_eq!(sub.get(&'4'), Some(&'a'));
                assert_eq!(sub.get(&'0'), Some(&'o'));
            }
            other => panic!("expected dictionary match, got {:?}", other),
        }
    }

    #[test]
    fn l33t_match_requires_actual_substitution() {
        let tables = tables_with(&["password"]);
        // no substitute chars present: plain dictionary hit, not a l33t one
        assert!(l33t_match(&chars("password"), &tables).is_empty());
    }

    #[test]
    fn l33t_match_skips_single_char_tokens() {
        let tables = tables_with(&["a"]);
        assert!(l33t_match(&chars("4"), &tables).is_empty());
    }

    #[test]
    fn relevant_subtable_prunes_absent_chars() {
        let table = default_l33t_table();
        let sub = relevant_l33t_subtable(&chars("p4ssw0rd"), &table);
        assert_eq!(sub.get(&'a'), Some(&vec!['4']));
        assert_eq!(sub.get(&'o'), Some(&vec!['0']));
        assert!(!sub.contains_key(&'e'));
    }

    #[test]
    fn enumerate_subs_single_choice_per_letter() {
        let table: BTreeMap<char, Vec<char>> =
            [('a', vec!['4']), ('o', vec!['0'])].into_iter().collect();
        let subs = enumerate_l33t_subs(&table);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].get(&'4'), Some(&'a'));
        assert_eq!(subs[0].get(&'0'), Some(&'o'));
    }

    #[test]
    fn enumerate_subs_conflicting_substitute_char() {
        // '1' can decode to 'i' or 'l': both resolutions must appear,
        // but never both letters claiming '1' at once
        let table: BTreeMap<char, Vec<char>> =
            [('i', vec!['1']), ('l', vec!['1'])].into_iter().collect();
        let subs = enumerate_l33t_subs(&table);
        assert!(subs.iter().any(|s| s.get(&'1') == Some(&'i')));
        assert!(subs.iter().any(|s| s.get(&'1') == Some(&'l')));
        for sub in &subs {
            assert!(sub.len() <= 1);
        }
    }

    #[test]
    fn enumerate_subs_empty_table() {
        let subs = enumerate_l33t_subs(&BTreeMap::new());
        assert_eq!(subs.len(), 1);
        assert!(subs[0].is_empty());
    }
}
