// ranked word dictionaries and their compiled substring scanner

use aho_corasick::AhoCorasick;

/// reserved dictionary name for caller-supplied strings (usernames, emails,
/// other user-identifying inputs)
pub const USER_INPUTS_DICTIONARY: &str = "user_inputs";

const PASSWORDS_TXT: &str = include_str!("words/passwords.txt");
const ENGLISH_TXT: &str = include_str!("words/english.txt");
const NAMES_TXT: &str = include_str!("words/names.txt");
const SURNAMES_TXT: &str = include_str!("words/surnames.txt");

/// one ranked dictionary word. rank 1 is the most common word of its list.
#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub word: String,
    pub rank: usize,
    pub dictionary_name: String,
}

/// all ranked dictionaries compiled into a single aho-corasick automaton.
///
/// pattern index maps 1:1 onto `entries`, so one overlapping scan over a
/// lowercased password yields every (i, j) substring hit of every dictionary
/// word, with its rank and source list attached. this enumerates exactly the
/// same hits as looking up all O(n^2) substrings in a word -> rank map.
pub struct DictionaryScanner {
    automaton: AhoCorasick,
    entries: Vec<RankedEntry>,
}

impl std::fmt::Debug for DictionaryScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryScanner")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl DictionaryScanner {
    /// compile ranked dictionaries from (name, ordered word list) pairs.
    /// ranks are assigned densely from 1 in list order; repeated words within
    /// a list keep their first (lowest) rank.
    pub fn build(dictionaries: &[(String, Vec<String>)]) -> Result<Self, String> {
        let mut entries = Vec::new();
        for (name, words) in dictionaries {
            let mut rank = 0;
            let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
            for word in words {
                let word = word.trim().to_lowercase();
                if word.is_empty() || !seen.insert(word.clone()) {
                    continue;
                }
                rank += 1;
                entries.push(RankedEntry {
                    word,
                    rank,
                    dictionary_name: name.clone(),
                });
            }
        }

        let patterns: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        let automaton = AhoCorasick::builder()
            .build(&patterns)
            .map_err(|e| format!("failed to build dictionary automaton: {}", e))?;

        Ok(Self { automaton, entries })
    }

    /// compile the embedded default dictionaries
    pub fn default_scanner() -> Result<Self, String> {
        Self::build(&default_word_lists())
    }

    /// compile the embedded defaults plus a user-inputs dictionary under the
    /// reserved name
    pub fn with_user_inputs(user_inputs: &[&str]) -> Result<Self, String> {
        let mut lists = default_word_lists();
        lists.push((
            USER_INPUTS_DICTIONARY.to_string(),
            user_inputs.iter().map(|w| w.to_string()).collect(),
        ));
        Self::build(&lists)
    }

    /// overlapping scan: yields (entry, start byte, end byte) for every
    /// occurrence of every dictionary word in the haystack. the haystack is
    /// expected to be lowercased by the caller.
    pub fn scan<'a>(
        &'a self,
        haystack: &'a str,
    ) -> impl Iterator<Item = (&'a RankedEntry, usize, usize)> + 'a {
        self.automaton
            .find_overlapping_iter(haystack)
            .map(move |m| (&self.entries[m.pattern().as_usize()], m.start(), m.end()))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// the embedded default frequency lists, most common word first
pub fn default_word_lists() -> Vec<(String, Vec<String>)> {
    vec![
        ("passwords".to_string(), parse_word_list(PASSWORDS_TXT)),
        ("english".to_string(), parse_word_list(ENGLISH_TXT)),
        ("names".to_string(), parse_word_list(NAMES_TXT)),
        ("surnames".to_string(), parse_word_list(SURNAMES_TXT)),
    ]
}
