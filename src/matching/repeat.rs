// repeat matcher: blocks of a base token repeated two or more times

use crate::matching::{omnimatch, token_of, Match, MatchPattern};
use crate::scoring;
use crate::tables::MatcherTables;

/// find repeated blocks. at each scan position the greedy reading (longest
/// base with at least one extra copy) competes with the lazy reading
/// (shortest base); the longer total run wins, and a winning greedy run is
/// re-divided by its minimal tiling period. the base token is analyzed
/// recursively to obtain its own guess count.
pub fn repeat_match(password: &[char], tables: &MatcherTables) -> Vec<Match> {
    let n = password.len();
    let mut matches = Vec::new();
    let mut last_index = 0;

    while last_index < n {
        let Some(start) = first_repeat_at_or_after(password, last_index) else {
            break;
        };

        let lazy_base = shortest_base_at(password, start);
        let lazy_len = lazy_base * max_copies(password, start, lazy_base);
        let greedy_base = longest_base_at(password, start);
        let greedy_len = greedy_base * max_copies(password, start, greedy_base);

        let (total_len, base_len) = if greedy_len > lazy_len {
            // greedy beats lazy: the base is the shortest token that tiles
            // the whole greedy run
            let run = &password[start..start + greedy_len];
            (greedy_len, minimal_period(run))
        } else {
            (lazy_len, lazy_base)
        };

        let j = start + total_len - 1;
        let base_token = token_of(password, start, start + base_len - 1);
        let base_analysis = scoring::most_guessable_match_sequence(
            &base_token,
            omnimatch(&base_token, tables),
            false,
        );

        matches.push(Match::new(
            MatchPattern::Repeat {
                base_token,
                base_guesses: base_analysis.guesses,
                base_matches: base_analysis.sequence,
                repeat_count: total_len / base_len,
            },
            start,
            j,
            token_of(password, start, j),
        ));
        last_index = j + 1;
    }
    matches
}

/// true when a block of length `base` at `i` is immediately followed by at
/// least one full copy of itself
fn has_copy(password: &[char], i: usize, base: usize) -> bool {
    i + 2 * base <= password.len() && password[i..i + base] == password[i + base..i + 2 * base]
}

fn first_repeat_at_or_after(password: &[char], from: usize) -> Option<usize> {
    (from..password.len()).find(|&i| (1..=(password.len() - i) / 2).any(|b| has_copy(password, i, b)))
}

fn shortest_base_at(password: &[char], i: usize) -> usize {
    (1..=(password.len() - i) / 2)
        .find(|&b| has_copy(password, i, b))
        .unwrap_or(1)
}

fn longest_base_at(password: &[char], i: usize) -> usize {
    (1..=(password.len() - i) / 2)
        .rev()
        .find(|&b| has_copy(password, i, b))
        .unwrap_or(1)
}

/// number of consecutive copies of the length-`base` block starting at `i`,
/// including the first
fn max_copies(password: &[char], i: usize, base: usize) -> usize {
    let mut copies = 1;
    while i + (copies + 1) * base <= password.len()
        && password[i..i + base] == password[i + copies * base..i + (copies + 1) * base]
    {
        copies += 1;
    }
    copies
}

/// shortest period p of `run` such that the whole run is exact copies of
/// its first p chars
fn minimal_period(run: &[char]) -> usize {
    let len = run.len();
    for p in 1..len {
        if len % p == 0 && run.chunks(p).all(|chunk| chunk == &run[..p]) {
            return p;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::default_tables;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn repeats(password: &str) -> Vec<Match> {
        repeat_match(&chars(password), default_tables())
    }

    fn fields(m: &Match) -> (String, usize) {
        match &m.pattern {
            MatchPattern::Repeat { base_token, repeat_count, .. } => {
                (base_token.clone(), *repeat_count)
            }
            other => panic!("expected repeat match, got {:?}", other),
        }
    }

    #[test]
    fn single_char_repeat() {
        let matches = repeats("aaaa");
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].i, matches[0].j), (0, 3));
        assert_eq!(fields(&matches[0]), ("a".to_string(), 4));
    }

    #[test]
    fn multi_char_repeat() {
        let matches = repeats("abcabcabc");
        assert_eq!(matches.len(), 1);
        assert_eq!(fields(&matches[0]), ("abc".to_string(), 3));
        assert_eq!(matches[0].token, "abcabcabc");
    }

    #[test]
    fn greedy_wins_when_longer() {
        // lazy sees "aa" (base "a" x2); greedy sees the full "aabaab"
        // (base "aab" x2), which covers more and wins
        let matches = repeats("aabaab");
        assert_eq!(matches.len(), 1);
        assert_eq!(fields(&matches[0]), ("aab".to_string(), 2));
    }

    #[test]
    fn lazy_wins_when_longer() {
        // base "a" x4 and base "aa" x2 cover the same 4 chars, so the
        // lazy reading with the shorter base is kept
        let matches = repeats("aaaa");
        assert_eq!(fields(&matches[0]), ("a".to_string(), 4));
    }

    #[test]
    fn scan_resumes_after_match() {
        let matches = repeats("aaaXbcbc");
        assert_eq!(matches.len(), 2);
        assert_eq!(fields(&matches[0]), ("a".to_string(), 3));
        assert_eq!((matches[0].i, matches[0].j), (0, 2));
        assert_eq!(fields(&matches[1]), ("bc".to_string(), 2));
        assert_eq!((matches[1].i, matches[1].j), (4, 7));
    }

    #[test]
    fn no_repeats_no_matches() {
        assert!(repeats("abcdefg").is_empty());
        assert!(repeats("").is_empty());
        assert!(repeats("aa").len() == 1);
    }

    #[test]
    fn base_analyzed_recursively() {
        let matches = repeats("passwordpassword");
        assert_eq!(matches.len(), 1);
        match &matches[0].pattern {
            MatchPattern::Repeat { base_guesses, base_matches, .. } => {
                // the base "password" is a rank-1 dictionary word; its own
                // analysis must find that
                assert!(*base_guesses > 0.0);
                assert!(base_matches
                    .iter()
                    .any(|m| matches!(m.pattern, MatchPattern::Dictionary { .. })));
            }
            other => panic!("expected repeat match, got {:?}", other),
        }
    }

    #[test]
    fn repeat_guesses_grow_with_count() {
        let mut previous = 0.0;
        for count in 2..6 {
            let password: String = "a".repeat(count);
            let matches = repeats(&password);
            let mut m = matches.into_iter().next().expect("repeat expected");
            let guesses = scoring::estimate_guesses(&mut m, &password);
            assert!(
                guesses > previous,
                "guesses must grow with repeat count: {} !> {}",
                guesses,
                previous
            );
            previous = guesses;
        }
    }
}
