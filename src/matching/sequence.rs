// sequence matcher: runs with a constant char-code delta (abcdef, 97531)

use crate::matching::{token_of, Match, MatchPattern};
use crate::tables::MatcherTables;

/// largest |delta| still considered a sequence; jkm-style skips beyond this
/// are noise
const MAX_DELTA: i32 = 5;

pub fn sequence_match(password: &[char], _tables: &MatcherTables) -> Vec<Match> {
    let n = password.len();
    let mut matches = Vec::new();
    if n <= 1 {
        return matches;
    }

    let mut i = 0;
    let mut last_delta: Option<i32> = None;
    for k in 1..n {
        let delta = password[k] as i32 - password[k - 1] as i32;
        if last_delta.is_none() {
            last_delta = Some(delta);
        }
        if Some(delta) == last_delta {
            continue;
        }
        let j = k - 1;
        update(password, i, j, last_delta.unwrap_or(0), &mut matches);
        i = j;
        last_delta = Some(delta);
    }
    update(password, i, n - 1, last_delta.unwrap_or(0), &mut matches);
    matches
}

fn update(password: &[char], i: usize, j: usize, delta: i32, matches: &mut Vec<Match>) {
    let span = j - i;
    let step = delta.abs();
    // length-2 runs only count for single-step deltas
    if !(span > 1 || step == 1) {
        return;
    }
    if !(0 < step && step <= MAX_DELTA) {
        return;
    }

    let token = token_of(password, i, j);
    let (name, space) = classify(&token);
    matches.push(Match::new(
        MatchPattern::Sequence {
            name: name.to_string(),
            ascending: delta > 0,
            space,
        },
        i,
        j,
        token,
    ));
}

fn classify(token: &str) -> (&'static str, u32) {
    if token.chars().all(|c| c.is_ascii_lowercase()) {
        ("lower", 26)
    } else if token.chars().all(|c| c.is_ascii_uppercase()) {
        ("upper", 26)
    } else if token.chars().all(|c| c.is_ascii_digit()) {
        ("digits", 10)
    } else {
        // conservatively treat anything else as a small alphabet
        ("unicode", 26)
    }
}
