// per-match guess estimation: how many attempts a pattern-aware attacker
// needs before reaching this candidate

use std::time::{SystemTime, UNIX_EPOCH};

use crate::matching::{Match, MatchPattern};
use crate::tables::graphs::{is_alphabetic_graph, keyboard_stats, keypad_stats};

/// alphabet size charged per character of a bruteforce region
pub const BRUTEFORCE_CARDINALITY: u32 = 10;

pub const MIN_SUBMATCH_GUESSES_SINGLE_CHAR: f64 = 10.0;
pub const MIN_SUBMATCH_GUESSES_MULTI_CHAR: f64 = 50.0;

/// guess floor for year-based patterns near the present day
pub const MIN_YEAR_SPACE: i32 = 20;

/// estimates guesses for a single match and memoizes the result on the
/// match. repeated calls return the cached value.
pub fn estimate_guesses(m: &mut Match, password: &str) -> f64 {
    if let Some(guesses) = m.guesses {
        return guesses;
    }
    let token_len = m.token.chars().count();
    let min_guesses = if token_len < password.chars().count() {
        if token_len == 1 {
            MIN_SUBMATCH_GUESSES_SINGLE_CHAR
        } else {
            MIN_SUBMATCH_GUESSES_MULTI_CHAR
        }
    } else {
        1.0
    };
    let guesses = match &m.pattern {
        MatchPattern::Bruteforce => bruteforce_guesses(token_len),
        MatchPattern::Dictionary {
            rank,
            reversed,
            l33t,
            sub,
            ..
        } => dictionary_guesses(&m.token, *rank, *reversed, *l33t, sub),
        MatchPattern::Spatial {
            graph,
            turns,
            shifted_count,
        } => spatial_guesses(token_len, graph, *turns, *shifted_count),
        MatchPattern::Repeat {
            base_guesses,
            repeat_count,
            ..
        } => base_guesses * *repeat_count as f64,
        MatchPattern::Sequence {
            ascending, space, ..
        } => sequence_guesses(&m.token, *ascending, *space),
        MatchPattern::Regex { name, matched } => regex_guesses(name, matched, token_len),
        MatchPattern::Date {
            separator, year, ..
        } => date_guesses(separator, *year),
    };
    let guesses = guesses.max(min_guesses);
    m.guesses = Some(guesses);
    guesses
}

fn bruteforce_guesses(token_len: usize) -> f64 {
    let mut guesses = (BRUTEFORCE_CARDINALITY as f64).powi(token_len as i32);
    if !guesses.is_finite() {
        guesses = f64::MAX;
    }
    // keep bruteforce strictly above the submatch floor so it never beats a
    // real pattern of the same length
    let floor = if token_len == 1 {
        MIN_SUBMATCH_GUESSES_SINGLE_CHAR + 1.0
    } else {
        MIN_SUBMATCH_GUESSES_MULTI_CHAR + 1.0
    };
    guesses.max(floor)
}

fn dictionary_guesses(
    token: &str,
    rank: usize,
    reversed: bool,
    l33t: bool,
    sub: &std::collections::BTreeMap<char, char>,
) -> f64 {
    let mut guesses = rank as f64 * uppercase_variations(token);
    if l33t {
        guesses *= l33t_variations(token, sub);
    }
    if reversed {
        guesses *= 2.0;
    }
    guesses
}

// capitalization schemes an attacker tries in rough popularity order:
// all-lower is free, first-upper / last-upper / all-caps double the space,
// anything else pays for choosing which positions are upper
pub(crate) fn uppercase_variations(token: &str) -> f64 {
    let uppers = token.chars().filter(|c| c.is_uppercase()).count();
    if uppers == 0 {
        return 1.0;
    }
    let lowers = token.chars().filter(|c| c.is_lowercase()).count();
    let chars: Vec<char> = token.chars().collect();
    let first_upper = chars[0].is_uppercase() && uppers == 1;
    let last_upper = chars[chars.len() - 1].is_uppercase() && uppers == 1;
    if lowers == 0 || first_upper || last_upper {
        return 2.0;
    }
    let mut variations = 0.0;
    for i in 1..=uppers.min(lowers) {
        variations += n_ck(uppers + lowers, i);
    }
    variations
}

pub(crate) fn l33t_variations(token: &str, sub: &std::collections::BTreeMap<char, char>) -> f64 {
    let mut variations = 1.0;
    let lowered: Vec<char> = token.chars().flat_map(|c| c.to_lowercase()).collect();
    for (&subbed, &letter) in sub {
        let s = lowered.iter().filter(|&&c| c == subbed).count();
        let u = lowered.iter().filter(|&&c| c == letter).count();
        if s == 0 || u == 0 {
            // fully substituted (or fully not): attacker just tries both
            // renderings of the word
            variations *= 2.0;
        } else {
            let mut possibilities = 0.0;
            for i in 1..=u.min(s) {
                possibilities += n_ck(u + s, i);
            }
            variations *= possibilities;
        }
    }
    variations
}

fn spatial_guesses(token_len: usize, graph: &str, turns: usize, shifted_count: usize) -> f64 {
    let stats = if is_alphabetic_graph(graph) {
        keyboard_stats()
    } else {
        keypad_stats()
    };
    let s = stats.starting_positions;
    let d = stats.average_degree;
    let mut guesses = 0.0;
    // sum over all lengths up to the token's and all plausible turn counts
    for i in 2..=token_len {
        let possible_turns = turns.min(i - 1);
        for j in 1..=possible_turns {
            guesses += n_ck(i - 1, j - 1) * s * d.powi(j as i32);
        }
    }
    if shifted_count > 0 {
        let shifted = shifted_count;
        let unshifted = token_len - shifted_count;
        if shifted == 0 || unshifted == 0 {
            guesses *= 2.0;
        } else {
            let mut shifted_variations = 0.0;
            for i in 1..=shifted.min(unshifted) {
                shifted_variations += n_ck(shifted + unshifted, i);
            }
            guesses *= shifted_variations;
        }
    }
    guesses
}

fn sequence_guesses(token: &str, ascending: bool, space: u32) -> f64 {
    let first = token.chars().next();
    // sequences anchored at an obvious start are cheap to enumerate
    let obvious_start = matches!(first, Some('a' | 'A' | 'z' | 'Z' | '0' | '1' | '9'));
    let mut base = if obvious_start { 4.0 } else { space as f64 };
    if !ascending {
        base *= 2.0;
    }
    base * token.chars().count() as f64
}

fn regex_guesses(name: &str, matched: &str, token_len: usize) -> f64 {
    match name {
        "recent_year" => {
            let year: i32 = matched.parse().unwrap_or(0);
            let year_space = (year - reference_year()).abs().max(MIN_YEAR_SPACE);
            year_space as f64
        }
        "alpha_lower" | "alpha_upper" => 26f64.powi(token_len as i32),
        "alpha" => 52f64.powi(token_len as i32),
        "alphanumeric" => 62f64.powi(token_len as i32),
        "digits" => 10f64.powi(token_len as i32),
        "symbols" => 33f64.powi(token_len as i32),
        // table construction rejects unknown names up front
        other => unreachable!("regex name '{}' passed table validation", other),
    }
}

fn date_guesses(separator: &str, year: i32) -> f64 {
    let year_space = (year - reference_year()).abs().max(MIN_YEAR_SPACE);
    let mut guesses = year_space as f64 * 365.0;
    if !separator.is_empty() {
        guesses *= 4.0;
    }
    guesses
}

/// current year from the system clock, used to anchor year-based estimates
pub fn reference_year() -> i32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    1970 + (secs as f64 / (365.2425 * 86400.0)) as i32
}

/// binomial coefficient, multiply-then-divide at each step to stay exact in
/// f64 for the small arguments seen here
pub(crate) fn n_ck(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 {
        return 1.0;
    }
    let mut n = n as f64;
    let mut result = 1.0;
    for i in 1..=k {
        result *= n;
        result /= i as f64;
        n -= 1.0;
    }
    result
}

pub(crate) fn factorial(n: usize) -> f64 {
    let mut result = 1.0;
    for i in 2..=n {
        result *= i as f64;
    }
    result
}
