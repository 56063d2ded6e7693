//! turns overlapping match candidates into the single cheapest non-overlapping
//! explanation of the whole password

pub mod crack_time;
mod estimate;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::matching::{Match, MatchPattern};

pub use crack_time::{estimate_attack_times, guesses_to_score, CrackTimesSeconds};
pub use estimate::{
    estimate_guesses, reference_year, BRUTEFORCE_CARDINALITY, MIN_YEAR_SPACE,
};

use estimate::factorial;

/// attempts an attacker spends per extra pattern before longer sequences
/// start paying off
const MIN_GUESSES_BEFORE_GROWING_SEQUENCE: f64 = 10_000.0;

/// the cheapest full-coverage reading of a password
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub password: String,
    /// estimated guesses to crack, the attacker's total work
    pub guesses: f64,
    pub guesses_log10: f64,
    /// non-overlapping matches covering the password end to end
    pub sequence: Vec<Match>,
}

// per end-index tables keyed by sequence length l: the best length-l
// sequence ending at that char, its guess product, and its overall cost
struct Optimal {
    m: Vec<BTreeMap<usize, Match>>,
    pi: Vec<BTreeMap<usize, f64>>,
    g: Vec<BTreeMap<usize, f64>>,
}

/// searches for the non-overlapping match sequence minimizing
/// `l! * product(guesses) + D^(l-1)`, filling uncovered gaps with synthetic
/// bruteforce matches. `exclude_additive` drops the `D^(l-1)` term, which the
/// repeat matcher uses when pricing a base token on its own.
pub fn most_guessable_match_sequence(
    password: &str,
    matches: Vec<Match>,
    exclude_additive: bool,
) -> Analysis {
    let n = password.chars().count();
    if n == 0 {
        return Analysis {
            password: password.to_string(),
            guesses: 1.0,
            guesses_log10: 0.0,
            sequence: Vec::new(),
        };
    }

    // candidates grouped by end index, ordered by start index
    let mut matches_by_j: Vec<Vec<Match>> = vec![Vec::new(); n];
    for m in matches {
        matches_by_j[m.j].push(m);
    }
    for group in &mut matches_by_j {
        group.sort_by_key(|m| m.i);
    }

    let mut optimal = Optimal {
        m: vec![BTreeMap::new(); n],
        pi: vec![BTreeMap::new(); n],
        g: vec![BTreeMap::new(); n],
    };

    for k in 0..n {
        for m in matches_by_j[k].clone() {
            if m.i > 0 {
                let lengths: Vec<usize> = optimal.m[m.i - 1].keys().copied().collect();
                for l in lengths {
                    update(password, m.clone(), l + 1, exclude_additive, &mut optimal);
                }
            } else {
                update(password, m, 1, exclude_additive, &mut optimal);
            }
        }
        bruteforce_update(password, k, exclude_additive, &mut optimal);
    }

    let sequence = unwind(n, &mut optimal);
    let guesses = optimal.g[n - 1][&sequence.len()];
    Analysis {
        password: password.to_string(),
        guesses,
        guesses_log10: guesses.log10(),
        sequence,
    }
}

// considers m as the last of a length-l sequence and records it unless an
// already-known sequence ending at the same char is at least as short and
// at least as cheap
fn update(password: &str, mut m: Match, l: usize, exclude_additive: bool, optimal: &mut Optimal) {
    let k = m.j;
    let mut pi = estimate_guesses(&mut m, password);
    if l > 1 {
        // the product term extends the best (l-1)-sequence ending just
        // before m starts; the caller guarantees that entry exists
        pi *= optimal.pi[m.i - 1]
            .get(&(l - 1))
            .expect("extending a recorded sequence length");
    }
    let mut g = factorial(l) * pi;
    if !exclude_additive {
        g += MIN_GUESSES_BEFORE_GROWING_SEQUENCE.powi(l as i32 - 1);
    }
    for (&competing_l, &competing_g) in &optimal.g[k] {
        if competing_l > l {
            continue;
        }
        if competing_g <= g {
            return;
        }
    }
    optimal.g[k].insert(l, g);
    optimal.m[k].insert(l, m);
    optimal.pi[k].insert(l, pi);
}

// fills the gap ending at k with a bruteforce match, either covering the
// whole prefix or extending every known sequence that ends earlier
fn bruteforce_update(password: &str, k: usize, exclude_additive: bool, optimal: &mut Optimal) {
    let m = make_bruteforce_match(password, 0, k);
    update(password, m, 1, exclude_additive, optimal);
    for i in 1..=k {
        let m = make_bruteforce_match(password, i, k);
        let extendable: Vec<usize> = optimal.m[i - 1]
            .iter()
            .filter(|(_, last)| !matches!(last.pattern, MatchPattern::Bruteforce))
            .map(|(&l, _)| l)
            .collect();
        for l in extendable {
            update(password, m.clone(), l + 1, exclude_additive, optimal);
        }
    }
}

fn make_bruteforce_match(password: &str, i: usize, j: usize) -> Match {
    let token: String = password.chars().skip(i).take(j - i + 1).collect();
    Match::new(MatchPattern::Bruteforce, i, j, token)
}

// walks the tables backward from the end of the password, collecting the
// cheapest sequence
fn unwind(n: usize, optimal: &mut Optimal) -> Vec<Match> {
    let mut sequence = Vec::new();
    let (mut l, _) = optimal.g[n - 1]
        .iter()
        .min_by(|a, b| a.1.partial_cmp(b.1).expect("finite costs"))
        .map(|(&l, &g)| (l, g))
        .expect("at least one sequence covers the password");
    let mut k = n as isize - 1;
    while k >= 0 {
        let m = optimal.m[k as usize]
            .get(&l)
            .expect("recorded sequence step")
            .clone();
        k = m.i as isize - 1;
        l -= 1;
        sequence.push(m);
    }
    sequence.reverse();
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::omnimatch;
    use crate::tables::default_tables;

    fn analyze(password: &str) -> Analysis {
        most_guessable_match_sequence(password, omnimatch(password, default_tables()), false)
    }

    #[test]
    fn empty_password() {
        let analysis = analyze("");
        assert_eq!(analysis.guesses, 1.0);
        assert_eq!(analysis.guesses_log10, 0.0);
        assert!(analysis.sequence.is_empty());
    }

    #[test]
    fn sequence_covers_password_without_gaps_or_overlaps() {
        for password in ["p4ssw0rd1991", "correcthorse", "zxcvfrewq", "x", "0o0o0o"] {
            let analysis = analyze(password);
            let n = password.chars().count();
            assert!(!analysis.sequence.is_empty());
            assert_eq!(analysis.sequence[0].i, 0);
            assert_eq!(analysis.sequence.last().unwrap().j, n - 1);
            for pair in analysis.sequence.windows(2) {
                assert_eq!(pair[1].i, pair[0].j + 1);
            }
        }
    }

    #[test]
    fn unmatched_password_is_one_bruteforce_match() {
        let analysis = analyze("zq;x7");
        assert_eq!(analysis.sequence.len(), 1);
        assert!(matches!(
            analysis.sequence[0].pattern,
            MatchPattern::Bruteforce
        ));
    }

    #[test]
    fn top_ranked_word_beats_bruteforce() {
        let analysis = analyze("password");
        assert_eq!(analysis.sequence.len(), 1);
        match &analysis.sequence[0].pattern {
            MatchPattern::Dictionary { rank, .. } => assert_eq!(*rank, 1),
            other => panic!("expected dictionary match, got {:?}", other),
        }
        // rank 1 plus the additive term, which is 1 for a length-1 sequence
        assert_eq!(analysis.guesses, 1.0 + 1.0);
    }

    #[test]
    fn guesses_never_below_one() {
        for password in ["", "a", "password", "Tr0ub4dour&3"] {
            assert!(analyze(password).guesses >= 1.0);
        }
    }

    #[test]
    fn longer_passwords_are_not_cheaper() {
        let short = analyze("horse").guesses;
        let long = analyze("horsebattery").guesses;
        assert!(long >= short);
    }

    #[test]
    fn additive_term_can_be_excluded() {
        let matches = omnimatch("password", default_tables());
        let with = most_guessable_match_sequence("password", matches.clone(), false);
        let without = most_guessable_match_sequence("password", matches, true);
        assert!(without.guesses <= with.guesses);
    }

    #[test]
    fn guesses_log10_consistent() {
        let analysis = analyze("p4ssw0rd");
        assert!((analysis.guesses_log10 - analysis.guesses.log10()).abs() < 1e-9);
    }
}
