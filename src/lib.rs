//! Password guessability estimation.
//!
//! A password is scanned for the structure people actually use when they
//! pick one: dictionary words and their reversed or l33t-substituted
//! spellings, keyboard walks, repeats, sequences, years, and dates. The
//! candidates overlap freely; a search then picks the non-overlapping
//! subset that explains the whole password most cheaply, and the cost of
//! that explanation is the guess estimate.
//!
//! ```no_run
//! let analysis = pasvorto::analyze("Tr0ub4dour&3");
//! println!("{} guesses", analysis.guesses);
//! for m in &analysis.sequence {
//!     println!("{:?} spans {}..={}", m.pattern, m.i, m.j);
//! }
//! ```
//!
//! Site-specific terms (usernames, the site name) rank ahead of every
//! built-in word via [`tables::MatcherTables::with_user_inputs`], paired
//! with [`analyze_with`].

pub mod matching;
pub mod scoring;
pub mod tables;

pub use matching::{omnimatch, Match, MatchPattern};
pub use scoring::{
    estimate_attack_times, estimate_guesses, guesses_to_score, most_guessable_match_sequence,
    Analysis, CrackTimesSeconds,
};
pub use tables::MatcherTables;

/// runs every matcher over the password with the built-in tables
pub fn find_matches(password: &str) -> Vec<Match> {
    matching::omnimatch(password, tables::default_tables())
}

pub fn find_matches_with(password: &str, tables: &MatcherTables) -> Vec<Match> {
    matching::omnimatch(password, tables)
}

/// full analysis with the built-in tables: matching plus the optimal
/// sequence search
pub fn analyze(password: &str) -> Analysis {
    analyze_with(password, tables::default_tables())
}

pub fn analyze_with(password: &str, tables: &MatcherTables) -> Analysis {
    let matches = matching::omnimatch(password, tables);
    scoring::most_guessable_match_sequence(password, matches, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_inputs_of_varying_strength() {
        let weak = analyze("password");
        let strong = analyze("vK9#mQ2$xL5z");
        assert!(weak.guesses < strong.guesses);
        assert!(guesses_to_score(weak.guesses) < guesses_to_score(strong.guesses));
    }

    #[test]
    fn user_inputs_outrank_everything() {
        let tables = MatcherTables::with_user_inputs(&["acme-corp"]).unwrap();
        let analysis = analyze_with("acme-corp", &tables);
        match &analysis.sequence[0].pattern {
            MatchPattern::Dictionary {
                rank,
                dictionary_name,
                ..
            } => {
                assert_eq!(*rank, 1);
                assert_eq!(dictionary_name, tables::dictionaries::USER_INPUTS_DICTIONARY);
            }
            other => panic!("expected dictionary match, got {:?}", other),
        }
    }
}
