// regex matcher: finds every non-overlapping hit of each configured pattern

use crate::matching::{char_index_map, Match, MatchPattern};
use crate::tables::MatcherTables;

pub fn regex_match(password: &[char], tables: &MatcherTables) -> Vec<Match> {
    let haystack: String = password.iter().collect();
    // regex offsets are byte positions; spans are char positions
    let byte_to_char = char_index_map(&haystack);

    let mut matches = Vec::new();
    for (name, regex) in tables.regexen.entries() {
        for hit in regex.find_iter(&haystack) {
            if hit.is_empty() {
                continue;
            }
            let i = byte_to_char[hit.start()];
            let j = byte_to_char[hit.end() - 1];
            matches.push(Match::new(
                MatchPattern::Regex {
                    name: name.clone(),
                    matched: hit.as_str().to_string(),
                },
                i,
                j,
                hit.as_str().to_string(),
            ));
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{default_tables, MatcherTables, RegexTable};

    fn hits(password: &str) -> Vec<Match> {
        let chars: Vec<char> = password.chars().collect();
        regex_match(&chars, default_tables())
    }

    fn name_of(m: &Match) -> &str {
        match &m.pattern {
            MatchPattern::Regex { name, .. } => name,
            other => panic!("expected regex match, got {:?}", other),
        }
    }

    #[test]
    fn recent_year_is_found() {
        let matches = hits("hello1997world");
        assert_eq!(matches.len(), 1);
        assert_eq!(name_of(&matches[0]), "recent_year");
        assert_eq!((matches[0].i, matches[0].j), (5, 8));
        assert_eq!(matches[0].token, "1997");
    }

    #[test]
    fn old_year_is_not_recent() {
        assert!(hits("anno1492").is_empty());
    }

    #[test]
    fn multiple_hits_of_one_pattern() {
        let matches = hits("1999and2015");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].token, "1999");
        assert_eq!(matches[1].token, "2015");
    }

    #[test]
    fn spans_are_char_based_with_multibyte_prefix() {
        let matches = hits("héllo2003");
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].i, matches[0].j), (5, 8));
    }

    #[test]
    fn extra_patterns_are_applied() {
        let mut tables = MatcherTables::build().unwrap();
        tables.regexen = RegexTable::from_patterns(&[
            ("recent_year", r"19\d\d|200\d|201\d"),
            ("digits", r"\d{2,}"),
        ])
        .unwrap();
        let chars: Vec<char> = "ab1997".chars().collect();
        let matches = regex_match(&chars, &tables);
        let names: Vec<&str> = matches.iter().map(name_of).collect();
        assert!(names.contains(&"recent_year"));
        assert!(names.contains(&"digits"));
    }
}
