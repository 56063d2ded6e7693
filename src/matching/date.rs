// date matcher: digit blocks with or without a separator that read as a date

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::matching::{token_of, Match, MatchPattern};
use crate::scoring::reference_year;
use crate::tables::MatcherTables;

pub const DATE_MIN_YEAR: i32 = 1000;
pub const DATE_MAX_YEAR: i32 = 2050;

const SEPARATOR_CHARS: &str = " /\\_.-";

// ways to split a run of digits into three date components, by run length
static DATE_SPLITS: Lazy<HashMap<usize, Vec<(usize, usize)>>> = Lazy::new(|| {
    let mut splits = HashMap::new();
    splits.insert(4, vec![(1, 2), (2, 3)]);
    splits.insert(5, vec![(1, 3), (2, 3)]);
    splits.insert(6, vec![(1, 2), (2, 4), (4, 5)]);
    splits.insert(7, vec![(1, 3), (2, 3), (4, 5), (4, 6)]);
    splits.insert(8, vec![(2, 4), (4, 6)]);
    splits
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dmy {
    year: i32,
    month: i32,
    day: i32,
}

pub fn date_match(password: &[char], _tables: &MatcherTables) -> Vec<Match> {
    let n = password.len();
    let mut matches = Vec::new();
    let ref_year = reference_year();

    // dates without separators: 4 to 8 consecutive digits
    if n >= 4 {
        for i in 0..=n - 4 {
            for j in i + 3..n.min(i + 8) {
                if !password[i..=j].iter().all(|c| c.is_ascii_digit()) {
                    continue;
                }
                let token = token_of(password, i, j);
                let mut best: Option<Dmy> = None;
                for &(k, l) in &DATE_SPLITS[&token.len()] {
                    let ints = [
                        parse_digits(&token[..k]),
                        parse_digits(&token[k..l]),
                        parse_digits(&token[l..]),
                    ];
                    let Some(candidate) = map_ints_to_dmy(ints) else {
                        continue;
                    };
                    // among valid readings prefer the year closest to today,
                    // e.g. 111504 reads as 15/11/2004, not 1/1/1504
                    let closer = match best {
                        None => true,
                        Some(b) => {
                            (candidate.year - ref_year).abs() < (b.year - ref_year).abs()
                        }
                    };
                    if closer {
                        best = Some(candidate);
                    }
                }
                if let Some(dmy) = best {
                    matches.push(Match::new(
                        MatchPattern::Date {
                            separator: String::new(),
                            year: dmy.year,
                            month: dmy.month,
                            day: dmy.day,
                        },
                        i,
                        j,
                        token,
                    ));
                }
            }
        }
    }

    // dates with separators: 6 to 10 chars shaped like d{1,4} sep d{1,2} sep d{1,4}
    if n >= 6 {
        for i in 0..=n - 6 {
            for j in i + 5..n.min(i + 10) {
                if let Some((dmy, separator)) = parse_separated_date(&password[i..=j]) {
                    matches.push(Match::new(
                        MatchPattern::Date {
                            separator: separator.to_string(),
                            year: dmy.year,
                            month: dmy.month,
                            day: dmy.day,
                        },
                        i,
                        j,
                        token_of(password, i, j),
                    ));
                }
            }
        }
    }

    // a date fully inside another date span is a weaker reading of the same
    // digits, drop it
    let spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.i, m.j)).collect();
    matches.retain(|m| {
        !spans
            .iter()
            .any(|&(oi, oj)| (oi, oj) != (m.i, m.j) && oi <= m.i && oj >= m.j)
    });
    matches
}

// anchored parse of d{1,4} sep d{1,2} sep d{1,4} with matching separators
fn parse_separated_date(chars: &[char]) -> Option<(Dmy, char)> {
    let mut pos = 0;
    let first = take_digits(chars, &mut pos, 4)?;
    let separator = *chars.get(pos)?;
    if !is_separator(separator) {
        return None;
    }
    pos += 1;
    let middle = take_digits(chars, &mut pos, 2)?;
    if chars.get(pos) != Some(&separator) {
        return None;
    }
    pos += 1;
    let last = take_digits(chars, &mut pos, 4)?;
    if pos != chars.len() {
        return None;
    }
    let dmy = map_ints_to_dmy([first, middle, last])?;
    Some((dmy, separator))
}

fn is_separator(c: char) -> bool {
    SEPARATOR_CHARS.contains(c) || c.is_whitespace()
}

// greedily consumes up to max_len digits, at least one
fn take_digits(chars: &[char], pos: &mut usize, max_len: usize) -> Option<i32> {
    let start = *pos;
    while *pos < chars.len() && *pos - start < max_len && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    let digits: String = chars[start..*pos].iter().collect();
    Some(parse_digits(&digits))
}

fn parse_digits(s: &str) -> i32 {
    // callers only pass 1..=4 ascii digits, which always fit
    s.parse().unwrap_or(0)
}

fn map_ints_to_dmy(ints: [i32; 3]) -> Option<Dmy> {
    // the middle component can never be a 4-digit year
    if ints[1] > 31 || ints[1] <= 0 {
        return None;
    }
    let mut over_12 = 0;
    let mut over_31 = 0;
    let mut under_1 = 0;
    for &int in &ints {
        if (99 < int && int < DATE_MIN_YEAR) || int > DATE_MAX_YEAR {
            return None;
        }
        if int > 31 {
            over_31 += 1;
        }
        if int > 12 {
            over_12 += 1;
        }
        if int <= 0 {
            under_1 += 1;
        }
    }
    if over_31 >= 2 || over_12 == 3 || under_1 >= 2 {
        return None;
    }

    // the year sits at one end or the other
    let year_splits = [
        (ints[2], [ints[0], ints[1]]),
        (ints[0], [ints[1], ints[2]]),
    ];
    for (year, rest) in year_splits {
        if (DATE_MIN_YEAR..=DATE_MAX_YEAR).contains(&year) {
            return map_ints_to_dm(rest).map(|(day, month)| Dmy { year, month, day });
        }
    }
    for (year, rest) in year_splits {
        if let Some((day, month)) = map_ints_to_dm(rest) {
            return Some(Dmy {
                year: two_to_four_digit_year(year),
                month,
                day,
            });
        }
    }
    None
}

fn map_ints_to_dm(ints: [i32; 2]) -> Option<(i32, i32)> {
    for (day, month) in [(ints[0], ints[1]), (ints[1], ints[0])] {
        if (1..=31).contains(&day) && (1..=12).contains(&month) {
            return Some((day, month));
        }
    }
    None
}

fn two_to_four_digit_year(year: i32) -> i32 {
    if year > 99 {
        year
    } else if year > 50 {
        year + 1900
    } else {
        year + 2000
    }
}
