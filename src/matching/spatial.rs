// spatial matcher: runs of physically adjacent keys

use crate::matching::{sort_matches, token_of, Match, MatchPattern};
use crate::tables::graphs::is_alphabetic_graph;
use crate::tables::{AdjacencyGraph, MatcherTables};

/// chars that require shift on a standard us keyboard
const SHIFTED_CHARS: &str = "~!@#$%^&*()_+QWERTYUIOP{}|ASDFGHJKL:\"ZXCVBNM<>?";

/// find runs of graph-adjacent keys, one pass per configured graph
pub fn spatial_match(password: &[char], tables: &MatcherTables) -> Vec<Match> {
    let mut matches = Vec::new();
    for graph in tables.graphs.values() {
        matches.extend(spatial_match_helper(password, graph));
    }
    sort_matches(&mut matches);
    matches
}

fn spatial_match_helper(password: &[char], graph: &AdjacencyGraph) -> Vec<Match> {
    let n = password.len();
    let mut matches = Vec::new();
    if n < 2 {
        return matches;
    }

    let count_shift = is_alphabetic_graph(&graph.name);
    let mut i = 0;
    while i + 1 < n {
        let mut j = i + 1;
        let mut last_direction: Option<usize> = None;
        let mut turns = 0;
        // a leading shifted symbol counts on alphabetic keyboards
        let mut shifted_count = if count_shift && SHIFTED_CHARS.contains(password[i]) {
            1
        } else {
            0
        };

        loop {
            let prev = password[j - 1];
            let mut found = false;
            if j < n {
                let cur = password[j];
                if let Some(slots) = graph.neighbors_of(prev) {
                    for (direction, slot) in slots.iter().enumerate() {
                        let Some(neighbor) = slot else { continue };
                        let Some(pos) = neighbor.chars().position(|c| c == cur) else {
                            continue;
                        };
                        found = true;
                        // slot index 1 of a key token is its shifted char
                        if pos == 1 {
                            shifted_count += 1;
                        }
                        if last_direction != Some(direction) {
                            turns += 1;
                            last_direction = Some(direction);
                        }
                        break;
                    }
                }
            }

            if found {
                j += 1;
            } else {
                // only runs longer than two keys are worth reporting
                if j - i > 2 {
                    matches.push(Match::new(
                        MatchPattern::Spatial {
                            graph: graph.name.clone(),
                            turns,
                            shifted_count,
                        },
                        i,
                        j - 1,
                        token_of(password, i, j - 1),
                    ));
                }
                i = j;
                break;
            }
        }
    }
    matches
}
