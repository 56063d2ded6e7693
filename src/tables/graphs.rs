// keyboard adjacency graphs built from layout grids

use std::collections::BTreeMap;
use std::collections::HashMap;

use once_cell::sync::Lazy;

/// a keyboard or keypad adjacency graph with precomputed stats.
///
/// each key maps to a fixed-size list of neighbor slots. the slot index
/// encodes the geometric direction of the neighbor; a missing key in that
/// direction keeps its slot as None. a neighbor entry holds the key's
/// characters, unshifted first ("aA", "1!"); keypad keys have a single char.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    pub name: String,
    neighbors: HashMap<char, Vec<Option<String>>>,
    /// mean number of present neighbors over all keys.
    /// on qwerty, 'g' has degree 6 (adjacent to 'ftyhbv') while '\' has 1.
    pub average_degree: f64,
    /// number of distinct key chars, used as the count of starting positions
    /// when estimating the space of spatial patterns
    pub starting_positions: usize,
}

impl AdjacencyGraph {
    /// neighbor slots of a key char, or None if the char is not on this layout
    pub fn neighbors_of(&self, c: char) -> Option<&[Option<String>]> {
        self.neighbors.get(&c).map(|v| v.as_slice())
    }

    pub fn contains(&self, c: char) -> bool {
        self.neighbors.contains_key(&c)
    }
}

/// a physical layout definition: rows of space-separated key tokens, each row
/// with the x coordinate of its first key. slanted layouts (keyboards) have
/// 6 neighbor slots, aligned layouts (keypads) have 8.
struct LayoutSpec {
    name: &'static str,
    slanted: bool,
    rows: &'static [(i32, &'static str)],
}

const QWERTY: LayoutSpec = LayoutSpec {
    name: "qwerty",
    slanted: true,
    rows: &[
        (0, "`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) -_ =+"),
        (1, "qQ wW eE rR tT yY uU iI oO pP [{ ]} \\|"),
        (1, "aA sS dD fF gG hH jJ kK lL ;: '\""),
        (1, "zZ xX cC vV bB nN mM ,< .> /?"),
    ],
};

const DVORAK: LayoutSpec = LayoutSpec {
    name: "dvorak",
    slanted: true,
    rows: &[
        (0, "`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) [{ ]}"),
        (1, "'\" ,< .> pP yY fF gG cC rR lL /? =+ \\|"),
        (1, "aA oO eE uU iI dD hH tT nN sS -_"),
        (1, ";: qQ jJ kK xX bB mM wW vV zZ"),
    ],
};

const AZERTY: LayoutSpec = LayoutSpec {
    name: "azerty",
    slanted: true,
    rows: &[
        (0, "&1 é2 \"3 '4 (5 -6 è7 _8 ç9 à0 )° =+"),
        (1, "aA zZ eE rR tT yY uU iI oO pP ^¨ $£"),
        (1, "qQ sS dD fF gG hH jJ kK lL mM ù% *µ"),
        (1, "<> wW xX cC vV bB nN ,? ;. :/ !§"),
    ],
};

const KEYPAD: LayoutSpec = LayoutSpec {
    name: "keypad",
    slanted: false,
    rows: &[
        (1, "/ * -"),
        (0, "7 8 9 +"),
        (0, "4 5 6"),
        (0, "1 2 3"),
        (1, "0 ."),
    ],
};

const MAC_KEYPAD: LayoutSpec = LayoutSpec {
    name: "mac_keypad",
    slanted: false,
    rows: &[
        (1, "= / *"),
        (0, "7 8 9 -"),
        (0, "4 5 6 +"),
        (0, "1 2 3"),
        (1, "0 ."),
    ],
};

/// graphs whose keys are typed with the full alphabetic keyboard; these get
/// shifted-character handling in the spatial matcher and share the keyboard
/// stats in the guess estimator
pub fn is_alphabetic_graph(name: &str) -> bool {
    matches!(name, "qwerty" | "dvorak" | "azerty")
}

fn slanted_adjacent_coords(x: i32, y: i32) -> [(i32, i32); 6] {
    [
        (x - 1, y),
        (x + 1, y),
        (x, y - 1),
        (x + 1, y - 1),
        (x - 1, y + 1),
        (x, y + 1),
    ]
}

fn aligned_adjacent_coords(x: i32, y: i32) -> [(i32, i32); 8] {
    [
        (x - 1, y),
        (x, y - 1),
        (x + 1, y - 1),
        (x + 1, y),
        (x + 1, y + 1),
        (x, y + 1),
        (x - 1, y + 1),
        (x - 1, y - 1),
    ]
}

fn build_graph(spec: &LayoutSpec) -> AdjacencyGraph {
    let mut position_table: HashMap<(i32, i32), &str> = HashMap::new();
    for (y, (x_start, row)) in spec.rows.iter().enumerate() {
        for (k, token) in row.split_whitespace().enumerate() {
            position_table.insert((x_start + k as i32, y as i32), token);
        }
    }

    let mut neighbors: HashMap<char, Vec<Option<String>>> = HashMap::new();
    for (&(x, y), token) in &position_table {
        let coords: Vec<(i32, i32)> = if spec.slanted {
            slanted_adjacent_coords(x, y).to_vec()
        } else {
            aligned_adjacent_coords(x, y).to_vec()
        };
        let slots: Vec<Option<String>> = coords
            .iter()
            .map(|coord| position_table.get(coord).map(|t| t.to_string()))
            .collect();
        for c in token.chars() {
            neighbors.insert(c, slots.clone());
        }
    }

    let key_count = position_table.len();
    let degree_sum: usize = position_table
        .values()
        .map(|token| {
            // all chars of a key share the same slots; count once per key
            let c = token.chars().next().unwrap_or(' ');
            neighbors
                .get(&c)
                .map(|slots| slots.iter().flatten().count())
                .unwrap_or(0)
        })
        .sum();
    let average_degree = if key_count > 0 {
        degree_sum as f64 / key_count as f64
    } else {
        0.0
    };

    AdjacencyGraph {
        name: spec.name.to_string(),
        starting_positions: neighbors.len(),
        neighbors,
        average_degree,
    }
}

/// build the five standard graphs, keyed by name.
/// BTreeMap keeps matcher iteration order deterministic.
pub fn default_graphs() -> BTreeMap<String, AdjacencyGraph> {
    [QWERTY, DVORAK, AZERTY, KEYPAD, MAC_KEYPAD]
        .iter()
        .map(|spec| (spec.name.to_string(), build_graph(spec)))
        .collect()
}

/// (average degree, starting positions) pairs used by the spatial guess
/// estimator; computed once from the standard layouts
pub struct GraphStats {
    pub average_degree: f64,
    pub starting_positions: f64,
}

static KEYBOARD_STATS: Lazy<GraphStats> = Lazy::new(|| {
    let g = build_graph(&QWERTY);
    GraphStats {
        average_degree: g.average_degree,
        starting_positions: g.starting_positions as f64,
    }
});

static KEYPAD_STATS: Lazy<GraphStats> = Lazy::new(|| {
    let g = build_graph(&KEYPAD);
    GraphStats {
        average_degree: g.average_degree,
        starting_positions: g.starting_positions as f64,
    }
});

pub fn keyboard_stats() -> &'static GraphStats {
    &KEYBOARD_STATS
}

pub fn keypad_stats() -> &'static GraphStats {
    &KEYPAD_STATS
}
