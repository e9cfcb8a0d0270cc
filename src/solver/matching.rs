//! Crew-to-node matching: which roster crew could fill which open node.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::data::roster::Crew;
use crate::solver::{Node, Puzzle};

/// What one crew could solve on one open node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewNodeMatch {
    pub index: usize,
    pub alpha_test: String,
    /// Union of the traits used by `combos`, sorted.
    pub traits: Vec<String>,
    /// Every still-possible `hidden_left`-sized combo, each sorted.
    pub combos: Vec<Vec<String>>,
}

impl CrewNodeMatch {
    pub fn from_combos(index: usize, alpha_test: String, combos: Vec<Vec<String>>) -> Self {
        let traits: BTreeSet<String> = combos.iter().flatten().cloned().collect();
        Self {
            index,
            alpha_test,
            traits: traits.into_iter().collect(),
            combos,
        }
    }

    pub fn covers(&self, combo: &[String]) -> bool {
        self.combos.iter().any(|candidate| candidate.as_slice() == combo)
    }

    pub fn covers_trait(&self, trait_id: &str) -> bool {
        self.combos.iter().any(|combo| combo.iter().any(|t| t == trait_id))
    }
}

/// A roster crew with its matches on the chain's open nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BossCrew {
    pub symbol: String,
    pub name: String,
    pub owned: bool,
    pub only_frozen: bool,
    pub node_matches: BTreeMap<usize, CrewNodeMatch>,
}

impl BossCrew {
    pub fn node_match(&self, index: usize) -> Option<&CrewNodeMatch> {
        self.node_matches.get(&index)
    }

    /// Number of open nodes this crew might solve.
    pub fn coverage(&self) -> usize {
        self.node_matches.len()
    }
}

/// All C(n, k) combinations of `k` elements from `items`, preserving relative order.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if k > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    combine(items, k, 0, &mut Vec::new(), &mut result);
    result
}

fn combine<T: Clone>(
    items: &[T],
    k: usize,
    start: usize,
    current: &mut Vec<T>,
    result: &mut Vec<Vec<T>>,
) {
    if current.len() == k {
        result.push(current.clone());
        return;
    }
    for i in start..items.len() {
        current.push(items[i].clone());
        combine(items, k, i + 1, current, result);
        current.pop();
    }
}

/// Sorted, deduplicated copy of a combo so it compares equal to stored combos.
pub fn normalize_combo(traits: &[String]) -> Vec<String> {
    let set: BTreeSet<&String> = traits.iter().collect();
    set.into_iter().cloned().collect()
}

/// Traits that could still fill one of `node`'s hidden slots: pool traits with
/// instances left, minus the node's given and already confirmed traits.
pub fn possible_traits(puzzle: &Puzzle, node: &Node) -> Vec<String> {
    let excluded: HashSet<&str> = node.required_traits().collect();
    puzzle
        .remaining_instances()
        .into_iter()
        .filter(|(trait_id, remaining)| *remaining > 0 && !excluded.contains(trait_id))
        .map(|(trait_id, _)| trait_id.to_string())
        .collect()
}

fn node_match(crew: &Crew, node: &Node, possible: &[String]) -> Option<CrewNodeMatch> {
    let hidden_left = node.hidden_left();
    if hidden_left == 0 || !node.required_traits().all(|t| crew.has_trait(t)) {
        return None;
    }
    let traits: Vec<String> = possible
        .iter()
        .filter(|t| crew.has_trait(t))
        .cloned()
        .collect();
    if traits.len() < hidden_left {
        return None;
    }
    let combos = combinations(&traits, hidden_left);
    Some(CrewNodeMatch {
        index: node.index,
        alpha_test: node.alpha_test.clone(),
        traits,
        combos,
    })
}

/// Match every roster crew against the open nodes.
///
/// Attempted crew are left out. Because a tried crew failed every open node,
/// each combo it would have satisfied is ruled out for that node and dropped
/// from the other crews' matches too.
pub fn match_crew(puzzle: &Puzzle, roster: &[Crew], attempted: &[String]) -> Vec<BossCrew> {
    let open: Vec<(&Node, Vec<String>)> = puzzle
        .open_nodes()
        .map(|node| (node, possible_traits(puzzle, node)))
        .collect();
    let attempted: HashSet<&str> = attempted.iter().map(String::as_str).collect();

    let mut ruled_out: HashMap<usize, HashSet<Vec<String>>> = HashMap::new();
    let mut matched = Vec::new();
    let mut seen = HashSet::new();

    for crew in roster {
        if !seen.insert(crew.symbol.as_str()) {
            continue;
        }
        let node_matches: BTreeMap<usize, CrewNodeMatch> = open
            .iter()
            .filter_map(|(node, possible)| node_match(crew, node, possible))
            .map(|node_match| (node_match.index, node_match))
            .collect();

        if attempted.contains(crew.symbol.as_str()) {
            for node_match in node_matches.into_values() {
                ruled_out
                    .entry(node_match.index)
                    .or_default()
                    .extend(node_match.combos);
            }
            continue;
        }
        if node_matches.is_empty() {
            continue;
        }
        matched.push(BossCrew {
            symbol: crew.symbol.clone(),
            name: crew.name.clone(),
            owned: crew.owned,
            only_frozen: crew.only_frozen,
            node_matches,
        });
    }

    if !ruled_out.is_empty() {
        for crew in &mut matched {
            let mut narrowed = BTreeMap::new();
            for (index, node_match) in std::mem::take(&mut crew.node_matches) {
                let Some(excluded) = ruled_out.get(&index) else {
                    narrowed.insert(index, node_match);
                    continue;
                };
                let combos: Vec<Vec<String>> = node_match
                    .combos
                    .into_iter()
                    .filter(|combo| !excluded.contains(combo))
                    .collect();
                if !combos.is_empty() {
                    narrowed.insert(
                        index,
                        CrewNodeMatch::from_combos(index, node_match.alpha_test, combos),
                    );
                }
            }
            crew.node_matches = narrowed;
        }
        matched.retain(|crew| !crew.node_matches.is_empty());
    }

    debug!(
        "matched {} of {} crew across {} open node(s)",
        matched.len(),
        roster.len(),
        open.len()
    );
    matched
}
