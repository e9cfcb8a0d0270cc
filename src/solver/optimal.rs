//! Community heuristics for ordering guesses.
//!
//! Alpha rule: a node's hidden traits have never been observed to sort before
//! its `alpha_test` trait, so traits that do are likely wrong.
//!
//! Optimal rule: if one crew's usable traits for a node are a strict subset of
//! another crew's, trying the larger set tests everything the smaller one would.
//!
//! Neither rule is guaranteed by the game.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::solver::matching::{BossCrew, CrewNodeMatch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimalCombo {
    pub traits: Vec<String>,
    pub nodes: Vec<usize>,
}

pub fn is_alpha_exception(trait_id: &str, alpha_test: &str) -> bool {
    !alpha_test.is_empty() && trait_id < alpha_test
}

/// `node_match` without any combo that uses an alpha exception trait.
/// None when nothing is left.
pub fn strip_alpha_exceptions(node_match: &CrewNodeMatch) -> Option<CrewNodeMatch> {
    let combos: Vec<Vec<String>> = node_match
        .combos
        .iter()
        .filter(|combo| {
            !combo
                .iter()
                .any(|t| is_alpha_exception(t, &node_match.alpha_test))
        })
        .cloned()
        .collect();
    if combos.is_empty() {
        return None;
    }
    Some(CrewNodeMatch::from_combos(
        node_match.index,
        node_match.alpha_test.clone(),
        combos,
    ))
}

/// Drop alpha exception combos from every crew; crew left with no match go too.
pub fn filter_alpha_exceptions(crew_list: &[BossCrew]) -> Vec<BossCrew> {
    crew_list
        .iter()
        .filter_map(|crew| {
            let node_matches: BTreeMap<usize, CrewNodeMatch> = crew
                .node_matches
                .values()
                .filter_map(strip_alpha_exceptions)
                .map(|node_match| (node_match.index, node_match))
                .collect();
            if node_matches.is_empty() {
                return None;
            }
            Some(BossCrew {
                symbol: crew.symbol.clone(),
                name: crew.name.clone(),
                owned: crew.owned,
                only_frozen: crew.only_frozen,
                node_matches,
            })
        })
        .collect()
}

/// Trait sets that no other crew's set strictly contains on the same node.
pub fn get_optimal_combos(crew_list: &[BossCrew]) -> Vec<OptimalCombo> {
    let mut viable: BTreeMap<usize, BTreeSet<&Vec<String>>> = BTreeMap::new();
    for node_match in crew_list.iter().flat_map(|crew| crew.node_matches.values()) {
        viable
            .entry(node_match.index)
            .or_default()
            .insert(&node_match.traits);
    }

    let mut optimal: Vec<OptimalCombo> = Vec::new();
    for (node, trait_sets) in &viable {
        for traits in trait_sets {
            let dominated = trait_sets.iter().any(|other| {
                other.len() > traits.len() && traits.iter().all(|t| other.contains(t))
            });
            if dominated {
                continue;
            }
            match optimal.iter_mut().find(|combo| &combo.traits == *traits) {
                Some(combo) => combo.nodes.push(*node),
                None => optimal.push(OptimalCombo {
                    traits: (*traits).clone(),
                    nodes: vec![*node],
                }),
            }
        }
    }
    optimal
}

pub fn is_crew_optimal_for_node(node_match: &CrewNodeMatch, optimal: &[OptimalCombo]) -> bool {
    optimal
        .iter()
        .any(|combo| combo.nodes.contains(&node_match.index) && combo.traits == node_match.traits)
}

/// Optimal on at least one of its nodes.
pub fn is_crew_optimal(crew: &BossCrew, optimal: &[OptimalCombo]) -> bool {
    crew.node_matches
        .values()
        .any(|node_match| is_crew_optimal_for_node(node_match, optimal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss(symbol: &str, index: usize, alpha_test: &str, combos: &[&[&str]]) -> BossCrew {
        let combos = combos
            .iter()
            .map(|combo| combo.iter().map(|t| t.to_string()).collect())
            .collect();
        let node_match = CrewNodeMatch::from_combos(index, alpha_test.to_string(), combos);
        BossCrew {
            symbol: symbol.into(),
            name: symbol.to_uppercase(),
            owned: true,
            only_frozen: false,
            node_matches: BTreeMap::from([(index, node_match)]),
        }
    }

    #[test]
    fn alpha_exception_is_strictly_before_test() {
        assert!(is_alpha_exception("android", "medic"));
        assert!(!is_alpha_exception("medic", "medic"));
        assert!(!is_alpha_exception("zombie", "medic"));
        assert!(!is_alpha_exception("android", ""));
    }

    #[test]
    fn filtering_alpha_drops_exception_combos_and_empty_crew() {
        let crew = vec![
            boss("mixed", 0, "m", &[&["a"], &["z"]]),
            boss("only_a", 0, "m", &[&["a"]]),
        ];
        let filtered = filter_alpha_exceptions(&crew);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].node_match(0).unwrap().traits, vec!["z".to_string()]);
    }

    #[test]
    fn subset_crew_is_not_optimal() {
        let crew = vec![
            boss("wide", 0, "", &[&["x"], &["y"]]),
            boss("narrow", 0, "", &[&["x"]]),
            boss("other", 1, "", &[&["x"]]),
        ];
        let optimal = get_optimal_combos(&crew);
        assert!(is_crew_optimal(&crew[0], &optimal));
        assert!(!is_crew_optimal(&crew[1], &optimal));
        // Same traits, different node: optimal there.
        assert!(is_crew_optimal(&crew[2], &optimal));
    }
}
