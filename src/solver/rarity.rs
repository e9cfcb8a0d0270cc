//! Trait and combo rarity per open node. Fewer matching crew means a rarer,
//! more informative guess.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::solver::matching::{combinations, BossCrew, CrewNodeMatch};
use crate::solver::{Node, SolverError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RarityEntry {
    pub combo: Vec<String>,
    pub crew: Vec<String>,
}

impl RarityEntry {
    pub fn rarity(&self) -> usize {
        self.crew.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RarityTable {
    pub node: usize,
    /// Single trait -> crew symbols whose match uses it.
    pub traits: BTreeMap<String, Vec<String>>,
    /// Every valid-length combo, including ones no crew satisfies.
    pub combos: Vec<RarityEntry>,
}

impl RarityTable {
    pub fn trait_rarity(&self, trait_id: &str) -> usize {
        self.traits.get(trait_id).map_or(0, Vec::len)
    }

    pub fn combo(&self, combo: &[String]) -> Option<&RarityEntry> {
        self.combos.iter().find(|entry| entry.combo.as_slice() == combo)
    }

    pub fn combo_rarity(&self, combo: &[String]) -> usize {
        self.combo(combo).map_or(0, RarityEntry::rarity)
    }

    /// Combos containing `trait_id` that at least one crew satisfies, most
    /// shared first. Used to offer choices when one trait is not enough.
    pub fn combos_with_trait(&self, trait_id: &str) -> Vec<&RarityEntry> {
        let mut options: Vec<&RarityEntry> = self
            .combos
            .iter()
            .filter(|entry| entry.rarity() > 0 && entry.combo.iter().any(|t| t == trait_id))
            .collect();
        options.sort_by(|a, b| b.rarity().cmp(&a.rarity()));
        options
    }
}

/// Colour band the finder uses for a rarity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RarityTier {
    Unmatched,
    Unique,
    Pair,
    Trio,
    Quad,
    Quint,
    Common,
}

impl RarityTier {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Unmatched,
            1 => Self::Unique,
            2 => Self::Pair,
            3 => Self::Trio,
            4 => Self::Quad,
            5 => Self::Quint,
            _ => Self::Common,
        }
    }
}

/// Rarity table for `node` over the traits the matching crew bring to it.
pub fn compute_rarities(node: &Node, matching_crew: &[BossCrew]) -> Result<RarityTable, SolverError> {
    compute_rarities_over(node, matching_crew, &[])
}

/// Like [compute_rarities] but also covers the `possible` pool traits, so
/// traits and combos no crew carries still show up with an empty list.
pub fn compute_rarities_over(
    node: &Node,
    matching_crew: &[BossCrew],
    possible: &[String],
) -> Result<RarityTable, SolverError> {
    if !node.is_open() {
        return Err(SolverError::NodeAlreadySolved(node.index));
    }
    let matches: Vec<(&str, &CrewNodeMatch)> = matching_crew
        .iter()
        .filter_map(|crew| {
            crew.node_match(node.index)
                .map(|node_match| (crew.symbol.as_str(), node_match))
        })
        .collect();

    let mut pool: BTreeSet<String> = possible.iter().cloned().collect();
    for (_, node_match) in &matches {
        pool.extend(node_match.traits.iter().cloned());
    }
    let pool: Vec<String> = pool.into_iter().collect();

    let traits = pool
        .iter()
        .map(|trait_id| {
            let crew = symbols_where(&matches, |m| m.covers_trait(trait_id));
            (trait_id.clone(), crew)
        })
        .collect();

    let combos = combinations(&pool, node.hidden_left())
        .into_iter()
        .map(|combo| {
            let crew = symbols_where(&matches, |m| m.covers(&combo));
            RarityEntry { combo, crew }
        })
        .collect();

    Ok(RarityTable {
        node: node.index,
        traits,
        combos,
    })
}

fn symbols_where<F>(matches: &[(&str, &CrewNodeMatch)], predicate: F) -> Vec<String>
where
    F: Fn(&CrewNodeMatch) -> bool,
{
    let mut seen = HashSet::new();
    matches
        .iter()
        .filter(|(symbol, node_match)| predicate(*node_match) && seen.insert(*symbol))
        .map(|(symbol, _)| symbol.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_counts() {
        assert_eq!(RarityTier::from_count(0), RarityTier::Unmatched);
        assert_eq!(RarityTier::from_count(1), RarityTier::Unique);
        assert_eq!(RarityTier::from_count(5), RarityTier::Quint);
        assert_eq!(RarityTier::from_count(9), RarityTier::Common);
    }

    #[test]
    fn solved_node_is_rejected() {
        let mut node = Node::new(2, &[], 1, "");
        node.solve[0] = crate::solver::SolveSlot::known("x");
        assert_eq!(compute_rarities(&node, &[]), Err(SolverError::NodeAlreadySolved(2)));
    }

    #[test]
    fn pool_traits_without_crew_are_still_listed() {
        let node = Node::new(0, &[], 2, "");
        let table = compute_rarities_over(&node, &[], &["x".into(), "y".into()]).unwrap();
        assert_eq!(table.trait_rarity("x"), 0);
        assert_eq!(table.combos.len(), 1);
        assert!(table.combos[0].crew.is_empty());
    }
}
