//! Candidate groups: crew bundled by the traits they would test on a node.

use std::borrow::Cow;

use serde::Serialize;

use crate::solver::matching::BossCrew;
use crate::solver::optimal::{
    is_alpha_exception, is_crew_optimal_for_node, strip_alpha_exceptions, OptimalCombo,
};
use crate::solver::prefs::{FinderPrefs, HeuristicMode};
use crate::solver::rarity::RarityTable;
use crate::solver::{Node, SolverError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupNotes {
    /// Uses a trait sorting before the node's alpha test.
    pub alpha_exception: bool,
    /// Traits are a strict subset of another group's on this node.
    pub non_optimal: bool,
    /// Only one crew can test these traits.
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateGroup {
    pub traits: Vec<String>,
    pub crew: Vec<String>,
    /// Crew count of the rarest combo this group can test.
    pub rarity: usize,
    pub notes: GroupNotes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateGroups {
    pub node: usize,
    pub groups: Vec<CandidateGroup>,
}

impl CandidateGroups {
    /// No known matches; a valid outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn crew_count(&self) -> usize {
        self.groups.iter().map(|group| group.crew.len()).sum()
    }
}

pub fn filter_groups(
    node: &Node,
    matching_crew: &[BossCrew],
    rarities: &RarityTable,
    optimal: &[OptimalCombo],
    prefs: &FinderPrefs,
) -> Result<CandidateGroups, SolverError> {
    if !node.is_open() {
        return Err(SolverError::NodeAlreadySolved(node.index));
    }

    let mut groups: Vec<CandidateGroup> = Vec::new();
    for crew in matching_crew
        .iter()
        .filter(|crew| prefs.usable.admits_flags(crew.owned, crew.only_frozen))
    {
        let Some(node_match) = crew.node_match(node.index) else {
            continue;
        };
        // `optimal` was built from the same matches, so judge before stripping.
        let non_optimal = !is_crew_optimal_for_node(node_match, optimal);
        if non_optimal && prefs.nonoptimal == HeuristicMode::Hide {
            continue;
        }

        let node_match = match prefs.alpha {
            HeuristicMode::Hide => match strip_alpha_exceptions(node_match) {
                Some(stripped) => Cow::Owned(stripped),
                None => continue,
            },
            HeuristicMode::Flag => Cow::Borrowed(node_match),
        };

        if let Some(group) = groups.iter_mut().find(|group| group.traits == node_match.traits) {
            if !group.crew.contains(&crew.symbol) {
                group.crew.push(crew.symbol.clone());
            }
            continue;
        }
        let rarity = node_match
            .combos
            .iter()
            .map(|combo| rarities.combo_rarity(combo))
            .min()
            .unwrap_or(0);
        let alpha_exception = node_match
            .traits
            .iter()
            .any(|t| is_alpha_exception(t, &node.alpha_test));
        groups.push(CandidateGroup {
            traits: node_match.traits.clone(),
            crew: vec![crew.symbol.clone()],
            rarity,
            notes: GroupNotes {
                alpha_exception,
                non_optimal,
                unique: false,
            },
        });
    }

    for group in &mut groups {
        group.notes.unique = group.crew.len() == 1;
    }
    groups.sort_by(|a, b| a.rarity.cmp(&b.rarity).then_with(|| a.traits.cmp(&b.traits)));

    Ok(CandidateGroups {
        node: node.index,
        groups,
    })
}
