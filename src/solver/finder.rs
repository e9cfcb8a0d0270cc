use log::debug;
use serde::Serialize;

use crate::data::roster::Crew;
use crate::solver::groups::{filter_groups, CandidateGroups};
use crate::solver::matching::{match_crew, possible_traits, BossCrew};
use crate::solver::optimal::{
    filter_alpha_exceptions, get_optimal_combos, is_alpha_exception, OptimalCombo,
};
use crate::solver::prefs::{FinderPrefs, HeuristicMode};
use crate::solver::rarity::{compute_rarities_over, RarityTable};
use crate::solver::{Puzzle, SolverError, Spotter};

#[derive(Debug, Clone, Serialize)]
pub struct NodeCandidates {
    pub node: usize,
    pub traits_known: Vec<String>,
    pub hidden_left: usize,
    pub possible_traits: Vec<String>,
    pub rarities: RarityTable,
    pub groups: CandidateGroups,
}

/// Everything the finder shows for one chain, derived in a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct FinderReport {
    pub puzzle_id: String,
    pub matching_crew: Vec<BossCrew>,
    pub optimal_combos: Vec<OptimalCombo>,
    pub nodes: Vec<NodeCandidates>,
    /// The active filters could hide the correct solution.
    pub filters_may_hide_solutions: bool,
}

impl FinderReport {
    pub fn node(&self, index: usize) -> Option<&NodeCandidates> {
        self.nodes.iter().find(|candidates| candidates.node == index)
    }

    pub fn crew_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.matching_crew
            .iter()
            .find(|crew| crew.symbol == symbol)
            .map_or(symbol, |crew| crew.name.as_str())
    }
}

/// Replay `spotter` onto `puzzle`, match the roster and build rarities and
/// groups for every open node. Solved nodes are skipped.
pub fn derive(
    puzzle: &Puzzle,
    roster: &[Crew],
    spotter: &Spotter,
    prefs: &FinderPrefs,
) -> Result<FinderReport, SolverError> {
    let puzzle = spotter.apply_to(puzzle)?;

    let mut matching_crew = match_crew(&puzzle, roster, &spotter.attempted_crew);
    if prefs.alpha == HeuristicMode::Hide {
        matching_crew = filter_alpha_exceptions(&matching_crew);
    }
    let optimal_combos = get_optimal_combos(&matching_crew);

    let mut nodes = Vec::new();
    for node in puzzle.open_nodes() {
        let mut possible = possible_traits(&puzzle, node);
        if prefs.alpha == HeuristicMode::Hide {
            possible.retain(|t| !is_alpha_exception(t, &node.alpha_test));
        }
        let rarities = compute_rarities_over(node, &matching_crew, &possible)?;
        let groups = filter_groups(node, &matching_crew, &rarities, &optimal_combos, prefs)?;
        debug!(
            "node {}: {} possible trait(s), {} group(s)",
            node.index,
            possible.len(),
            groups.groups.len()
        );
        nodes.push(NodeCandidates {
            node: node.index,
            traits_known: node.traits_known.clone(),
            hidden_left: node.hidden_left(),
            possible_traits: possible,
            rarities,
            groups,
        });
    }

    Ok(FinderReport {
        puzzle_id: puzzle.id.clone(),
        matching_crew,
        optimal_combos,
        nodes,
        filters_may_hide_solutions: prefs.may_hide_solutions(),
    })
}
