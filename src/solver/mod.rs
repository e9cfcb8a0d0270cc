//! Fleet boss battle chain solver.
//!
//! Pure derivations over an in-memory puzzle snapshot and crew roster: which
//! crew could fill each open node, how rare each trait/combo is, which groups
//! to show the player, and how confirmed solves update a node. Nothing here
//! performs I/O; hosts persist the returned snapshots themselves.

pub mod export;
pub mod finder;
pub mod groups;
pub mod matching;
pub mod optimal;
pub mod prefs;
pub mod rarity;
pub mod solve;
pub mod spotter;
mod types;

use std::fmt;

pub use export::{export_groups_csv, ExportError, ExportPrefs};
pub use finder::{derive, FinderReport, NodeCandidates};
pub use groups::{filter_groups, CandidateGroup, CandidateGroups, GroupNotes};
pub use matching::{
    combinations, match_crew, normalize_combo, possible_traits, BossCrew, CrewNodeMatch,
};
pub use optimal::{
    filter_alpha_exceptions, get_optimal_combos, is_alpha_exception, is_crew_optimal,
    is_crew_optimal_for_node, strip_alpha_exceptions, OptimalCombo,
};
pub use prefs::{FinderPrefs, FinderView, HeuristicMode, UsableFilter};
pub use rarity::{compute_rarities, compute_rarities_over, RarityEntry, RarityTable, RarityTier};
pub use solve::{
    apply_combo, apply_partial, apply_single_trait, apply_solve, correct_solve,
    SingleTraitOutcome,
};
pub use spotter::{SolveRecord, Spotter};
pub use types::{Node, NodeShapeError, NodeState, Puzzle, PuzzleTrait, SolveSlot, UNKNOWN_TRAIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Combo arity does not match the node's hidden slot count.
    InvalidComboLength {
        node: usize,
        expected: usize,
        actual: usize,
    },
    UnknownNodeIndex(usize),
    /// Operation needs an open node but every slot is already filled.
    NodeAlreadySolved(usize),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidComboLength {
                node,
                expected,
                actual,
            } => write!(
                f,
                "node {node} needs {expected} trait(s) but {actual} were supplied"
            ),
            Self::UnknownNodeIndex(index) => write!(f, "no node with index {index} in puzzle"),
            Self::NodeAlreadySolved(index) => write!(f, "node {index} is already solved"),
        }
    }
}

impl std::error::Error for SolverError {}
