use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::solver::SolverError;

/// Placeholder used for a hidden slot whose trait is not known yet.
pub const UNKNOWN_TRAIT: &str = "?";

/// One hidden trait slot of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SolveSlot {
    Known(String),
    Unknown,
}

impl SolveSlot {
    pub fn known(trait_id: impl Into<String>) -> Self {
        Self::Known(trait_id.into())
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            Self::Known(trait_id) => Some(trait_id),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<String> for SolveSlot {
    fn from(value: String) -> Self {
        if value == UNKNOWN_TRAIT || value.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Known(value)
        }
    }
}

impl From<SolveSlot> for String {
    fn from(slot: SolveSlot) -> Self {
        match slot {
            SolveSlot::Known(trait_id) => trait_id,
            SolveSlot::Unknown => UNKNOWN_TRAIT.to_string(),
        }
    }
}

impl fmt::Display for SolveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(trait_id) => write!(f, "{trait_id}"),
            Self::Unknown => write!(f, "{UNKNOWN_TRAIT}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeState {
    Unsolved,
    PartiallySolved,
    Solved,
}

impl NodeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsolved => "unsolved",
            Self::PartiallySolved => "partially-solved",
            Self::Solved => "solved",
        }
    }
}

/// One slot of the boss battle chain.
///
/// `hidden_left` is derived from `solve`, so the number of filled slots always
/// matches how far the hidden count has dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NodeSnapshot", into = "NodeSnapshot")]
pub struct Node {
    pub index: usize,
    /// Traits the game shows for this node.
    pub traits_known: Vec<String>,
    pub alpha_test: String,
    pub solve: Vec<SolveSlot>,
}

impl Node {
    pub fn new(index: usize, traits_known: &[&str], hidden: usize, alpha_test: &str) -> Self {
        Self {
            index,
            traits_known: traits_known.iter().map(|t| t.to_string()).collect(),
            alpha_test: alpha_test.to_string(),
            solve: vec![SolveSlot::Unknown; hidden],
        }
    }

    pub fn hidden_total(&self) -> usize {
        self.solve.len()
    }

    pub fn hidden_left(&self) -> usize {
        self.solve.iter().filter(|slot| slot.is_unknown()).count()
    }

    pub fn is_open(&self) -> bool {
        self.hidden_left() > 0
    }

    pub fn state(&self) -> NodeState {
        match self.hidden_left() {
            0 => NodeState::Solved,
            n if n == self.hidden_total() => NodeState::Unsolved,
            _ => NodeState::PartiallySolved,
        }
    }

    /// Hidden traits already confirmed for this node.
    pub fn confirmed_traits(&self) -> impl Iterator<Item = &str> {
        self.solve.iter().filter_map(SolveSlot::as_known)
    }

    /// Every trait a crew must carry to be a candidate: given plus confirmed.
    pub fn required_traits(&self) -> impl Iterator<Item = &str> {
        self.traits_known
            .iter()
            .map(String::as_str)
            .chain(self.confirmed_traits())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeSnapshot {
    index: usize,
    #[serde(default)]
    traits_known: Vec<String>,
    #[serde(default)]
    hidden_left: Option<usize>,
    #[serde(default)]
    alpha_test: String,
    #[serde(default)]
    solve: Option<Vec<SolveSlot>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeShapeError(String);

impl fmt::Display for NodeShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NodeShapeError {}

impl TryFrom<NodeSnapshot> for Node {
    type Error = NodeShapeError;

    fn try_from(raw: NodeSnapshot) -> Result<Self, Self::Error> {
        let solve = match (raw.solve, raw.hidden_left) {
            (Some(solve), Some(hidden_left)) => {
                let unknown = solve.iter().filter(|slot| slot.is_unknown()).count();
                if unknown != hidden_left {
                    return Err(NodeShapeError(format!(
                        "node {}: hiddenLeft {hidden_left} disagrees with {unknown} unknown solve slot(s)",
                        raw.index
                    )));
                }
                solve
            }
            (Some(solve), None) => solve,
            (None, Some(hidden_left)) => vec![SolveSlot::Unknown; hidden_left],
            (None, None) => {
                return Err(NodeShapeError(format!(
                    "node {}: needs either 'solve' or 'hiddenLeft'",
                    raw.index
                )))
            }
        };
        Ok(Node {
            index: raw.index,
            traits_known: raw.traits_known,
            alpha_test: raw.alpha_test,
            solve,
        })
    }
}

impl From<Node> for NodeSnapshot {
    fn from(node: Node) -> Self {
        NodeSnapshot {
            index: node.index,
            hidden_left: Some(node.hidden_left()),
            traits_known: node.traits_known,
            alpha_test: node.alpha_test,
            solve: Some(node.solve),
        }
    }
}

/// A trait that may fill hidden slots somewhere in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleTrait {
    #[serde(rename = "trait")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// How many hidden slots across the chain this trait can fill.
    #[serde(default = "default_instances")]
    pub instances: usize,
}

fn default_instances() -> usize {
    1
}

impl PuzzleTrait {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            instances: 1,
        }
    }
}

/// Solver snapshot for one boss battle chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub traits: Vec<PuzzleTrait>,
}

impl Puzzle {
    pub fn node(&self, index: usize) -> Result<&Node, SolverError> {
        self.nodes
            .iter()
            .find(|node| node.index == index)
            .ok_or(SolverError::UnknownNodeIndex(index))
    }

    pub fn open_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_open())
    }

    /// New snapshot with `node` replacing the node of the same index.
    pub fn with_node(&self, node: Node) -> Result<Puzzle, SolverError> {
        let position = self
            .nodes
            .iter()
            .position(|existing| existing.index == node.index)
            .ok_or(SolverError::UnknownNodeIndex(node.index))?;
        let mut next = self.clone();
        next.nodes[position] = node;
        Ok(next)
    }

    /// Remaining instances per trait after subtracting every confirmed solve.
    pub fn remaining_instances(&self) -> BTreeMap<&str, usize> {
        let mut remaining: BTreeMap<&str, usize> = BTreeMap::new();
        for trait_entry in &self.traits {
            *remaining.entry(trait_entry.id.as_str()).or_default() += trait_entry.instances;
        }
        for trait_id in self.nodes.iter().flat_map(Node::confirmed_traits) {
            if let Some(count) = remaining.get_mut(trait_id) {
                *count = count.saturating_sub(1);
            }
        }
        remaining
    }

    pub fn trait_name<'a>(&'a self, trait_id: &'a str) -> &'a str {
        self.traits
            .iter()
            .find(|t| t.id == trait_id)
            .and_then(|t| t.name.as_deref())
            .unwrap_or(trait_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_round_trips_placeholder_as_question_mark() {
        let slots: Vec<SolveSlot> = serde_json::from_str(r#"["pilot","?"]"#).unwrap();
        assert_eq!(slots, vec![SolveSlot::known("pilot"), SolveSlot::Unknown]);
        assert_eq!(serde_json::to_string(&slots).unwrap(), r#"["pilot","?"]"#);
    }

    #[test]
    fn node_state_follows_solve_slots() {
        let mut node = Node::new(0, &["human"], 2, "m");
        assert_eq!(node.state(), NodeState::Unsolved);
        node.solve[0] = SolveSlot::known("pilot");
        assert_eq!(node.state(), NodeState::PartiallySolved);
        node.solve[1] = SolveSlot::known("spy");
        assert_eq!(node.state(), NodeState::Solved);
        assert_eq!(node.required_traits().collect::<Vec<_>>(), vec!["human", "pilot", "spy"]);
    }

    #[test]
    fn with_node_rejects_unknown_index() {
        let puzzle = Puzzle {
            id: "p".into(),
            nodes: vec![Node::new(0, &[], 1, "")],
            traits: Vec::new(),
        };
        let stray = Node::new(4, &[], 1, "");
        assert_eq!(puzzle.with_node(stray), Err(SolverError::UnknownNodeIndex(4)));
    }

    #[test]
    fn confirmed_solves_consume_instances() {
        let mut node = Node::new(0, &[], 2, "");
        node.solve[0] = SolveSlot::known("pilot");
        let puzzle = Puzzle {
            id: "p".into(),
            nodes: vec![node],
            traits: vec![
                PuzzleTrait::new("pilot"),
                PuzzleTrait {
                    instances: 2,
                    ..PuzzleTrait::new("spy")
                },
            ],
        };
        let remaining = puzzle.remaining_instances();
        assert_eq!(remaining.get("pilot"), Some(&0));
        assert_eq!(remaining.get("spy"), Some(&2));
    }
}
