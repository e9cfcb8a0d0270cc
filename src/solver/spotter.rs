//! Per-chain player state: confirmed solves and crew already tried.
//! Hosts persist it between sessions and hand it back on reload.

use serde::{Deserialize, Serialize};

use crate::solver::solve::correct_solve;
use crate::solver::{Node, Puzzle, SolveSlot, SolverError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRecord {
    pub node: usize,
    pub traits: Vec<SolveSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spotter {
    pub id: String,
    #[serde(default)]
    pub solves: Vec<SolveRecord>,
    #[serde(default)]
    pub attempted_crew: Vec<String>,
}

impl Spotter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_attempted(&self, symbol: &str) -> bool {
        self.attempted_crew.iter().any(|s| s == symbol)
    }

    /// Mark a crew as tried. Marking twice changes nothing.
    pub fn mark_attempted(&self, symbol: &str) -> Spotter {
        let mut next = self.clone();
        if !next.is_attempted(symbol) {
            next.attempted_crew.push(symbol.to_string());
        }
        next
    }

    /// Replace the attempt list, keeping first occurrences only.
    pub fn set_attempts(&self, symbols: Vec<String>) -> Spotter {
        let mut attempted_crew: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !attempted_crew.contains(&symbol) {
                attempted_crew.push(symbol);
            }
        }
        Spotter {
            attempted_crew,
            ..self.clone()
        }
    }

    /// Store the full solve for a node, replacing any earlier record.
    pub fn record_solve(&self, node: usize, traits: Vec<SolveSlot>) -> Spotter {
        let mut next = self.clone();
        match next.solves.iter_mut().find(|record| record.node == node) {
            Some(record) => record.traits = traits,
            None => next.solves.push(SolveRecord { node, traits }),
        }
        next
    }

    pub fn record_node(&self, node: &Node) -> Spotter {
        self.record_solve(node.index, node.solve.clone())
    }

    /// Replay stored solves onto a fresh puzzle snapshot.
    pub fn apply_to(&self, puzzle: &Puzzle) -> Result<Puzzle, SolverError> {
        let mut current = puzzle.clone();
        for record in &self.solves {
            let node = correct_solve(current.node(record.node)?, &record.traits)?;
            current = current.with_node(node)?;
        }
        Ok(current)
    }
}
