//! Applying confirmed traits to a node.
//!
//! Every operation returns a new [Node]; the caller's snapshot is untouched,
//! so a rejected call leaves nothing to roll back.

use crate::solver::{Node, SolveSlot, SolverError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleTraitOutcome {
    Solved(Node),
    /// More than one slot is hidden; the player has to say which combo (or a
    /// partial solve) the trait belongs to.
    NeedsConfirmation {
        node: usize,
        trait_id: String,
        hidden_left: usize,
    },
}

/// Fill unknown slots left to right from `fill`; known slots are kept.
fn fill_unknown<I>(node: &Node, fill: I) -> Node
where
    I: IntoIterator<Item = SolveSlot>,
{
    let mut fill = fill.into_iter();
    let solve = node
        .solve
        .iter()
        .map(|slot| match slot {
            SolveSlot::Unknown => fill.next().unwrap_or(SolveSlot::Unknown),
            known => known.clone(),
        })
        .collect();
    Node {
        solve,
        ..node.clone()
    }
}

fn ensure_open(node: &Node) -> Result<usize, SolverError> {
    match node.hidden_left() {
        0 => Err(SolverError::NodeAlreadySolved(node.index)),
        hidden_left => Ok(hidden_left),
    }
}

fn ensure_arity(node: &Node, expected: usize, actual: usize) -> Result<(), SolverError> {
    if expected != actual {
        return Err(SolverError::InvalidComboLength {
            node: node.index,
            expected,
            actual,
        });
    }
    Ok(())
}

/// A single trait solved the node: final slot filled, or confirmation needed.
pub fn apply_single_trait(node: &Node, trait_id: &str) -> Result<SingleTraitOutcome, SolverError> {
    match ensure_open(node)? {
        1 => Ok(SingleTraitOutcome::Solved(fill_unknown(
            node,
            [SolveSlot::known(trait_id)],
        ))),
        hidden_left => Ok(SingleTraitOutcome::NeedsConfirmation {
            node: node.index,
            trait_id: trait_id.to_string(),
            hidden_left,
        }),
    }
}

/// Fill every unknown slot with `traits`; the node ends solved.
pub fn apply_combo(node: &Node, traits: &[String]) -> Result<Node, SolverError> {
    let hidden_left = ensure_open(node)?;
    ensure_arity(node, hidden_left, traits.len())?;
    Ok(fill_unknown(
        node,
        traits.iter().cloned().map(SolveSlot::Known),
    ))
}

/// Fill only the first unknown slot.
pub fn apply_partial(node: &Node, trait_id: &str) -> Result<Node, SolverError> {
    ensure_open(node)?;
    Ok(fill_unknown(node, [SolveSlot::known(trait_id)]))
}

/// Generic solve: one slot per unknown slot; `Unknown` entries stay unknown,
/// so `[x, ?]` on a two-slot node is a partial solve.
pub fn apply_solve(node: &Node, slots: &[SolveSlot]) -> Result<Node, SolverError> {
    let hidden_left = ensure_open(node)?;
    ensure_arity(node, hidden_left, slots.len())?;
    Ok(fill_unknown(node, slots.iter().cloned()))
}

/// Overwrite the whole solve record. Administrative correction; may move a
/// node back to a less solved state.
pub fn correct_solve(node: &Node, slots: &[SolveSlot]) -> Result<Node, SolverError> {
    ensure_arity(node, node.hidden_total(), slots.len())?;
    Ok(Node {
        solve: slots.to_vec(),
        ..node.clone()
    })
}
