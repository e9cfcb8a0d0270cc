use std::fs;
use std::path::Path;

use crate::data::SnapshotError;
use crate::solver::Puzzle;

pub const DEFAULT_PUZZLE_PATH: &str = "data/fbb/puzzle.json";

pub fn parse_puzzle(raw: &str) -> Result<Puzzle, SnapshotError> {
    serde_json::from_str(raw).map_err(SnapshotError::Parse)
}

pub fn load_puzzle(path: impl AsRef<Path>) -> Result<Puzzle, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(SnapshotError::Read)?;
    parse_puzzle(&raw)
}
