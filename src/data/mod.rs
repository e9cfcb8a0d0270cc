//! File-backed snapshots: roster, puzzle, trait names, spotter state and config.
//! Everything here only moves values in and out of the pure `solver` core.

pub mod config;
pub mod puzzle;
pub mod roster;
pub mod spotter_store;
pub mod trait_names;
pub mod validate;

use std::fmt;

#[derive(Debug)]
pub enum SnapshotError {
    Read(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read snapshot: {err}"),
            Self::Parse(err) => write!(f, "failed to parse snapshot JSON: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {}
