//! Spotter persistence, one JSON file per user and chain under
//! `{store_dir}/{user_key}/fbb/{puzzle_id}.json`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::solver::Spotter;

#[derive(Debug)]
pub enum StoreError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Write(std::io::Error),
    /// Key segment that would escape the store directory.
    InvalidKey(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read spotter: {err}"),
            Self::Parse(err) => write!(f, "failed to parse spotter JSON: {err}"),
            Self::Write(err) => write!(f, "failed to write spotter: {err}"),
            Self::InvalidKey(key) => write!(f, "invalid spotter key segment '{key}'"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSpotter {
    #[serde(default)]
    pub saved_at: Option<String>,
    pub spotter: Spotter,
}

fn check_segment(segment: &str) -> Result<&str, StoreError> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\']);
    if bad {
        return Err(StoreError::InvalidKey(segment.to_string()));
    }
    Ok(segment)
}

pub fn spotter_path(store_dir: &str, user_key: &str, puzzle_id: &str) -> Result<PathBuf, StoreError> {
    Ok(Path::new(store_dir)
        .join(check_segment(user_key)?)
        .join("fbb")
        .join(format!("{}.json", check_segment(puzzle_id)?)))
}

/// A chain with no stored file starts from an empty spotter.
pub fn load_spotter(store_dir: &str, user_key: &str, puzzle_id: &str) -> Result<Spotter, StoreError> {
    let path = spotter_path(store_dir, user_key, puzzle_id)?;
    if !path.exists() {
        debug!("no stored spotter at {}", path.display());
        return Ok(Spotter::new(puzzle_id));
    }
    let raw = fs::read_to_string(&path).map_err(StoreError::Read)?;
    let stored: StoredSpotter = serde_json::from_str(&raw).map_err(StoreError::Parse)?;
    if stored.spotter.id != puzzle_id {
        // The file name is authoritative; saving keys off the spotter id.
        warn!(
            "stored spotter id '{}' differs from chain '{puzzle_id}'; re-keying",
            stored.spotter.id
        );
        return Ok(Spotter {
            id: puzzle_id.to_string(),
            ..stored.spotter
        });
    }
    Ok(stored.spotter)
}

pub fn save_spotter(
    store_dir: &str,
    user_key: &str,
    spotter: &Spotter,
) -> Result<PathBuf, StoreError> {
    let path = spotter_path(store_dir, user_key, &spotter.id)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(StoreError::Write)?;
    }
    let stored = StoredSpotter {
        saved_at: Some(Utc::now().to_rfc3339()),
        spotter: spotter.clone(),
    };
    let serialized = serde_json::to_string_pretty(&stored).map_err(StoreError::Parse)?;
    fs::write(&path, serialized).map_err(StoreError::Write)?;
    debug!("saved spotter to {}", path.display());
    Ok(path)
}
