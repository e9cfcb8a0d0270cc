//! Crew roster snapshot supplied by the host.
//! Accepts either a bare JSON array or `{ "crew": [...] }`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::SnapshotError;
use crate::utility::{Skill, SkillScore};

pub const DEFAULT_ROSTER_PATH: &str = "data/fbb/roster.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Unrevealed traits; they count for solving but are not shown in game.
    #[serde(default)]
    pub traits_hidden: Vec<String>,
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub only_frozen: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skills: BTreeMap<Skill, SkillScore>,
}

impl Crew {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, traits: &[&str]) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            traits: traits.iter().map(|t| t.to_string()).collect(),
            traits_hidden: Vec::new(),
            owned: false,
            only_frozen: false,
            skills: BTreeMap::new(),
        }
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.iter().any(|t| t == trait_id) || self.traits_hidden.iter().any(|t| t == trait_id)
    }

    /// Usable means owned and not only available as frozen copies.
    pub fn is_thawed(&self) -> bool {
        self.owned && !self.only_frozen
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Bare(Vec<Crew>),
    Wrapped { crew: Vec<Crew> },
}

pub fn parse_roster(raw: &str) -> Result<Vec<Crew>, SnapshotError> {
    let parsed: RosterFile = serde_json::from_str(raw).map_err(SnapshotError::Parse)?;
    Ok(match parsed {
        RosterFile::Bare(crew) => crew,
        RosterFile::Wrapped { crew } => crew,
    })
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Crew>, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(SnapshotError::Read)?;
    parse_roster(&raw)
}
