//! Trait id to display name lookup, used by exports and CLI output.

use std::collections::BTreeMap;
use std::fs;

use serde::Deserialize;

use crate::data::SnapshotError;
use crate::solver::Puzzle;

pub const DEFAULT_TRAIT_NAMES_PATH: &str = "data/fbb/trait_names.json";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraitNamesFile {
    Wrapped { trait_names: BTreeMap<String, String> },
    Bare(BTreeMap<String, String>),
}

pub fn parse_trait_names(raw: &str) -> Result<BTreeMap<String, String>, SnapshotError> {
    let file: TraitNamesFile = serde_json::from_str(raw).map_err(SnapshotError::Parse)?;
    Ok(match file {
        TraitNamesFile::Wrapped { trait_names } => trait_names,
        TraitNamesFile::Bare(names) => names,
    })
}

pub fn load_trait_names(path: &str) -> Result<BTreeMap<String, String>, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(SnapshotError::Read)?;
    parse_trait_names(&raw)
}

/// Fill in names the puzzle snapshot did not carry. Names already present win.
pub fn apply_trait_names(puzzle: &Puzzle, names: &BTreeMap<String, String>) -> Puzzle {
    let mut named = puzzle.clone();
    for entry in &mut named.traits {
        if entry.name.is_none() {
            entry.name = names.get(&entry.id).cloned();
        }
    }
    named
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::PuzzleTrait;

    #[test]
    fn accepts_wrapped_and_bare_maps() {
        let wrapped = parse_trait_names(r#"{"trait_names": {"vulcan": "Vulcan"}}"#).unwrap();
        let bare = parse_trait_names(r#"{"vulcan": "Vulcan"}"#).unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn existing_names_are_kept() {
        let mut named = PuzzleTrait::new("vulcan");
        named.name = Some("Vulcan (given)".into());
        let puzzle = Puzzle {
            id: "chain".into(),
            nodes: Vec::new(),
            traits: vec![named, PuzzleTrait::new("romulan")],
        };
        let mut names = BTreeMap::new();
        names.insert("vulcan".to_string(), "Vulcan".to_string());
        names.insert("romulan".to_string(), "Romulan".to_string());

        let puzzle = apply_trait_names(&puzzle, &names);
        assert_eq!(puzzle.trait_name("vulcan"), "Vulcan (given)");
        assert_eq!(puzzle.trait_name("romulan"), "Romulan");
    }
}
