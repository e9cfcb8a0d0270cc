//! Export candidate groups as delimited text for pasting into fleet chat or a
//! spreadsheet. One row per (node, group).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::solver::finder::FinderReport;
use crate::solver::Puzzle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPrefs {
    pub header: bool,
    pub delimiter: char,
    /// Include the node's given traits column.
    pub node_traits: bool,
    pub include_alpha: bool,
    pub include_nonoptimal: bool,
    pub flag_alpha: bool,
    pub flag_nonoptimal: bool,
    pub flag_unique: bool,
}

impl Default for ExportPrefs {
    fn default() -> Self {
        Self {
            header: true,
            delimiter: ',',
            node_traits: true,
            include_alpha: true,
            include_nonoptimal: true,
            flag_alpha: true,
            flag_nonoptimal: true,
            flag_unique: true,
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    /// Delimiter must be a single-byte character.
    Delimiter(char),
    Csv(csv::Error),
    Flush(String),
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimiter(ch) => write!(f, "unsupported export delimiter '{ch}'"),
            Self::Csv(err) => write!(f, "failed to write export row: {err}"),
            Self::Flush(err) => write!(f, "failed to flush export: {err}"),
            Self::Utf8(err) => write!(f, "export is not valid UTF-8: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub fn export_groups_csv(
    report: &FinderReport,
    puzzle: &Puzzle,
    prefs: &ExportPrefs,
) -> Result<String, ExportError> {
    if !prefs.delimiter.is_ascii() {
        return Err(ExportError::Delimiter(prefs.delimiter));
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(prefs.delimiter as u8)
        .from_writer(Vec::new());

    if prefs.header {
        let mut header = vec!["node"];
        if prefs.node_traits {
            header.push("given_traits");
        }
        header.extend(["traits", "crew", "notes"]);
        writer.write_record(&header)?;
    }

    for candidates in &report.nodes {
        let given = candidates
            .traits_known
            .iter()
            .map(|t| puzzle.trait_name(t))
            .collect::<Vec<_>>()
            .join(" + ");

        for group in &candidates.groups.groups {
            if group.notes.alpha_exception && !prefs.include_alpha {
                continue;
            }
            if group.notes.non_optimal && !prefs.include_nonoptimal {
                continue;
            }
            let traits = group
                .traits
                .iter()
                .map(|t| puzzle.trait_name(t))
                .collect::<Vec<_>>()
                .join(" + ");
            let crew = group
                .crew
                .iter()
                .map(|symbol| report.crew_name(symbol))
                .collect::<Vec<_>>()
                .join(", ");

            let mut notes = Vec::new();
            if prefs.flag_alpha && group.notes.alpha_exception {
                notes.push("alpha exception");
            }
            if prefs.flag_nonoptimal && group.notes.non_optimal {
                notes.push("non-optimal");
            }
            if prefs.flag_unique && group.notes.unique {
                notes.push("unique");
            }

            let node_number = (candidates.node + 1).to_string();
            let mut row = vec![node_number.as_str()];
            if prefs.node_traits {
                row.push(given.as_str());
            }
            let notes = notes.join("; ");
            row.extend([traits.as_str(), crew.as_str(), notes.as_str()]);
            writer.write_record(&row)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    String::from_utf8(bytes).map_err(ExportError::Utf8)
}
