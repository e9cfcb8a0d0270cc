//! Display preferences supplied by the host UI.
//!
//! The alpha rule and the non-optimal rule are community heuristics with a
//! good but imperfect track record, so each can be set to hide or flag.
//! Alpha exceptions are flagged by default; non-optimal crew are hidden.

use serde::{Deserialize, Serialize};

use crate::data::roster::Crew;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinderView {
    #[default]
    Groups,
    Table,
}

/// How a heuristic's verdict is applied to the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicMode {
    /// Remove flagged candidates entirely.
    Hide,
    /// Keep flagged candidates, marked as such.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsableFilter {
    #[default]
    #[serde(rename = "")]
    All,
    Owned,
    Thawed,
}

impl UsableFilter {
    pub fn admits(&self, crew: &Crew) -> bool {
        match self {
            Self::All => true,
            Self::Owned => crew.owned,
            Self::Thawed => crew.is_thawed(),
        }
    }

    pub fn admits_flags(&self, owned: bool, only_frozen: bool) -> bool {
        match self {
            Self::All => true,
            Self::Owned => owned,
            Self::Thawed => owned && !only_frozen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderPrefs {
    pub view: FinderView,
    pub alpha: HeuristicMode,
    pub nonoptimal: HeuristicMode,
    pub usable: UsableFilter,
}

impl Default for FinderPrefs {
    fn default() -> Self {
        Self {
            view: FinderView::Groups,
            alpha: HeuristicMode::Flag,
            nonoptimal: HeuristicMode::Hide,
            usable: UsableFilter::All,
        }
    }
}

impl FinderPrefs {
    /// True when the chosen filters can remove the correct solution from view.
    pub fn may_hide_solutions(&self) -> bool {
        self.usable != UsableFilter::All || self.alpha == HeuristicMode::Hide
    }
}
