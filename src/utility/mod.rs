//! Crew utility: how many skill niches each crew ranks highly in on the roster.
//!
//! Ranks are keyed by [UtilityKey], a category plus one or two skills.

mod key;

pub use key::{Skill, SkillSet, UtilityCategory, UtilityKey};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::roster::Crew;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub core: f64,
    #[serde(default, alias = "range_min")]
    pub min: f64,
    #[serde(default, alias = "range_max")]
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityThresholds {
    pub core: usize,
    pub shuttle: usize,
    pub gauntlet: usize,
    pub voyage: usize,
}

impl Default for UtilityThresholds {
    fn default() -> Self {
        Self {
            core: 10,
            shuttle: 10,
            gauntlet: 10,
            voyage: 10,
        }
    }
}

impl UtilityThresholds {
    pub fn for_category(&self, category: UtilityCategory) -> usize {
        match category {
            UtilityCategory::Core => self.core,
            UtilityCategory::Shuttle => self.shuttle,
            UtilityCategory::Gauntlet => self.gauntlet,
            UtilityCategory::Voyage => self.voyage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityPrefs {
    pub thresholds: UtilityThresholds,
    /// Only crew with three skills count for voyages and gauntlet.
    pub prefer_versatile: bool,
}

impl Default for UtilityPrefs {
    fn default() -> Self {
        Self {
            thresholds: UtilityThresholds::default(),
            prefer_versatile: true,
        }
    }
}

/// Crew symbols in rank order for every utility key.
pub type UtilityRanks = BTreeMap<UtilityKey, Vec<String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UtilityCounts {
    /// Core and shuttle keys together.
    pub shuttle: usize,
    pub gauntlet: usize,
    pub voyage: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewUtility {
    pub symbol: String,
    /// 1-based rank per key; 0 when the crew is not ranked for it.
    pub ranks: BTreeMap<UtilityKey, usize>,
    /// Keys where the rank is within the category threshold.
    pub thresholds: Vec<UtilityKey>,
    pub counts: UtilityCounts,
}

fn skill(crew: &Crew, skill: Skill) -> SkillScore {
    match crew.skills.get(&skill) {
        Some(score) if score.core > 0.0 => *score,
        _ => SkillScore::default(),
    }
}

fn skill_count(crew: &Crew) -> usize {
    crew.skills.values().filter(|score| score.core > 0.0).count()
}

fn core_score(crew: &Crew, target: Skill) -> f64 {
    skill(crew, target).core
}

/// Higher core plus a quarter of the lower one.
fn shuttle_score(crew: &Crew, first: Skill, second: Skill) -> f64 {
    let a = skill(crew, first).core;
    let b = skill(crew, second).core;
    if a > b {
        a + b / 4.0
    } else {
        b + a / 4.0
    }
}

fn voyage_score(crew: &Crew, skills: &[Skill], prefs: &UtilityPrefs) -> f64 {
    if prefs.prefer_versatile && skill_count(crew) < 3 {
        return 0.0;
    }
    skills
        .iter()
        .map(|s| {
            let score = skill(crew, *s);
            score.core + (score.min + score.max) / 2.0
        })
        .sum()
}

/// Approximate gauntlet strength: mean of the proficiency maxima.
///
/// The in-game gauntlet rating also weighs skill tiers and rarity, which a
/// roster export does not carry, so this only ranks crew relative to each other.
fn gauntlet_score(crew: &Crew, skills: &[Skill], prefs: &UtilityPrefs) -> f64 {
    if prefs.prefer_versatile && skill_count(crew) < 3 {
        return 0.0;
    }
    let total: f64 = skills.iter().map(|s| skill(crew, *s).max).sum();
    total / skills.len() as f64
}

/// Stable descending sort by score. With `drop_zero`, unscored crew are left out.
fn rank_by<F>(roster: &[Crew], drop_zero: bool, score: F) -> Vec<String>
where
    F: Fn(&Crew) -> f64,
{
    let mut scored: Vec<(f64, &Crew)> = roster
        .iter()
        .map(|crew| (score(crew), crew))
        .filter(|(value, _)| !drop_zero || *value > 0.0)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(_, crew)| crew.symbol.clone()).collect()
}

/// Rank the roster for every category and skill combination.
pub fn score_utility(roster: &[Crew], prefs: &UtilityPrefs) -> UtilityRanks {
    let mut ranks = UtilityRanks::new();
    for (position, first) in Skill::ALL.iter().copied().enumerate() {
        ranks.insert(
            UtilityKey::single(UtilityCategory::Core, first),
            rank_by(roster, false, |crew| core_score(crew, first)),
        );
        ranks.insert(
            UtilityKey::single(UtilityCategory::Gauntlet, first),
            rank_by(roster, true, |crew| gauntlet_score(crew, &[first], prefs)),
        );
        for second in Skill::ALL.iter().copied().skip(position + 1) {
            ranks.insert(
                UtilityKey::pair(UtilityCategory::Shuttle, first, second),
                rank_by(roster, true, |crew| shuttle_score(crew, first, second)),
            );
            ranks.insert(
                UtilityKey::pair(UtilityCategory::Gauntlet, first, second),
                rank_by(roster, true, |crew| {
                    gauntlet_score(crew, &[first, second], prefs)
                }),
            );
            ranks.insert(
                UtilityKey::pair(UtilityCategory::Voyage, first, second),
                rank_by(roster, true, |crew| {
                    voyage_score(crew, &[first, second], prefs)
                }),
            );
        }
    }
    debug!("scored {} utility key(s) over {} crew", ranks.len(), roster.len());
    ranks
}

/// One crew's ranks, the keys within threshold and per-area counts.
pub fn crew_utility(symbol: &str, ranks: &UtilityRanks, thresholds: &UtilityThresholds) -> CrewUtility {
    let mut crew_ranks = BTreeMap::new();
    let mut within = Vec::new();
    for (key, ranked) in ranks {
        let rank = ranked
            .iter()
            .position(|s| s == symbol)
            .map_or(0, |position| position + 1);
        crew_ranks.insert(*key, rank);
        if rank > 0 && rank <= thresholds.for_category(key.category) {
            within.push(*key);
        }
    }

    let counts = UtilityCounts {
        shuttle: within
            .iter()
            .filter(|key| {
                matches!(key.category, UtilityCategory::Core | UtilityCategory::Shuttle)
            })
            .count(),
        gauntlet: within
            .iter()
            .filter(|key| key.category == UtilityCategory::Gauntlet)
            .count(),
        voyage: within
            .iter()
            .filter(|key| key.category == UtilityCategory::Voyage)
            .count(),
    };

    CrewUtility {
        symbol: symbol.to_string(),
        ranks: crew_ranks,
        thresholds: within,
        counts,
    }
}
