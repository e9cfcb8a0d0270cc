use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    #[serde(alias = "command_skill")]
    Command,
    #[serde(alias = "diplomacy_skill")]
    Diplomacy,
    #[serde(alias = "engineering_skill")]
    Engineering,
    #[serde(alias = "medicine_skill")]
    Medicine,
    #[serde(alias = "science_skill")]
    Science,
    #[serde(alias = "security_skill")]
    Security,
}

impl Skill {
    pub const ALL: [Skill; 6] = [
        Skill::Command,
        Skill::Diplomacy,
        Skill::Engineering,
        Skill::Medicine,
        Skill::Science,
        Skill::Security,
    ];

    pub fn short(&self) -> &'static str {
        match self {
            Self::Command => "CMD",
            Self::Diplomacy => "DIP",
            Self::Engineering => "ENG",
            Self::Medicine => "MED",
            Self::Science => "SCI",
            Self::Security => "SEC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityCategory {
    Core,
    Shuttle,
    Gauntlet,
    Voyage,
}

impl UtilityCategory {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Core => "B",
            Self::Shuttle => "S",
            Self::Gauntlet => "G",
            Self::Voyage => "V",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillSet {
    Single(Skill),
    /// Always stored in [Skill::ALL] order.
    Pair(Skill, Skill),
}

impl SkillSet {
    pub fn skills(&self) -> Vec<Skill> {
        match self {
            Self::Single(skill) => vec![*skill],
            Self::Pair(first, second) => vec![*first, *second],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtilityKey {
    pub category: UtilityCategory,
    pub skills: SkillSet,
}

impl UtilityKey {
    pub fn single(category: UtilityCategory, skill: Skill) -> Self {
        Self {
            category,
            skills: SkillSet::Single(skill),
        }
    }

    pub fn pair(category: UtilityCategory, a: Skill, b: Skill) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            category,
            skills: SkillSet::Pair(first, second),
        }
    }
}

/// Short label such as `V_CMD_DIP`, for display and export only.
impl fmt::Display for UtilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category.prefix())?;
        for skill in self.skills.skills() {
            write!(f, "_{}", skill.short())?;
        }
        Ok(())
    }
}

impl Serialize for UtilityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
