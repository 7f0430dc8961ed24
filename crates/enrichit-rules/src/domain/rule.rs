//! The closed catalog of enrichment rules.
//!
//! Variants are declared in the order they are applied: case-insensitive
//! lexicographic order of their wire ids. The derived `Ord` follows
//! declaration order, so sorting or iterating a `BTreeSet<RuleId>` yields the
//! application order.

use std::fmt;
use std::str::FromStr;

use enrichit_core::error::DomainError;
use enrichit_core::vocabulary::Category;
use serde::{Deserialize, Serialize};

/// Identifier of one enrichment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    /// `DC 15 Strength check`
    #[serde(rename = "abilities")]
    Abilities,
    /// Area-of-effect shape references.
    #[serde(rename = "AOE")]
    Aoe,
    /// `+6 to hit`
    #[serde(rename = "attacks")]
    Attacks,
    /// `250 gp each`, `100 xp`
    #[serde(rename = "awards")]
    Awards,
    /// Condition references.
    #[serde(rename = "conditions")]
    Conditions,
    /// Creature type references.
    #[serde(rename = "creatureType")]
    CreatureType,
    /// `5 (1d6+2) fire damage`
    #[serde(rename = "damage")]
    Damage,
    /// `2d8 + 5 hit points`
    #[serde(rename = "healing")]
    Healing,
    /// `passive Wisdom (Perception) score of 15`
    #[serde(rename = "passives")]
    Passives,
    /// Free-standing rule term references.
    #[serde(rename = "rules")]
    Rules,
    /// `DC 15 Constitution saving throw`
    #[serde(rename = "saves")]
    Saves,
    /// `DC 12 Dexterity (Stealth or Acrobatics) check`
    #[serde(rename = "skills")]
    Skills,
    /// Spell component and spell tag references.
    #[serde(rename = "spellComponents")]
    SpellComponents,
    /// Spell school references.
    #[serde(rename = "spellSchool")]
    SpellSchool,
    /// `DC 15 Dexterity (Thieves' Tools) check`
    #[serde(rename = "tools")]
    Tools,
}

impl RuleId {
    /// Every rule, in application order.
    pub const ALL: [RuleId; 15] = [
        RuleId::Abilities,
        RuleId::Aoe,
        RuleId::Attacks,
        RuleId::Awards,
        RuleId::Conditions,
        RuleId::CreatureType,
        RuleId::Damage,
        RuleId::Healing,
        RuleId::Passives,
        RuleId::Rules,
        RuleId::Saves,
        RuleId::Skills,
        RuleId::SpellComponents,
        RuleId::SpellSchool,
        RuleId::Tools,
    ];

    /// The wire id of this rule.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Abilities => "abilities",
            Self::Aoe => "AOE",
            Self::Attacks => "attacks",
            Self::Awards => "awards",
            Self::Conditions => "conditions",
            Self::CreatureType => "creatureType",
            Self::Damage => "damage",
            Self::Healing => "healing",
            Self::Passives => "passives",
            Self::Rules => "rules",
            Self::Saves => "saves",
            Self::Skills => "skills",
            Self::SpellComponents => "spellComponents",
            Self::SpellSchool => "spellSchool",
            Self::Tools => "tools",
        }
    }

    /// Toggle label: the id with its first letter upper-cased.
    #[must_use]
    pub fn label(self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The vocabulary categories a reference-style rule annotates, or `None`
    /// for pattern rules.
    #[must_use]
    pub fn reference_categories(self) -> Option<&'static [Category]> {
        match self {
            Self::Aoe => Some(&[Category::AreaTargetTypes]),
            Self::Conditions => Some(&[Category::Conditions]),
            Self::CreatureType => Some(&[Category::CreatureTypes]),
            Self::Rules => Some(&[Category::Rules]),
            Self::SpellComponents => Some(&[Category::SpellComponents, Category::SpellTags]),
            Self::SpellSchool => Some(&[Category::SpellSchools]),
            Self::Abilities
            | Self::Attacks
            | Self::Awards
            | Self::Damage
            | Self::Healing
            | Self::Passives
            | Self::Saves
            | Self::Skills
            | Self::Tools => None,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::Validation(format!("unknown rule id: {s}")))
    }
}
