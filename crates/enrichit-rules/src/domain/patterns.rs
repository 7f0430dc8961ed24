//! Fixed-pattern rewrite rules.
//!
//! Each rule scans the whole document once and rewrites every
//! non-overlapping match. A match is rewritten only when every vocabulary
//! token it references resolves; otherwise the matched text is kept as is.
//! Every rule's output no longer matches its own pattern, so applying a rule
//! twice is the same as applying it once.

use std::sync::LazyLock;

use enrichit_core::vocabulary::{Category, Vocabulary, VocabularyEntry};
use regex::{Captures, Regex};
use tracing::trace;

/// `DC 15 Strength check`
static ABILITY_CHECK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDC\s+(\d+)\s+(\w+)\s+check").expect("ability check pattern is valid")
});

/// `DC 12 Dexterity (Stealth or Acrobatics) check`, `DC 15 Dexterity (Thieves' Tools) check`
static PARENTHESIZED_CHECK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDC\s+(\d+)\s+(\w+)\s*\(([^()]+)\)\s+check")
        .expect("parenthesized check pattern is valid")
});

/// Case-insensitive whole-word `or` between skill alternatives.
static OR_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\bor\b\s*").expect("or separator pattern is valid"));

/// `DC 15 Constitution saving throw`
static SAVING_THROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDC\s+(\d+)\s+(\w+)\s+saving\s+throw").expect("saving throw pattern is valid")
});

/// `passive Wisdom (Perception) score of 15 or higher`
static PASSIVE_WITH_ABILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bpassive\s+(\w+)\s*\(([^()]*)\)\s+score\s+of\s+(\d+)(?:\s+or\s+higher)?",
    )
    .expect("passive with ability pattern is valid")
});

/// `passive Perception score of 15 or higher`
static PASSIVE_SKILL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bpassive\s+([\w\s'\x{2019}]+?)\s+score\s+of\s+(\d+)(?:\s+or\s+higher)?")
        .expect("passive skill pattern is valid")
});

/// `5 (1d6 + 2) fire damage`, `1d6+3 piercing damage`
static DAMAGE_ROLL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        (?:
            (\d+) \s* \( \s* (\d+d\d+ \s* (?:[+-] \s* \d+)?) \s* \)   # average (dice)
            |
            (\d+d\d+ \s* (?:[+-] \s* \d+)?)                           # bare dice
        )
        \s* (\w+)? \s* damage
        ",
    )
    .expect("damage roll pattern is valid")
});

/// `2d8 + 5 hit points`, `1d10 temporary hit points`
static HEALING_ROLL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+d\d+\s*(?:[+-]\s*\d+)?)\s+(hit\s+points|temporary\s+hit\s+points)")
        .expect("healing roll pattern is valid")
});

/// `+6 to hit`, `+ 6 to hit`
static ATTACK_BONUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\+\s*(\d+)\s*to\s+hit").expect("attack pattern is valid"));

/// Removes all whitespace from a dice or number expression.
pub(crate) fn strip_whitespace(expression: &str) -> String {
    expression.chars().filter(|c| !c.is_whitespace()).collect()
}

fn resolve<'v>(
    vocabulary: &'v Vocabulary,
    category: Category,
    term: &str,
) -> Option<&'v VocabularyEntry> {
    let entry = vocabulary.resolve(category, term);
    if entry.is_none() {
        trace!(%category, term, "unresolved vocabulary term");
    }
    entry
}

fn unchanged(caps: &Captures<'_>) -> String {
    caps[0].to_owned()
}

/// Rewrites `DC <n> <Ability> check` into `[[/check <ability> <n>]] check`.
#[must_use]
pub fn enrich_ability_checks(content: &str, vocabulary: &Vocabulary) -> String {
    ABILITY_CHECK
        .replace_all(content, |caps: &Captures<'_>| {
            match resolve(vocabulary, Category::Abilities, &caps[2]) {
                Some(ability) => format!("[[/check {} {}]] check", ability.canonical_key, &caps[1]),
                None => unchanged(caps),
            }
        })
        .into_owned()
}

/// Rewrites `DC <n> <Ability> (<Skill>[ or <Skill>...]) check` into one
/// `[[/skill ...]]` directive per alternative, joined by `or`.
///
/// Every alternative must resolve as a skill, otherwise the match is left
/// untouched.
#[must_use]
pub fn enrich_skill_checks(content: &str, vocabulary: &Vocabulary) -> String {
    PARENTHESIZED_CHECK
        .replace_all(content, |caps: &Captures<'_>| {
            let Some(ability) = resolve(vocabulary, Category::Abilities, &caps[2]) else {
                return unchanged(caps);
            };
            let dc = &caps[1];

            let skills: Option<Vec<&VocabularyEntry>> = OR_SEPARATOR
                .split(&caps[3])
                .map(|alternative| resolve(vocabulary, Category::Skills, alternative.trim()))
                .collect();

            match skills {
                Some(skills) if !skills.is_empty() => {
                    let directives: Vec<String> = skills
                        .iter()
                        .map(|skill| {
                            format!(
                                "[[/skill {} {} {dc}]]",
                                ability.canonical_key, skill.canonical_key
                            )
                        })
                        .collect();
                    format!("{} check", directives.join(" or "))
                }
                _ => unchanged(caps),
            }
        })
        .into_owned()
}

/// Rewrites `DC <n> <Ability> (<Tool>) check` into
/// `[[/tool <ability> <tool> <n>]] check`.
#[must_use]
pub fn enrich_tool_checks(content: &str, vocabulary: &Vocabulary) -> String {
    PARENTHESIZED_CHECK
        .replace_all(content, |caps: &Captures<'_>| {
            let ability = resolve(vocabulary, Category::Abilities, &caps[2]);
            let tool = resolve(vocabulary, Category::Tools, &caps[3]);
            match (ability, tool) {
                (Some(ability), Some(tool)) => format!(
                    "[[/tool {} {} {}]] check",
                    ability.canonical_key, tool.canonical_key, &caps[1]
                ),
                _ => unchanged(caps),
            }
        })
        .into_owned()
}

/// Rewrites `DC <n> <Ability> saving throw` into
/// `[[/save <ability> <n>]] saving throw`.
#[must_use]
pub fn enrich_saving_throws(content: &str, vocabulary: &Vocabulary) -> String {
    SAVING_THROW
        .replace_all(content, |caps: &Captures<'_>| {
            match resolve(vocabulary, Category::Abilities, &caps[2]) {
                Some(ability) => {
                    format!("[[/save {} {}]] saving throw", ability.canonical_key, &caps[1])
                }
                None => unchanged(caps),
            }
        })
        .into_owned()
}

/// Rewrites passive scores into long-format passive directives.
///
/// `passive <Ability> (<Skill or Tool>) score of <n>` is handled first and
/// yields a `skill` directive when the parenthetical resolves as a skill,
/// else a `tool` directive. The remaining `passive <Skill> score of <n>`
/// forms are handled afterwards.
#[must_use]
pub fn enrich_passive_checks(content: &str, vocabulary: &Vocabulary) -> String {
    let with_ability = PASSIVE_WITH_ABILITY.replace_all(content, |caps: &Captures<'_>| {
        let Some(ability) = resolve(vocabulary, Category::Abilities, caps[1].trim()) else {
            return unchanged(caps);
        };
        let dc = &caps[3];

        if let Some(skill) = vocabulary.resolve(Category::Skills, &caps[2]) {
            return format!(
                "[[/skill {} {} {dc} passive format=long]]",
                ability.canonical_key, skill.canonical_key
            );
        }
        match resolve(vocabulary, Category::Tools, &caps[2]) {
            Some(tool) => format!(
                "[[/tool {} {} {dc} passive format=long]]",
                ability.canonical_key, tool.canonical_key
            ),
            None => unchanged(caps),
        }
    });

    PASSIVE_SKILL
        .replace_all(&with_ability, |caps: &Captures<'_>| {
            match resolve(vocabulary, Category::Skills, &caps[1]) {
                Some(skill) => format!(
                    "[[/skill {} {} passive format=long]]",
                    skill.canonical_key, &caps[2]
                ),
                None => unchanged(caps),
            }
        })
        .into_owned()
}

/// Rewrites typed damage rolls into `[[/damage <dice> <type>]] damage`,
/// adding `average=true` when the source states an average before the dice.
///
/// The damage type is emitted with its source casing.
#[must_use]
pub fn enrich_damage_rolls(content: &str, vocabulary: &Vocabulary) -> String {
    DAMAGE_ROLL
        .replace_all(content, |caps: &Captures<'_>| {
            let Some(damage_type) = caps.get(4).map(|m| m.as_str()) else {
                return unchanged(caps);
            };
            if resolve(vocabulary, Category::DamageTypes, damage_type).is_none() {
                return unchanged(caps);
            }

            let has_average = caps.get(1).is_some();
            let dice = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| strip_whitespace(m.as_str()))
                .unwrap_or_default();

            if has_average {
                format!("[[/damage {dice} {damage_type} average=true]] damage")
            } else {
                format!("[[/damage {dice} {damage_type}]] damage")
            }
        })
        .into_owned()
}

/// Rewrites `<dice> hit points` and `<dice> temporary hit points` into
/// healing and temporary hit point directives.
#[must_use]
pub fn enrich_healing_rolls(content: &str) -> String {
    HEALING_ROLL
        .replace_all(content, |caps: &Captures<'_>| {
            let kind = if caps[2].to_lowercase().contains("temporary") {
                "temphp"
            } else {
                "healing"
            };
            format!("[[/damage {} {kind}]]", strip_whitespace(&caps[1]))
        })
        .into_owned()
}

/// Rewrites `+<n> to hit` into `[[/r 1d20+<n>]] to hit`.
#[must_use]
pub fn enrich_attack_rolls(content: &str) -> String {
    ATTACK_BONUS
        .replace_all(content, |caps: &Captures<'_>| {
            format!("[[/r 1d20+{}]] to hit", &caps[1])
        })
        .into_owned()
}
