//! Rule dispatch over an injected vocabulary.

use std::sync::Arc;

use enrichit_core::error::DomainError;
use enrichit_core::vocabulary::{Category, Vocabulary};
use regex::{Captures, Regex, RegexBuilder};

use super::patterns;
use super::references::ReferenceAnnotator;
use super::rule::RuleId;

/// Experience points are always awardable alongside the currencies.
const EXPERIENCE: &str = "xp";

/// Applies rules against one vocabulary.
///
/// Built once at startup: compiles the vocabulary-dependent patterns (the
/// award currencies and one label alternation per reference rule) and is
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Enricher {
    vocabulary: Arc<Vocabulary>,
    award: Regex,
    area_targets: ReferenceAnnotator,
    conditions: ReferenceAnnotator,
    creature_types: ReferenceAnnotator,
    rule_terms: ReferenceAnnotator,
    spell_components: ReferenceAnnotator,
    spell_schools: ReferenceAnnotator,
}

impl Enricher {
    /// Compiles the vocabulary-dependent rules.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a vocabulary-derived pattern
    /// fails to compile.
    pub fn new(vocabulary: Arc<Vocabulary>) -> Result<Self, DomainError> {
        let annotator = |rule: RuleId| {
            let categories = rule.reference_categories().unwrap_or_default();
            ReferenceAnnotator::new(vocabulary.referenceable(categories))
        };

        Ok(Self {
            award: award_pattern(&vocabulary)?,
            area_targets: annotator(RuleId::Aoe)?,
            conditions: annotator(RuleId::Conditions)?,
            creature_types: annotator(RuleId::CreatureType)?,
            rule_terms: annotator(RuleId::Rules)?,
            spell_components: annotator(RuleId::SpellComponents)?,
            spell_schools: annotator(RuleId::SpellSchool)?,
            vocabulary,
        })
    }

    /// Applies one rule to a whole document.
    #[must_use]
    pub fn apply(&self, rule: RuleId, content: &str) -> String {
        let vocabulary = self.vocabulary.as_ref();
        match rule {
            RuleId::Abilities => patterns::enrich_ability_checks(content, vocabulary),
            RuleId::Aoe => self.area_targets.annotate(content),
            RuleId::Attacks => patterns::enrich_attack_rolls(content),
            RuleId::Awards => self.enrich_awards(content),
            RuleId::Conditions => self.conditions.annotate(content),
            RuleId::CreatureType => self.creature_types.annotate(content),
            RuleId::Damage => patterns::enrich_damage_rolls(content, vocabulary),
            RuleId::Healing => patterns::enrich_healing_rolls(content),
            RuleId::Passives => patterns::enrich_passive_checks(content, vocabulary),
            RuleId::Rules => self.rule_terms.annotate(content),
            RuleId::Saves => patterns::enrich_saving_throws(content, vocabulary),
            RuleId::Skills => patterns::enrich_skill_checks(content, vocabulary),
            RuleId::SpellComponents => self.spell_components.annotate(content),
            RuleId::SpellSchool => self.spell_schools.annotate(content),
            RuleId::Tools => patterns::enrich_tool_checks(content, vocabulary),
        }
    }

    /// Rewrites `<n> <currency|xp>[ each]` into `[[/award <n><currency>[ each]]]`,
    /// skipping amounts already wrapped in an award directive. Thousands
    /// separators are dropped from the amount.
    fn enrich_awards(&self, content: &str) -> String {
        self.award
            .replace_all(content, |caps: &Captures<'_>| {
                let Some(whole) = caps.get(0) else {
                    return String::new();
                };
                if is_inside_award(content, whole.start(), whole.end()) {
                    return whole.as_str().to_owned();
                }

                let amount = caps[1].replace(',', "");
                let currency = &caps[2];
                if caps.get(3).is_some() {
                    format!("[[/award {amount}{currency} each]]")
                } else {
                    format!("[[/award {amount}{currency}]]")
                }
            })
            .into_owned()
    }
}

/// Builds `\b(<amount>)\s*(<currencies>|xp)(\s+each)?\b` from the currency
/// keys. The amount may use comma thousands separators.
fn award_pattern(vocabulary: &Vocabulary) -> Result<Regex, DomainError> {
    let mut denominations: Vec<String> = vocabulary
        .entries(Category::Currencies)
        .iter()
        .map(|entry| entry.canonical_key.to_lowercase())
        .chain(std::iter::once(EXPERIENCE.to_owned()))
        .collect();
    denominations.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    denominations.dedup();

    let alternation = denominations
        .iter()
        .map(|d| regex::escape(d))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(
        r"\b(\d{{1,3}}(?:,\d{{3}})+|\d+)\s*({alternation})(\s+each)?\b"
    ))
    .case_insensitive(true)
    .build()
    .map_err(|e| DomainError::Validation(format!("invalid currency keys: {e}")))
}

/// Whether the span is preceded by `[[/award` or followed by `]]`.
fn is_inside_award(content: &str, start: usize, end: usize) -> bool {
    const OPENER: &str = "[[/award";

    let before = content[..start].trim_end();
    let opened = before
        .len()
        .checked_sub(OPENER.len())
        .and_then(|at| before.get(at..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(OPENER));

    opened || content[end..].starts_with("]]")
}
