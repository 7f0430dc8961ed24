//! Hierarchical rule group toggles.
//!
//! Groups form a forest over the rule catalog. A group without children is
//! itself the toggle of the rule it is named after. Group state is never
//! stored: it is derived from the selected rules, so toggling a parent
//! means selecting or clearing all its children, and a parent reads as
//! `All`, `None` or `Partial` from its children.

use std::collections::BTreeSet;

use enrichit_core::error::DomainError;
use serde::Serialize;

use super::options::EnrichmentOptions;
use super::rule::RuleId;

/// Tri-state of a group (or of the whole tree for select-all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    /// Every member rule is selected.
    All,
    /// No member rule is selected.
    None,
    /// Some, but not all, member rules are selected.
    Partial,
}

impl ToggleState {
    fn from_counts(selected: usize, total: usize) -> Self {
        if total > 0 && selected == total {
            Self::All
        } else if selected == 0 {
            Self::None
        } else {
            Self::Partial
        }
    }
}

/// One node of the group tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    /// Toggle id. For a leaf group this is the wire id of its rule.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Child rule toggles. Empty for a leaf group.
    pub children: Vec<RuleId>,
}

impl RuleGroup {
    /// A group that is the toggle of a single rule.
    #[must_use]
    pub fn leaf(rule: RuleId, label: impl Into<String>) -> Self {
        Self {
            id: rule.as_str().to_owned(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// A group with child rule toggles.
    #[must_use]
    pub fn parent(id: impl Into<String>, label: impl Into<String>, children: Vec<RuleId>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children,
        }
    }

    /// Whether this group is a leaf rule toggle.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The rules governed by this group.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a leaf group's id is not a rule id.
    pub fn rules(&self) -> Result<Vec<RuleId>, DomainError> {
        if self.is_leaf() {
            Ok(vec![self.id.parse()?])
        } else {
            Ok(self.children.clone())
        }
    }
}

/// The set of selected rules, as toggled by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<RuleId>,
}

impl Selection {
    /// Every rule selected.
    #[must_use]
    pub fn all() -> Self {
        Self {
            selected: RuleId::ALL.into_iter().collect(),
        }
    }

    /// No rule selected.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The select-all toggle.
    #[must_use]
    pub fn set_all(enabled: bool) -> Self {
        if enabled { Self::all() } else { Self::none() }
    }

    /// Whether `rule` is selected.
    #[must_use]
    pub fn is_selected(&self, rule: RuleId) -> bool {
        self.selected.contains(&rule)
    }

    fn with_rules(&self, rules: &[RuleId], enabled: bool) -> Self {
        let mut next = self.clone();
        for rule in rules {
            if enabled {
                next.selected.insert(*rule);
            } else {
                next.selected.remove(rule);
            }
        }
        next
    }
}

impl From<&EnrichmentOptions> for Selection {
    fn from(options: &EnrichmentOptions) -> Self {
        Self {
            selected: options.enabled_rules().collect(),
        }
    }
}

/// A validated forest of rule groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroupTree {
    groups: Vec<RuleGroup>,
}

impl RuleGroupTree {
    /// Validates and builds a tree.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a group id is repeated, a leaf
    /// group is not named after a rule, or a rule belongs to more than one
    /// group.
    pub fn new(groups: Vec<RuleGroup>) -> Result<Self, DomainError> {
        let mut group_ids = BTreeSet::new();
        let mut members = BTreeSet::new();
        for group in &groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate rule group id: {}",
                    group.id
                )));
            }
            for rule in group.rules()? {
                if !members.insert(rule) {
                    return Err(DomainError::Validation(format!(
                        "rule {rule} belongs to more than one group"
                    )));
                }
            }
        }
        Ok(Self { groups })
    }

    /// The standard tree: attacks, awards, checks, damage, healing,
    /// references and saving throws.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            groups: vec![
                RuleGroup::leaf(RuleId::Attacks, "Attacks"),
                RuleGroup::leaf(RuleId::Awards, "Awards"),
                RuleGroup::parent(
                    "checks",
                    "Checks",
                    vec![
                        RuleId::Abilities,
                        RuleId::Passives,
                        RuleId::Skills,
                        RuleId::Tools,
                    ],
                ),
                RuleGroup::leaf(RuleId::Damage, "Damage"),
                RuleGroup::leaf(RuleId::Healing, "Healing"),
                RuleGroup::parent(
                    "references",
                    "References",
                    vec![
                        RuleId::Aoe,
                        RuleId::Conditions,
                        RuleId::CreatureType,
                        RuleId::Rules,
                        RuleId::SpellComponents,
                        RuleId::SpellSchool,
                    ],
                ),
                RuleGroup::leaf(RuleId::Saves, "Saving Throws"),
            ],
        }
    }

    /// Groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Every rule governed by the tree, in application order.
    #[must_use]
    pub fn rules(&self) -> BTreeSet<RuleId> {
        self.groups
            .iter()
            .filter_map(|group| group.rules().ok())
            .flatten()
            .collect()
    }

    /// Applies a toggle. `toggle_id` names a group (parent toggles set every
    /// child) or a child rule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `toggle_id` names neither a group
    /// nor a rule of this tree.
    pub fn toggle(
        &self,
        selection: &Selection,
        toggle_id: &str,
        enabled: bool,
    ) -> Result<Selection, DomainError> {
        if let Some(group) = self.groups.iter().find(|g| g.id == toggle_id) {
            return Ok(selection.with_rules(&group.rules()?, enabled));
        }

        let rule: RuleId = toggle_id.parse()?;
        if !self.rules().contains(&rule) {
            return Err(DomainError::Validation(format!(
                "rule {rule} is not part of the group tree"
            )));
        }
        Ok(selection.with_rules(&[rule], enabled))
    }

    /// Tri-state of one group.
    #[must_use]
    pub fn group_state(&self, group: &RuleGroup, selection: &Selection) -> ToggleState {
        let rules = group.rules().unwrap_or_default();
        let selected = rules.iter().filter(|r| selection.is_selected(**r)).count();
        ToggleState::from_counts(selected, rules.len())
    }

    /// Tri-state of the select-all toggle.
    #[must_use]
    pub fn overall_state(&self, selection: &Selection) -> ToggleState {
        let rules = self.rules();
        let selected = rules.iter().filter(|r| selection.is_selected(**r)).count();
        ToggleState::from_counts(selected, rules.len())
    }

    /// Derives the immutable options snapshot for one run. Only rules that
    /// belong to the tree can be enabled.
    #[must_use]
    pub fn derive_options_snapshot(&self, selection: &Selection) -> EnrichmentOptions {
        EnrichmentOptions::only(
            self.rules()
                .into_iter()
                .filter(|rule| selection.is_selected(*rule)),
        )
    }
}

impl Default for RuleGroupTree {
    fn default() -> Self {
        Self::standard()
    }
}
