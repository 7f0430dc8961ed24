//! Immutable per-run rule selection.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::rule::RuleId;

/// Snapshot of which rules are enabled for one orchestration run.
///
/// On the wire this is a flat `{ ruleId: bool }` map. Rules absent from the
/// map are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<RuleId, bool>", into = "BTreeMap<RuleId, bool>")]
pub struct EnrichmentOptions {
    enabled: BTreeSet<RuleId>,
}

impl EnrichmentOptions {
    /// Every rule enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            enabled: RuleId::ALL.into_iter().collect(),
        }
    }

    /// No rule enabled.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Only the given rules enabled.
    #[must_use]
    pub fn only(rules: impl IntoIterator<Item = RuleId>) -> Self {
        Self {
            enabled: rules.into_iter().collect(),
        }
    }

    /// Whether `rule` is enabled.
    #[must_use]
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        self.enabled.contains(&rule)
    }

    /// Enabled rules in application order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.enabled.iter().copied()
    }

    /// Whether no rule is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl From<BTreeMap<RuleId, bool>> for EnrichmentOptions {
    fn from(map: BTreeMap<RuleId, bool>) -> Self {
        Self {
            enabled: map
                .into_iter()
                .filter_map(|(rule, enabled)| enabled.then_some(rule))
                .collect(),
        }
    }
}

impl From<EnrichmentOptions> for BTreeMap<RuleId, bool> {
    fn from(options: EnrichmentOptions) -> Self {
        RuleId::ALL
            .into_iter()
            .map(|rule| (rule, options.is_enabled(rule)))
            .collect()
    }
}
