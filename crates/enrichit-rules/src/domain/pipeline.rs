//! Pure batch transform over page content.

use enrichit_core::document::{DocumentUpdate, TextDocument};
use serde::Serialize;
use tracing::debug;

use super::enricher::Enricher;
use super::options::EnrichmentOptions;

/// Outcome of one batch run. Only changed pages are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Ids of the pages whose content changed, in input order.
    pub changed: Vec<String>,
    /// New content for every changed page, in input order.
    pub results: Vec<DocumentUpdate>,
}

impl BatchResult {
    /// Whether no page changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Runs every enabled rule, in application order, over a single page.
#[must_use]
pub fn enrich_content(enricher: &Enricher, content: &str, options: &EnrichmentOptions) -> String {
    options.enabled_rules().fold(content.to_owned(), |text, rule| {
        let rewritten = enricher.apply(rule, &text);
        if rewritten != text {
            debug!(%rule, "rule rewrote content");
        }
        rewritten
    })
}

/// Enriches a batch of pages and keeps the ones whose content changed.
///
/// Performs no I/O. The application order is fixed by the rule catalog, not
/// by the order in which rules were selected.
#[must_use]
pub fn apply_all(
    enricher: &Enricher,
    documents: &[TextDocument],
    options: &EnrichmentOptions,
) -> BatchResult {
    let mut batch = BatchResult::default();
    for document in documents {
        let content = enrich_content(enricher, &document.content, options);
        if content == document.content {
            continue;
        }

        debug!(document_id = %document.id, "page content changed");
        batch.changed.push(document.id.clone());
        batch.results.push(DocumentUpdate {
            id: document.id.clone(),
            content,
        });
    }
    batch
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use enrichit_test_support::fixture_vocabulary;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::rule::RuleId;

    fn enricher() -> Enricher {
        Enricher::new(Arc::new(fixture_vocabulary())).unwrap()
    }

    #[test]
    fn test_apply_all_reports_only_changed_pages() {
        let documents = vec![
            TextDocument::new("p1", "DC 15 Strength check"),
            TextDocument::new("p2", "Nothing to see here."),
        ];

        let batch = apply_all(&enricher(), &documents, &EnrichmentOptions::all());

        assert_eq!(batch.changed, vec!["p1".to_owned()]);
        assert_eq!(
            batch.results,
            vec![DocumentUpdate {
                id: "p1".to_owned(),
                content: "[[/check str 15]] check".to_owned(),
            }]
        );
    }

    #[test]
    fn test_apply_all_with_no_rules_changes_nothing() {
        let documents = vec![TextDocument::new("p1", "DC 15 Strength check")];

        let batch = apply_all(&enricher(), &documents, &EnrichmentOptions::none());

        assert!(batch.is_empty());
        assert!(batch.results.is_empty());
    }

    #[test]
    fn test_disabled_rules_are_not_applied() {
        let documents = vec![TextDocument::new("p1", "+6 to hit, 250 gp each")];
        let options = EnrichmentOptions::only([RuleId::Awards]);

        let batch = apply_all(&enricher(), &documents, &options);

        assert_eq!(batch.results[0].content, "+6 to hit, [[/award 250gp each]]");
    }

    #[test]
    fn test_rules_compose_in_application_order() {
        let content = "<p>The Humanoid makes a DC 13 Constitution saving throw, \
                       taking 7 (2d6) fire damage and becoming Poisoned. \
                       Reward: 50 gp.</p>";

        let output = enrich_content(&enricher(), content, &EnrichmentOptions::all());

        assert_eq!(
            output,
            "<p>The Humanoid (See &Reference[humanoid]) makes a [[/save con 13]] saving throw, \
             taking [[/damage 2d6 fire average=true]] damage and becoming Poisoned \
             (See &Reference[poisoned]). Reward: [[/award 50gp]].</p>"
        );
    }

    #[test]
    fn test_each_rule_is_idempotent_on_every_fragment() {
        let enricher = enricher();
        let combined = FRAGMENTS.join(". ");
        for rule in RuleId::ALL {
            for content in FRAGMENTS.iter().copied().chain([combined.as_str()]) {
                let once = enricher.apply(rule, content);
                assert_eq!(enricher.apply(rule, &once), once, "rule {rule} on {content:?}");
            }
        }
    }

    #[test]
    fn test_disabling_attacks_leaves_award_and_damage_output_alone() {
        let enricher = enricher();
        let content = "a 1,200 gp gem and 7 (2d6) fire damage";

        assert_eq!(
            enrich_content(&enricher, content, &all_except(RuleId::Attacks)),
            enrich_content(&enricher, content, &EnrichmentOptions::all())
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch = apply_all(&enricher(), &[], &EnrichmentOptions::all());
        assert_eq!(batch, BatchResult::default());
    }

    const FRAGMENTS: &[&str] = &[
        "DC 15 Strength check",
        "DC 12 Dexterity (Stealth or Acrobatics) check",
        "DC 15 Dexterity (Thieves' Tools) check",
        "DC 13 Constitution saving throw",
        "passive Wisdom (Perception) score of 14",
        "passive Perception score of 12 or higher",
        "7 (2d6) fire damage",
        "1d8 + 3 piercing damage",
        "2d8 + 5 hit points",
        "1d10 temporary hit points",
        "+6 to hit",
        "250 gp each",
        "a 1,200 gp gem",
        "100 xp",
        "Blinded",
        "Prone",
        "(see below)",
        "a Humanoid",
        "a 15-foot Cone",
        "with Advantage",
        "Verbal, Somatic",
        "Concentration",
        "Evocation",
        "the goblin flees",
        r#"<img alt="Prone">"#,
    ];

    const SEPARATORS: &[&str] = &[" ", ". ", ", ", "<p>", "</p>"];

    fn page() -> impl Strategy<Value = String> {
        prop::collection::vec(
            (
                prop::sample::select(FRAGMENTS),
                prop::sample::select(SEPARATORS),
            ),
            0..12,
        )
        .prop_map(|parts| {
            parts
                .into_iter()
                .map(|(fragment, separator)| format!("{fragment}{separator}"))
                .collect::<String>()
        })
    }

    fn rule() -> impl Strategy<Value = RuleId> {
        prop::sample::select(RuleId::ALL.to_vec())
    }

    fn all_except(rule: RuleId) -> EnrichmentOptions {
        EnrichmentOptions::only(RuleId::ALL.into_iter().filter(|r| *r != rule))
    }

    fn options() -> impl Strategy<Value = EnrichmentOptions> {
        prop::collection::vec(any::<bool>(), RuleId::ALL.len()).prop_map(|flags| {
            EnrichmentOptions::only(
                RuleId::ALL
                    .into_iter()
                    .zip(flags)
                    .filter_map(|(rule, on)| on.then_some(rule)),
            )
        })
    }

    proptest! {
        /// Enriching already-enriched content changes nothing.
        #[test]
        fn prop_enrichment_is_idempotent(content in page(), options in options()) {
            let enricher = enricher();
            let once = enrich_content(&enricher, &content, &options);
            let twice = enrich_content(&enricher, &once, &options);
            prop_assert_eq!(twice, once);
        }

        /// Re-running any single rule over its own output changes nothing.
        #[test]
        fn prop_each_rule_is_idempotent(rule in rule(), content in page()) {
            let enricher = enricher();
            let once = enricher.apply(rule, &content);
            let twice = enricher.apply(rule, &once);
            prop_assert_eq!(twice, once);
        }

        /// Switching off a rule that leaves a page alone does not change what
        /// the other rules produce for it.
        #[test]
        fn prop_disabling_an_untouching_rule_keeps_output(content in page()) {
            let enricher = enricher();
            let everything = enrich_content(&enricher, &content, &EnrichmentOptions::all());
            for rule in RuleId::ALL {
                if enricher.apply(rule, &content) != content {
                    continue;
                }
                prop_assert_eq!(
                    enrich_content(&enricher, &content, &all_except(rule)),
                    everything.clone(),
                    "disabling {} changed the output",
                    rule
                );
            }
        }

        /// Same input and options always give the same output.
        #[test]
        fn prop_enrichment_is_deterministic(content in page(), options in options()) {
            let enricher = enricher();
            prop_assert_eq!(
                enrich_content(&enricher, &content, &options),
                enrich_content(&enricher, &content, &options)
            );
        }

        /// Pages reported as changed are exactly those whose content differs.
        #[test]
        fn prop_changed_pages_differ_from_input(
            contents in prop::collection::vec(page(), 0..5),
            options in options(),
        ) {
            let documents: Vec<TextDocument> = contents
                .iter()
                .enumerate()
                .map(|(i, content)| TextDocument::new(format!("p{i}"), content.clone()))
                .collect();

            let batch = apply_all(&enricher(), &documents, &options);

            for document in &documents {
                let differs = enrich_content(&enricher(), &document.content, &options)
                    != document.content;
                prop_assert_eq!(batch.changed.contains(&document.id), differs);
            }
        }
    }
}
