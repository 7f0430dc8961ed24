//! Query handlers for the enrichment context.
//!
//! This module contains read-only handlers: the rule group view and the
//! dry-run preview of a journal run.

use enrichit_core::document::{DocumentStore, DocumentUpdate};
use enrichit_core::error::DomainError;
use serde::Serialize;
use tracing::instrument;

use crate::domain::enricher::Enricher;
use crate::domain::groups::{RuleGroupTree, Selection, ToggleState};
use crate::domain::options::EnrichmentOptions;
use crate::domain::pipeline;
use crate::domain::rule::RuleId;

/// Read-only view of a child rule toggle.
#[derive(Debug, Serialize)]
pub struct RuleToggleView {
    /// Wire id of the rule.
    pub id: RuleId,
    /// Display label.
    pub label: String,
    /// Whether the rule is selected.
    pub enabled: bool,
}

/// Read-only view of one rule group.
#[derive(Debug, Serialize)]
pub struct RuleGroupView {
    /// Group toggle id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Derived tri-state.
    pub state: ToggleState,
    /// Child toggles; empty for a leaf group.
    pub children: Vec<RuleToggleView>,
}

/// Read-only view of the whole toggle tree.
#[derive(Debug, Serialize)]
pub struct RuleGroupsView {
    /// State of the select-all toggle.
    pub state: ToggleState,
    /// Groups in display order.
    pub groups: Vec<RuleGroupView>,
}

/// Read-only view of a dry run over a journal.
#[derive(Debug, Serialize)]
pub struct PreviewView {
    /// The journal that was previewed.
    pub journal_id: String,
    /// Ids of the pages that would change.
    pub changed: Vec<String>,
    /// Content the changed pages would get.
    pub results: Vec<DocumentUpdate>,
}

/// Renders the group tree for a selection.
#[must_use]
pub fn get_rule_groups(tree: &RuleGroupTree, selection: &Selection) -> RuleGroupsView {
    let groups = tree
        .groups()
        .iter()
        .map(|group| RuleGroupView {
            id: group.id.clone(),
            label: group.label.clone(),
            state: tree.group_state(group, selection),
            children: group
                .children
                .iter()
                .map(|rule| RuleToggleView {
                    id: *rule,
                    label: rule.label(),
                    enabled: selection.is_selected(*rule),
                })
                .collect(),
        })
        .collect();

    RuleGroupsView {
        state: tree.overall_state(selection),
        groups,
    }
}

/// Runs the pipeline over a journal without persisting anything.
///
/// # Errors
///
/// Returns `DomainError` if listing the journal's pages fails.
#[instrument(skip(options, enricher, store))]
pub async fn preview_journal_enrichment(
    journal_id: &str,
    options: &EnrichmentOptions,
    enricher: &Enricher,
    store: &dyn DocumentStore,
) -> Result<PreviewView, DomainError> {
    let pages = store.list_text_pages(journal_id).await?;
    let batch = pipeline::apply_all(enricher, &pages, options);

    Ok(PreviewView {
        journal_id: journal_id.to_owned(),
        changed: batch.changed,
        results: batch.results,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use enrichit_core::document::TextDocument;

    use super::*;
    use enrichit_test_support::{
        FailingDocumentStore, RecordingDocumentStore, fixture_vocabulary,
    };

    #[test]
    fn test_get_rule_groups_default_selection() {
        let view = get_rule_groups(&RuleGroupTree::standard(), &Selection::all());

        assert_eq!(view.state, ToggleState::All);
        let ids: Vec<&str> = view.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["attacks", "awards", "checks", "damage", "healing", "references", "saves"]
        );
        assert_eq!(view.groups[6].label, "Saving Throws");
        assert!(view.groups[0].children.is_empty());
    }

    #[test]
    fn test_get_rule_groups_reports_partial_groups() {
        let tree = RuleGroupTree::standard();
        let selection = tree.toggle(&Selection::all(), "conditions", false).unwrap();

        let view = get_rule_groups(&tree, &selection);

        assert_eq!(view.state, ToggleState::Partial);
        let references = view.groups.iter().find(|g| g.id == "references").unwrap();
        assert_eq!(references.state, ToggleState::Partial);
        let conditions = references
            .children
            .iter()
            .find(|c| c.id == RuleId::Conditions)
            .unwrap();
        assert_eq!(conditions.label, "Conditions");
        assert!(!conditions.enabled);
    }

    #[test]
    fn test_rule_groups_view_serializes_wire_ids() {
        let view = get_rule_groups(&RuleGroupTree::standard(), &Selection::none());

        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["state"], "none");
        assert_eq!(value["groups"][5]["children"][0]["id"], "AOE");
        assert_eq!(value["groups"][5]["children"][0]["label"], "AOE");
    }

    #[tokio::test]
    async fn test_preview_does_not_write() {
        let enricher = Enricher::new(Arc::new(fixture_vocabulary())).unwrap();
        let store = RecordingDocumentStore::new(vec![TextDocument::new("p1", "250 gp each")]);

        let view = preview_journal_enrichment("j1", &EnrichmentOptions::all(), &enricher, &store)
            .await
            .unwrap();

        assert_eq!(view.journal_id, "j1");
        assert_eq!(view.changed, vec!["p1".to_owned()]);
        assert_eq!(view.results[0].content, "[[/award 250gp each]]");
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_preview_propagates_store_errors() {
        let enricher = Enricher::new(Arc::new(fixture_vocabulary())).unwrap();

        let result =
            preview_journal_enrichment("j1", &EnrichmentOptions::all(), &enricher, &FailingDocumentStore)
                .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
