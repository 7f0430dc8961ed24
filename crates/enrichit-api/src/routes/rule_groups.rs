//! Rule group toggle tree.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use tracing::instrument;

use enrichit_rules::application::query_handlers::{self, RuleGroupsView};
use enrichit_rules::domain::groups::Selection;

use crate::state::AppState;

/// GET /api/v1/rule-groups
///
/// Every toggle starts enabled.
#[instrument(skip(state))]
async fn list_rule_groups(State(state): State<AppState>) -> Json<RuleGroupsView> {
    Json(query_handlers::get_rule_groups(
        &state.rule_groups,
        &Selection::all(),
    ))
}

/// Returns the rule group router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/rule-groups", get(list_rule_groups))
}
