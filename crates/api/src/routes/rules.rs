//! Rule Catalog Routes

use axum::{
    extract::{Path, State},
    Json,
};
use rule_engine::RuleSummary;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Response for the catalog endpoint
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub rules: Vec<RuleSummary>,
    pub count: usize,
}

/// List every rule in declaration order
pub async fn list_rules(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let rules = state.engine.rules().summaries();

    Json(CatalogResponse {
        count: rules.len(),
        rules,
    })
}

/// Get a single rule by id
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RuleSummary>> {
    state
        .engine
        .rules()
        .get(&id)
        .map(|rule| Json(rule.summary()))
        .ok_or_else(|| ApiError::not_found(format!("rule {}", id)))
}
