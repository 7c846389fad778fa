//! Prometheus Exposition

use axum::extract::State;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Render the installed recorder in Prometheus text format
pub async fn render(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::unavailable("Metrics recorder not installed"))
}
