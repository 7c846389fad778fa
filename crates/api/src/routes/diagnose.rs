//! Diagnosis Routes

use axum::{extract::State, Json};
use fact_collector::{FactSet, FormInput};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::presenter::DiagnosisReport;
use crate::AppState;

/// Diagnose a fact set collected by the client
pub async fn diagnose_facts(
    State(state): State<Arc<AppState>>,
    Json(facts): Json<FactSet>,
) -> Json<DiagnosisReport> {
    Json(run_diagnosis(&state, &facts))
}

/// Collect facts from raw form input, then diagnose them
pub async fn diagnose_form(
    State(state): State<Arc<AppState>>,
    Json(input): Json<FormInput>,
) -> ApiResult<Json<DiagnosisReport>> {
    let facts = state.collector.collect(&input).map_err(|e| {
        warn!("Form rejected: {}", e);
        counter!("diagnoses_total", "outcome" => "rejected").increment(1);
        ApiError::from(e)
    })?;

    Ok(Json(run_diagnosis(&state, &facts)))
}

fn run_diagnosis(state: &AppState, facts: &FactSet) -> DiagnosisReport {
    let start = Instant::now();
    let diagnosis = state.engine.diagnose(facts);
    histogram!("diagnosis_duration_seconds").record(start.elapsed().as_secs_f64());

    let outcome = if diagnosis.is_empty() { "no_match" } else { "matched" };
    counter!("diagnoses_total", "outcome" => outcome).increment(1);
    for m in &diagnosis.matches {
        counter!("rule_matches_total", "rule_id" => m.rule.id).increment(1);
    }

    let report = DiagnosisReport::from_diagnosis(&diagnosis);
    if let Some(best) = &report.best {
        debug!("Best match for {}:\n{}", report.diagnosis_id, best);
    }
    report
}
