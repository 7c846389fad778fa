//! Diagnosis Presentation
//!
//! Turns ranked matches into the payload shown by the browser form.

use chrono::{DateTime, Utc};
use rule_engine::{Diagnosis, Match};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Message returned when no rule fires
pub const NO_MATCH_MESSAGE: &str = "No matching rule found for the provided symptoms.";

/// Whole-number percentage for display
pub fn confidence_percent(confidence: u8) -> String {
    format!("{}%", confidence)
}

/// One matched rule as rendered to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub rule_id: String,
    pub rule_name: String,
    pub problem: String,
    pub explanation: String,
    /// Confidence on a 0-100 scale
    pub confidence: u8,
    pub confidence_percent: String,
    pub recommendations: Vec<String>,
}

impl From<&Match<'_>> for MatchReport {
    fn from(m: &Match<'_>) -> Self {
        let rule = m.rule;
        Self {
            rule_id: rule.id.to_string(),
            rule_name: rule.name.to_string(),
            problem: rule.problem.to_string(),
            explanation: rule.explanation.to_string(),
            confidence: rule.confidence,
            confidence_percent: confidence_percent(rule.confidence),
            recommendations: rule.recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rule: {} ({})", self.rule_name, self.rule_id)?;
        writeln!(f, "Problem: {}", self.problem)?;
        writeln!(f, "Explanation: {}", self.explanation)?;
        writeln!(f, "Confidence: {}", self.confidence_percent)?;
        writeln!(f, "Recommendations:")?;
        for recommendation in &self.recommendations {
            writeln!(f, "  - {}", recommendation)?;
        }
        Ok(())
    }
}

/// Response body for a diagnosis request
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub diagnosis_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    /// Number of facts the rules were evaluated against
    pub facts_considered: usize,
    /// Every match, highest confidence first
    pub result: Vec<MatchReport>,
    /// Top match, `null` when nothing fired
    pub best: Option<MatchReport>,
    /// Present only for the no-match state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DiagnosisReport {
    pub fn from_diagnosis(diagnosis: &Diagnosis<'_>) -> Self {
        let result: Vec<MatchReport> = diagnosis.matches.iter().map(MatchReport::from).collect();
        let message = result.is_empty().then(|| NO_MATCH_MESSAGE.to_string());

        Self {
            diagnosis_id: diagnosis.id,
            evaluated_at: diagnosis.evaluated_at,
            facts_considered: diagnosis.facts_considered,
            best: result.first().cloned(),
            result,
            message,
        }
    }
}
