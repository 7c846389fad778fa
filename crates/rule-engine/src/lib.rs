//! Diagnostic Rule Engine
//!
//! Holds the static rule catalog and ranks the rules that match a fact set
//! by confidence.

mod engine;
mod rules;

pub use engine::{Diagnosis, Match, RuleEngine};
pub use rules::{Predicate, Rule, RuleSet, RuleSummary, MAX_CONFIDENCE};

use thiserror::Error;

/// Errors while building a rule set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Confidence above the 0-100 scale
    #[error("Rule {id} has confidence {confidence}, expected at most {max}")]
    InvalidConfidence { id: String, confidence: u8, max: u8 },
    /// Two rules share an identifier
    #[error("Duplicate rule id: {0}")]
    DuplicateId(String),
    /// Rule declared without an identifier
    #[error("Rule id must not be empty")]
    EmptyId,
}
