//! Rule Evaluation

use crate::rules::{Rule, RuleSet};
use chrono::{DateTime, Utc};
use fact_collector::FactSet;
use tracing::{debug, info};
use uuid::Uuid;

/// A rule whose predicate held for a fact set
#[derive(Debug, Clone, Copy)]
pub struct Match<'r> {
    /// The matching rule
    pub rule: &'r Rule,
    /// Position of the rule in its rule set
    pub position: usize,
}

/// Outcome of one evaluation, with its request context
#[derive(Debug, Clone)]
pub struct Diagnosis<'r> {
    /// Identifier of this diagnosis request
    pub id: Uuid,
    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
    /// Number of facts in the evaluated set
    pub facts_considered: usize,
    /// Matches ordered by descending confidence
    pub matches: Vec<Match<'r>>,
}

impl<'r> Diagnosis<'r> {
    /// Highest-confidence match, if any rule fired
    pub fn best(&self) -> Option<&Match<'r>> {
        self.matches.first()
    }

    /// Whether no rule fired
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Evaluates a rule set against fact sets
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'r> {
    rules: &'r RuleSet,
}

impl RuleEngine<'static> {
    /// Engine over the standard catalog
    pub fn standard() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl<'r> RuleEngine<'r> {
    /// Create an engine over the given rules
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// The rules this engine evaluates
    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    /// Evaluate every rule in declaration order and rank the matches.
    ///
    /// The sort is stable, so rules with equal confidence keep their
    /// declaration order. An empty result means no rule fired.
    pub fn evaluate(&self, facts: &FactSet) -> Vec<Match<'r>> {
        let mut matches: Vec<Match<'r>> = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(facts))
            .map(|(position, rule)| {
                debug!("Rule {} matched (confidence={})", rule.id, rule.confidence);
                Match { rule, position }
            })
            .collect();

        matches.sort_by(|a, b| b.rule.confidence.cmp(&a.rule.confidence));
        matches
    }

    /// Evaluate and wrap the result with a request id and timestamp
    pub fn diagnose(&self, facts: &FactSet) -> Diagnosis<'r> {
        let matches = self.evaluate(facts);
        let diagnosis = Diagnosis {
            id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            facts_considered: facts.len(),
            matches,
        };

        match diagnosis.best() {
            Some(best) => info!(
                "Diagnosis {}: {} fact(s), {} match(es), best {} ({}%)",
                diagnosis.id,
                diagnosis.facts_considered,
                diagnosis.matches.len(),
                best.rule.id,
                best.rule.confidence
            ),
            None => info!(
                "Diagnosis {}: {} fact(s), no matching rule",
                diagnosis.id, diagnosis.facts_considered
            ),
        }

        diagnosis
    }
}
