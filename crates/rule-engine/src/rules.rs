//! Rule Definitions and the Standard Catalog

use crate::RuleError;
use fact_collector::{FactSet, Symptom};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use tracing::info;

/// Highest confidence a rule may carry
pub const MAX_CONFIDENCE: u8 = 100;

/// Pure predicate over a fact set
pub type Predicate = fn(&FactSet) -> bool;

/// A diagnostic rule: one predicate plus the text shown when it fires
#[derive(Clone)]
pub struct Rule {
    /// Stable identifier ("R1", "R2", ...)
    pub id: &'static str,
    /// Short rule name
    pub name: &'static str,
    /// Problem reported to the user
    pub problem: &'static str,
    /// Why the symptoms point at this problem
    pub explanation: &'static str,
    /// Remediation steps, in the order they should be tried
    pub recommendations: &'static [&'static str],
    /// Author-assigned ranking score (0-100)
    pub confidence: u8,
    /// Condition over the facts
    pub predicate: Predicate,
}

impl Rule {
    /// Evaluate the predicate against a fact set
    pub fn matches(&self, facts: &FactSet) -> bool {
        (self.predicate)(facts)
    }

    /// Serializable view of the rule without its predicate
    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id,
            name: self.name,
            problem: self.problem,
            explanation: self.explanation,
            recommendations: self.recommendations,
            confidence: self.confidence,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("confidence", &self.confidence)
            .finish_non_exhaustive()
    }
}

/// Catalog entry as exposed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub problem: &'static str,
    pub explanation: &'static str,
    pub recommendations: &'static [&'static str],
    pub confidence: u8,
}

/// Ordered, immutable collection of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, rejecting empty or duplicate ids and out-of-range confidence
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.id.is_empty() {
                return Err(RuleError::EmptyId);
            }
            if rule.confidence > MAX_CONFIDENCE {
                return Err(RuleError::InvalidConfidence {
                    id: rule.id.to_string(),
                    confidence: rule.confidence,
                    max: MAX_CONFIDENCE,
                });
            }
            if !seen.insert(rule.id) {
                return Err(RuleError::DuplicateId(rule.id.to_string()));
            }
        }
        Ok(Self { rules })
    }

    /// The process-wide standard catalog, built on first use
    pub fn standard() -> &'static RuleSet {
        static STANDARD: OnceLock<RuleSet> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let rules = standard_rules();
            info!("Loaded standard rule catalog with {} rules", rules.len());
            RuleSet { rules }
        })
    }

    /// Rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Look up a rule by id (case-insensitive)
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id.eq_ignore_ascii_case(id))
    }

    /// Catalog view of every rule
    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules.iter().map(Rule::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn standard_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "R1",
            name: "Overheating Issue",
            problem: "Overheating Detected",
            explanation: "The system temperature is very high which can cause crashes and instability.",
            recommendations: &[
                "Turn off the PC and let it cool down.",
                "Clean CPU fan and heatsink.",
                "Improve airflow inside the case.",
            ],
            confidence: 90,
            predicate: |f| {
                f.is_true(Symptom::HighTemp)
                    && (f.is_true(Symptom::LoudFan) || f.is_true(Symptom::FrequentCrashes))
            },
        },
        Rule {
            id: "R2",
            name: "Low Storage and High RAM Usage",
            problem: "Performance Issue",
            explanation: "High RAM usage combined with low disk space causes slow performance.",
            recommendations: &[
                "Free up disk space.",
                "Close unnecessary background applications.",
                "Consider upgrading RAM.",
            ],
            confidence: 85,
            predicate: |f| {
                f.is_true(Symptom::SlowPc)
                    && f.is_true(Symptom::HighRam)
                    && f.is_true(Symptom::DiskFull)
            },
        },
        Rule {
            id: "R3",
            name: "Network IP/DNS Issue",
            problem: "Network Configuration Issue",
            explanation: "The device is connected to network but does not have a valid IP address.",
            recommendations: &["Renew IP address.", "Flush DNS cache.", "Restart the router."],
            confidence: 75,
            predicate: |f| {
                f.is_true(Symptom::NoInternet)
                    && f.is_true(Symptom::WifiConnected)
                    && !f.is_true(Symptom::IpValid)
            },
        },
        Rule {
            id: "R4",
            name: "Driver Boot Loop",
            problem: "Driver Compatibility Issue",
            explanation: "A recently installed driver is causing the system to enter a boot loop.",
            recommendations: &[
                "Boot into Safe Mode.",
                "Rollback or uninstall the problematic driver.",
                "Use System Restore.",
            ],
            confidence: 88,
            predicate: |f| f.is_true(Symptom::BootLoop) && f.is_true(Symptom::RecentDriverInstall),
        },
        Rule {
            id: "R5",
            name: "Blue Screen Error",
            problem: "Blue Screen of Death (BSOD)",
            explanation: "A critical system error occurred, possibly related to hardware or drivers.",
            recommendations: &[
                "Note the error code on the blue screen.",
                "Run memory and disk diagnostics.",
                "Update system drivers.",
            ],
            confidence: 80,
            predicate: |f| f.is_true(Symptom::BlueScreen),
        },
    ]
}
