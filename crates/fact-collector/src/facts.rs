//! Symptom Fact Sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Known fact keys consulted by the diagnostic rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symptom {
    /// Temperature reading at or above the high threshold
    HighTemp,
    LoudFan,
    FrequentCrashes,
    SlowPc,
    /// RAM usage at or above the high threshold
    HighRam,
    /// Disk usage at or above the full threshold
    DiskFull,
    NoInternet,
    /// Network state is wifi
    WifiConnected,
    IpValid,
    BootLoop,
    RecentDriverInstall,
    BlueScreen,
}

impl Symptom {
    /// Every known symptom, in a fixed order
    pub const ALL: [Symptom; 12] = [
        Symptom::HighTemp,
        Symptom::LoudFan,
        Symptom::FrequentCrashes,
        Symptom::SlowPc,
        Symptom::HighRam,
        Symptom::DiskFull,
        Symptom::NoInternet,
        Symptom::WifiConnected,
        Symptom::IpValid,
        Symptom::BootLoop,
        Symptom::RecentDriverInstall,
        Symptom::BlueScreen,
    ];

    /// Get the fact key used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Symptom::HighTemp => "high_temp",
            Symptom::LoudFan => "loud_fan",
            Symptom::FrequentCrashes => "frequent_crashes",
            Symptom::SlowPc => "slow_pc",
            Symptom::HighRam => "high_ram",
            Symptom::DiskFull => "disk_full",
            Symptom::NoInternet => "no_internet",
            Symptom::WifiConnected => "wifi_connected",
            Symptom::IpValid => "ip_valid",
            Symptom::BootLoop => "boot_loop",
            Symptom::RecentDriverInstall => "recent_driver_install",
            Symptom::BlueScreen => "blue_screen",
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symptom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symptom::ALL
            .iter()
            .copied()
            .find(|symptom| symptom.as_str() == s)
            .ok_or_else(|| format!("unknown symptom: {}", s))
    }
}

/// A single observed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    /// Boolean observation (checkbox or derived threshold)
    Flag(bool),
    /// Categorical selection such as the network state
    Category(String),
}

impl FactValue {
    /// Truthiness under a boolean predicate: any non-empty category is true
    pub fn is_truthy(&self) -> bool {
        match self {
            FactValue::Flag(value) => *value,
            FactValue::Category(value) => !value.is_empty(),
        }
    }
}

/// Observations about a machine, keyed by fact name.
///
/// Keys outside [`Symptom`] are retained but no rule reads them. A missing key
/// is reported as `None` by [`FactSet::flag`] and as `false` by
/// [`FactSet::is_true`]. Under [`FactSet::is_true`] a categorical value is
/// true unless it is the empty string, so `"false"` is true as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<FactValue>>",
    into = "BTreeMap<String, FactValue>"
)]
pub struct FactSet {
    facts: BTreeMap<String, FactValue>,
}

impl FactSet {
    /// Create an empty fact set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to set a known flag
    pub fn with(mut self, symptom: Symptom, value: bool) -> Self {
        self.set_flag(symptom, value);
        self
    }

    /// Set a known boolean fact
    pub fn set_flag(&mut self, symptom: Symptom, value: bool) {
        self.facts
            .insert(symptom.as_str().to_string(), FactValue::Flag(value));
    }

    /// Insert an arbitrary fact by key
    pub fn insert(&mut self, key: impl Into<String>, value: FactValue) {
        self.facts.insert(key.into(), value);
    }

    /// Look up a raw value by key
    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.facts.get(key)
    }

    /// Boolean value of a known fact, `None` when absent or categorical
    pub fn flag(&self, symptom: Symptom) -> Option<bool> {
        match self.facts.get(symptom.as_str()) {
            Some(FactValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    /// Truthiness used by rule predicates; absent facts are false
    pub fn is_true(&self, symptom: Symptom) -> bool {
        self.facts
            .get(symptom.as_str())
            .map_or(false, FactValue::is_truthy)
    }

    /// Categorical value by key
    pub fn category(&self, key: &str) -> Option<&str> {
        match self.facts.get(key) {
            Some(FactValue::Category(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Number of facts present
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether no facts are present
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Known symptoms currently set to true
    pub fn active_symptoms(&self) -> Vec<Symptom> {
        Symptom::ALL
            .iter()
            .copied()
            .filter(|symptom| self.is_true(*symptom))
            .collect()
    }
}

impl From<BTreeMap<String, Option<FactValue>>> for FactSet {
    fn from(raw: BTreeMap<String, Option<FactValue>>) -> Self {
        let facts = raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        Self { facts }
    }
}

impl From<FactSet> for BTreeMap<String, FactValue> {
    fn from(set: FactSet) -> Self {
        set.facts
    }
}

impl FromIterator<(Symptom, bool)> for FactSet {
    fn from_iter<I: IntoIterator<Item = (Symptom, bool)>>(iter: I) -> Self {
        let mut set = FactSet::new();
        for (symptom, value) in iter {
            set.set_flag(symptom, value);
        }
        set
    }
}
