//! Fact Collection from Form Input

use crate::error::CollectError;
use crate::facts::{FactSet, FactValue, Symptom};
use crate::validator::{ValidationConfig, Validator};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Fact key carrying the raw network state selection
pub const NET_STATE_KEY: &str = "net_state";

/// Raw diagnostic form as submitted by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    /// Checkbox symptoms keyed by fact name
    #[serde(default)]
    pub symptoms: BTreeMap<String, bool>,
    /// RAM usage (%); missing or unparseable counts as 0
    #[serde(default, deserialize_with = "number_or_text")]
    pub ram: Option<f64>,
    /// Disk usage (%); missing or unparseable counts as 0
    #[serde(default, deserialize_with = "number_or_text")]
    pub disk: Option<f64>,
    /// CPU temperature (°C); missing or unparseable counts as 0
    #[serde(default, deserialize_with = "number_or_text")]
    pub temp: Option<f64>,
    /// Network state selection ("wifi", "wired", "none", ...)
    #[serde(default)]
    pub net_state: Option<String>,
    /// Whether the machine reports a valid IP address
    #[serde(default)]
    pub ip_valid: bool,
    /// Whether a driver was installed recently
    #[serde(default)]
    pub recent_driver_install: bool,
}

/// Collector configuration: accepted ranges and derivation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Accepted ranges for the numeric readings
    pub validation: ValidationConfig,
    /// RAM usage (%) at or above which `high_ram` holds
    pub high_ram_threshold: f64,
    /// Disk usage (%) at or above which `disk_full` holds
    pub disk_full_threshold: f64,
    /// Temperature (°C) at or above which `high_temp` holds
    pub high_temp_threshold: f64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            high_ram_threshold: 70.0,
            disk_full_threshold: 70.0,
            high_temp_threshold: 70.0,
        }
    }
}

impl CollectorConfig {
    /// Check ranges and thresholds
    pub fn check(&self) -> Result<(), String> {
        self.validation.check()?;
        for (name, value) in [
            ("high_ram_threshold", self.high_ram_threshold),
            ("disk_full_threshold", self.disk_full_threshold),
            ("high_temp_threshold", self.high_temp_threshold),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be finite", name));
            }
        }
        Ok(())
    }
}

/// Turns raw form input into a well-formed [`FactSet`]
#[derive(Debug, Clone)]
pub struct FactCollector {
    config: CollectorConfig,
    validator: Validator,
}

impl FactCollector {
    /// Create a new collector
    pub fn new(config: CollectorConfig) -> Self {
        let validator = Validator::new(config.validation.clone());
        Self { config, validator }
    }

    /// Validate readings and derive facts.
    ///
    /// Readings are truncated toward zero before any check. If a reading is
    /// rejected no facts are returned.
    pub fn collect(&self, input: &FormInput) -> Result<FactSet, CollectError> {
        let ram = reading(input.ram);
        let disk = reading(input.disk);
        let temp = reading(input.temp);

        let result = self.validator.validate_readings(ram, disk, temp);
        if !result.valid {
            warn!(
                "Rejected form input: {} of {} readings invalid",
                result.errors.len(),
                result.fields_checked
            );
            return Err(CollectError::Rejected(result.errors));
        }

        let mut facts = FactSet::new();
        for (key, checked) in &input.symptoms {
            if key.parse::<Symptom>().is_err() {
                debug!("Keeping unknown symptom key {}", key);
            }
            facts.insert(key.clone(), FactValue::Flag(*checked));
        }

        facts.set_flag(Symptom::HighRam, ram >= self.config.high_ram_threshold);
        facts.set_flag(Symptom::DiskFull, disk >= self.config.disk_full_threshold);
        facts.set_flag(Symptom::HighTemp, temp >= self.config.high_temp_threshold);

        let net_state = input
            .net_state
            .as_deref()
            .map(|state| state.trim().to_ascii_lowercase());
        facts.set_flag(
            Symptom::WifiConnected,
            net_state.as_deref() == Some("wifi"),
        );
        if let Some(state) = net_state {
            facts.insert(NET_STATE_KEY, FactValue::Category(state));
        }

        facts.set_flag(Symptom::IpValid, input.ip_valid);
        facts.set_flag(Symptom::RecentDriverInstall, input.recent_driver_install);

        let active: Vec<&str> = facts.active_symptoms().iter().map(Symptom::as_str).collect();
        debug!(
            "Collected {} facts (ram={}, disk={}, temp={}), active: [{}]",
            facts.len(),
            ram,
            disk,
            temp,
            active.join(", ")
        );
        Ok(facts)
    }
}

impl Default for FactCollector {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

fn reading(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0).trunc()
}

/// Form fields may post readings as numbers or as the raw input text
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReading {
    Number(f64),
    Text(String),
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawReading>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawReading::Number(value)) => Some(value),
        Some(RawReading::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    })
}
