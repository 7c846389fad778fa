//! Range Checking for Numeric Readings

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// RAM usage valid range (%)
    pub ram_range: (f64, f64),
    /// Disk usage valid range (%)
    pub disk_range: (f64, f64),
    /// Temperature valid range (°C)
    pub temp_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ram_range: (0.0, 100.0),
            disk_range: (0.0, 100.0),
            temp_range: (0.0, 120.0),
        }
    }
}

impl ValidationConfig {
    /// Check that every range is well-formed
    pub fn check(&self) -> Result<(), String> {
        for (name, (min, max)) in [
            ("ram_range", self.ram_range),
            ("disk_range", self.disk_range),
            ("temp_range", self.temp_range),
        ] {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(format!("{} [{}, {}] is not a valid range", name, min, max));
            }
        }
        Ok(())
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Validator for the numeric form readings
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against an inclusive range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field,
                reason: format!("{} is not a finite number", value),
            });
        }

        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate RAM usage
    pub fn validate_ram(&self, ram: f64) -> Result<(), ValidationError> {
        self.validate_range("ram", ram, self.config.ram_range)
    }

    /// Validate disk usage
    pub fn validate_disk(&self, disk: f64) -> Result<(), ValidationError> {
        self.validate_range("disk", disk, self.config.disk_range)
    }

    /// Validate temperature
    pub fn validate_temp(&self, temp: f64) -> Result<(), ValidationError> {
        self.validate_range("temp", temp, self.config.temp_range)
    }

    /// Validate all three readings, collecting every failure
    pub fn validate_readings(&self, ram: f64, disk: f64, temp: f64) -> ValidationResult {
        let errors: Vec<ValidationError> = [
            self.validate_ram(ram),
            self.validate_disk(disk),
            self.validate_temp(temp),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            ValidationResult::valid(3)
        } else {
            ValidationResult::invalid(errors, 3)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
