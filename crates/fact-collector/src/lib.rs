//! Fact Collection and Validation
//!
//! Provides the symptom fact set, range checking for numeric readings, and
//! derivation of boolean facts from raw form input.

mod collector;
mod error;
mod facts;
mod validator;

pub use collector::{CollectorConfig, FactCollector, FormInput, NET_STATE_KEY};
pub use error::{CollectError, ValidationError};
pub use facts::{FactSet, FactValue, Symptom};
pub use validator::{ValidationConfig, ValidationResult, Validator};
