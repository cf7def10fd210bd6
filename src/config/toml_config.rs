use crate::core::status::StatusPolicy;
use crate::core::visits::{RegistryOptions, DEFAULT_SLOT_CAPACITY};
use crate::utils::error::{Result, ShelterError};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

pub const DEFAULT_MAX_DAYS_AHEAD: u32 = 14;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelterConfig {
    pub booking: BookingConfig,
    pub roster: RosterConfig,
    pub compatibility: CompatibilityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub slot_capacity: usize,
    pub max_days_ahead: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            max_days_ahead: DEFAULT_MAX_DAYS_AHEAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub animals: String,
    pub people: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            animals: "animals.csv".to_string(),
            people: "people.csv".to_string(),
        }
    }
}

/// Switches for legacy booking and adoption behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityConfig {
    /// Cancelling an adoption always resets the donor to `None`.
    pub legacy_adoption_cancel_reset: bool,
    /// Rescheduling never checks the target slot's capacity.
    pub legacy_reschedule_skips_capacity: bool,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            legacy_adoption_cancel_reset: true,
            legacy_reschedule_skips_capacity: true,
        }
    }
}

impl ShelterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown variables as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            slot_capacity: self.booking.slot_capacity,
            legacy_reschedule_skips_capacity: self.compatibility.legacy_reschedule_skips_capacity,
        }
    }

    pub fn status_policy(&self) -> StatusPolicy {
        StatusPolicy {
            legacy_adoption_cancel_reset: self.compatibility.legacy_adoption_cancel_reset,
        }
    }
}

impl Validate for ShelterConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("booking.slot_capacity", self.booking.slot_capacity, 1)?;
        validate_path("roster.animals", &self.roster.animals)?;
        validate_path("roster.people", &self.roster.people)?;
        if self.roster.animals == self.roster.people {
            return Err(ShelterError::ConfigError {
                message: "roster.animals and roster.people must be different files".to_string(),
            });
        }
        Ok(())
    }
}
