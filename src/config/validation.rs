//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate enumerated settings (log level, firmware)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ReconcilerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the field registry is built from the config

use std::fmt;

use crate::config::schema::ReconcilerConfig;
use crate::model::types::Firmware;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &ReconcilerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!("{:?} is not one of {:?}", config.observability.log_level, LOG_LEVELS),
        });
    }

    if config.defaults.guest_id.trim().is_empty() {
        errors.push(ValidationError {
            field: "defaults.guest_id",
            message: "must not be empty".to_string(),
        });
    }

    if config.defaults.firmware.parse::<Firmware>().is_err() {
        errors.push(ValidationError {
            field: "defaults.firmware",
            message: format!("{:?} is not one of {:?}", config.defaults.firmware, Firmware::VALUES),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ReconcilerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ReconcilerConfig::default();
        config.observability.log_level = "chatty".to_string();
        config.defaults.guest_id = "  ".to_string();
        config.defaults.firmware = "uefi".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["observability.log_level", "defaults.guest_id", "defaults.firmware"]
        );
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = ReconcilerConfig::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
