//! Configuration schema definitions.
//!
//! This module defines the reconciler's own settings. All types derive Serde
//! traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration for the reconciler.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Global field defaults fed into the field registry.
    pub defaults: DefaultsConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record reconciliation counters through the metrics facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// Registry-wide default values.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Guest OS identifier used when a document leaves `guest_id` unset.
    pub guest_id: String,

    /// Firmware used when a document leaves `firmware` unset.
    pub firmware: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            guest_id: "other-64".to_string(),
            firmware: "bios".to_string(),
        }
    }
}
