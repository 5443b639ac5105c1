//! Update requests sent to the virtualization platform.
//!
//! An `UpdateRequest` is fully populated on every reconciliation: the remote
//! API applies it atomically. Equality is structural, with two exceptions
//! that mirror how the platform interprets the values:
//! - extra-config deltas compare order-insensitively
//! - share counts only matter when the share level is `custom`

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::model::types::{Firmware, ShareLevel, SwapPlacement, VirtualExecUsage, VirtualMmuUsage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub name: String,
    pub guest_id: String,
    pub alternate_guest_name: String,
    pub annotation: String,
    pub tools: ToolsConfig,
    pub flags: FlagInfo,
    pub num_cpus: i32,
    pub num_cores_per_socket: i32,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i64,
    pub memory_hot_add_enabled: bool,
    pub cpu_hot_add_enabled: bool,
    pub cpu_hot_remove_enabled: bool,
    pub cpu_allocation: ResourceAllocation,
    pub memory_allocation: ResourceAllocation,
    pub extra_config: ExtraConfigDelta,
    pub swap_placement: SwapPlacement,
    pub boot_options: BootOptions,
    pub firmware: Firmware,
    #[serde(rename = "nestedHVEnabled")]
    pub nested_hv_enabled: bool,
    #[serde(rename = "vPMCEnabled")]
    pub vpmc_enabled: bool,
}

/// Guest tools behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsConfig {
    pub sync_time_with_host: bool,
    pub after_power_on: bool,
    pub after_resume: bool,
    pub before_guest_standby: bool,
    pub before_guest_shutdown: bool,
    pub before_guest_reboot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagInfo {
    pub disk_uuid_enabled: bool,
    pub virtual_exec_usage: VirtualExecUsage,
    pub virtual_mmu_usage: VirtualMmuUsage,
    pub enable_logging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootOptions {
    pub boot_delay: i64,
    pub efi_secure_boot_enabled: bool,
    pub boot_retry_enabled: bool,
    pub boot_retry_delay: i64,
}

/// Resource allocation for one resource kind (cpu or memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub shares: Shares,
    /// -1 means unlimited.
    pub limit: i64,
    pub reservation: i64,
}

#[derive(Debug, Clone, Copy, Eq, Serialize)]
pub struct Shares {
    pub level: ShareLevel,
    #[serde(rename = "shares")]
    pub count: i32,
}

impl PartialEq for Shares {
    fn eq(&self, other: &Self) -> bool {
        // The platform ignores the count unless the level is custom.
        self.level == other.level && (self.level != ShareLevel::Custom || self.count == other.count)
    }
}

/// New value for one extra-configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraConfigValue {
    Set(String),
    /// Explicit removal of the key on the remote side.
    Tombstone,
}

impl ExtraConfigValue {
    /// Wire form: tombstones are the empty string.
    pub fn as_wire(&self) -> &str {
        match self {
            ExtraConfigValue::Set(value) => value,
            ExtraConfigValue::Tombstone => "",
        }
    }
}

impl Serialize for ExtraConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraConfigEntry {
    pub key: String,
    pub value: ExtraConfigValue,
}

impl ExtraConfigEntry {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: ExtraConfigValue::Set(value.into()),
        }
    }

    pub fn tombstone(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: ExtraConfigValue::Tombstone,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.value == ExtraConfigValue::Tombstone
    }
}

/// Minimal edit set for the shared extra-configuration map.
///
/// Entry order carries no meaning; an empty delta is a no-op.
#[derive(Debug, Clone, Default, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtraConfigDelta(Vec<ExtraConfigEntry>);

impl ExtraConfigDelta {
    pub fn new(entries: Vec<ExtraConfigEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ExtraConfigEntry] {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&ExtraConfigValue> {
        self.0.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_map(&self) -> BTreeMap<&str, &ExtraConfigValue> {
        self.0.iter().map(|e| (e.key.as_str(), &e.value)).collect()
    }
}

impl PartialEq for ExtraConfigDelta {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.as_map() == other.as_map()
    }
}
