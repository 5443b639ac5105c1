//! Live instance state as reported by the virtualization platform.
//!
//! Only the subset of the remote configuration that this crate manages is
//! mirrored. Optional members are `None` when the platform omits them; the
//! snapshot mapper then falls back to registry defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveSnapshot {
    pub name: Option<String>,
    pub guest_id: Option<String>,
    pub alternate_guest_name: Option<String>,
    pub annotation: Option<String>,

    pub hardware: Option<LiveHardware>,
    pub cpu_hot_add_enabled: Option<bool>,
    pub cpu_hot_remove_enabled: Option<bool>,
    pub memory_hot_add_enabled: Option<bool>,
    pub nested_hv_enabled: Option<bool>,
    pub vpmc_enabled: Option<bool>,
    pub swap_placement: Option<String>,
    pub firmware: Option<String>,

    pub tools: Option<LiveTools>,
    pub flags: Option<LiveFlags>,
    pub boot_options: Option<LiveBootOptions>,

    pub cpu_allocation: Option<LiveAllocation>,
    pub memory_allocation: Option<LiveAllocation>,

    /// Raw extra-configuration entries, including keys injected by other
    /// systems.
    pub extra_config: Vec<LiveOption>,

    pub change_version: Option<String>,
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveHardware {
    pub num_cpu: i32,
    #[serde(default)]
    pub num_cores_per_socket: Option<i32>,
    pub memory_mb: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveTools {
    pub sync_time_with_host: Option<bool>,
    pub after_power_on: Option<bool>,
    pub after_resume: Option<bool>,
    pub before_guest_standby: Option<bool>,
    pub before_guest_shutdown: Option<bool>,
    pub before_guest_reboot: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveFlags {
    pub disk_uuid_enabled: Option<bool>,
    pub virtual_exec_usage: Option<String>,
    pub virtual_mmu_usage: Option<String>,
    pub enable_logging: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveBootOptions {
    pub boot_delay: Option<i64>,
    pub efi_secure_boot_enabled: Option<bool>,
    pub boot_retry_enabled: Option<bool>,
    pub boot_retry_delay: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveAllocation {
    pub limit: Option<i64>,
    pub reservation: Option<i64>,
    pub shares: Option<LiveShares>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveShares {
    pub level: String,
    pub shares: i32,
}

/// One raw extra-configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveOption {
    pub key: String,
    pub value: String,
}

impl LiveOption {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
impl LiveSnapshot {
    /// A fully populated snapshot of a small running instance.
    pub(crate) fn sample() -> Self {
        Self {
            name: Some("vm1".to_string()),
            guest_id: Some("ubuntu64Guest".to_string()),
            alternate_guest_name: Some(String::new()),
            annotation: Some("web tier".to_string()),
            hardware: Some(LiveHardware {
                num_cpu: 2,
                num_cores_per_socket: Some(1),
                memory_mb: 1024,
            }),
            cpu_hot_add_enabled: Some(false),
            cpu_hot_remove_enabled: Some(false),
            memory_hot_add_enabled: Some(false),
            nested_hv_enabled: Some(false),
            vpmc_enabled: Some(false),
            swap_placement: Some("inherit".to_string()),
            firmware: Some("bios".to_string()),
            tools: Some(LiveTools {
                sync_time_with_host: Some(false),
                after_power_on: Some(true),
                after_resume: Some(true),
                before_guest_standby: Some(true),
                before_guest_shutdown: Some(true),
                before_guest_reboot: Some(false),
            }),
            flags: Some(LiveFlags {
                disk_uuid_enabled: Some(false),
                virtual_exec_usage: Some("hvAuto".to_string()),
                virtual_mmu_usage: Some("automatic".to_string()),
                enable_logging: Some(true),
            }),
            boot_options: Some(LiveBootOptions {
                boot_delay: Some(0),
                efi_secure_boot_enabled: Some(false),
                boot_retry_enabled: Some(false),
                boot_retry_delay: Some(10_000),
            }),
            cpu_allocation: Some(LiveAllocation {
                limit: Some(-1),
                reservation: Some(0),
                shares: Some(LiveShares {
                    level: "normal".to_string(),
                    shares: 2000,
                }),
            }),
            memory_allocation: Some(LiveAllocation {
                limit: Some(-1),
                reservation: Some(0),
                shares: Some(LiveShares {
                    level: "normal".to_string(),
                    shares: 10240,
                }),
            }),
            extra_config: vec![
                LiveOption::new("guestinfo.userdata", "abc"),
                LiveOption::new("vmware.tools.internalversion", "10346"),
            ],
            change_version: Some("2024-01-01T00:00:00.000000Z".to_string()),
            uuid: Some("4213-abcd".to_string()),
        }
    }
}
