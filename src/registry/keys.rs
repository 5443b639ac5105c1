//! Field names of the desired-configuration document.

pub const NAME: &str = "name";
pub const GUEST_ID: &str = "guest_id";
pub const ALTERNATE_GUEST_NAME: &str = "alternate_guest_name";
pub const ANNOTATION: &str = "annotation";

pub const NUM_CPUS: &str = "num_cpus";
pub const NUM_CORES_PER_SOCKET: &str = "num_cores_per_socket";
pub const CPU_HOT_ADD_ENABLED: &str = "cpu_hot_add_enabled";
pub const CPU_HOT_REMOVE_ENABLED: &str = "cpu_hot_remove_enabled";
pub const NESTED_HV_ENABLED: &str = "nested_hv_enabled";
pub const CPU_PERFORMANCE_COUNTERS_ENABLED: &str = "cpu_performance_counters_enabled";

pub const MEMORY: &str = "memory";
pub const MEMORY_HOT_ADD_ENABLED: &str = "memory_hot_add_enabled";
pub const SWAP_PLACEMENT_POLICY: &str = "swap_placement_policy";

pub const FIRMWARE: &str = "firmware";

// Flags
pub const ENABLE_DISK_UUID: &str = "enable_disk_uuid";
pub const HV_MODE: &str = "hv_mode";
pub const EPT_RVI_MODE: &str = "ept_rvi_mode";
pub const ENABLE_LOGGING: &str = "enable_logging";

// Tools
pub const SYNC_TIME_WITH_HOST: &str = "sync_time_with_host";
pub const RUN_TOOLS_SCRIPTS_AFTER_POWER_ON: &str = "run_tools_scripts_after_power_on";
pub const RUN_TOOLS_SCRIPTS_AFTER_RESUME: &str = "run_tools_scripts_after_resume";
pub const RUN_TOOLS_SCRIPTS_BEFORE_GUEST_REBOOT: &str = "run_tools_scripts_before_guest_reboot";
pub const RUN_TOOLS_SCRIPTS_BEFORE_GUEST_SHUTDOWN: &str = "run_tools_scripts_before_guest_shutdown";
pub const RUN_TOOLS_SCRIPTS_BEFORE_GUEST_STANDBY: &str = "run_tools_scripts_before_guest_standby";

// Boot options
pub const BOOT_DELAY: &str = "boot_delay";
pub const BOOT_RETRY_DELAY: &str = "boot_retry_delay";
pub const BOOT_RETRY_ENABLED: &str = "boot_retry_enabled";
pub const EFI_SECURE_BOOT_ENABLED: &str = "efi_secure_boot_enabled";

pub const EXTRA_CONFIG: &str = "extra_config";

// Computed
pub const CHANGE_VERSION: &str = "change_version";
pub const UUID: &str = "uuid";

/// Resource kinds with an allocation block, each flattened into four keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationKind {
    Cpu,
    Memory,
}

impl AllocationKind {
    pub const ALL: [AllocationKind; 2] = [AllocationKind::Cpu, AllocationKind::Memory];

    pub fn as_str(self) -> &'static str {
        match self {
            AllocationKind::Cpu => "cpu",
            AllocationKind::Memory => "memory",
        }
    }

    pub fn share_level_key(self) -> &'static str {
        match self {
            AllocationKind::Cpu => "cpu_share_level",
            AllocationKind::Memory => "memory_share_level",
        }
    }

    pub fn share_count_key(self) -> &'static str {
        match self {
            AllocationKind::Cpu => "cpu_share_count",
            AllocationKind::Memory => "memory_share_count",
        }
    }

    pub fn limit_key(self) -> &'static str {
        match self {
            AllocationKind::Cpu => "cpu_limit",
            AllocationKind::Memory => "memory_limit",
        }
    }

    pub fn reservation_key(self) -> &'static str {
        match self {
            AllocationKind::Cpu => "cpu_reservation",
            AllocationKind::Memory => "memory_reservation",
        }
    }
}
