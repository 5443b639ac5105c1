//! The virtual machine field catalog.

use crate::config::schema::DefaultsConfig;
use crate::model::types::{Firmware, ShareLevel, SwapPlacement, VirtualExecUsage, VirtualMmuUsage};
use crate::registry::field::FieldSpec;
use crate::registry::keys::{self, AllocationKind};

use crate::registry::field::FieldKind::{Bool, Int, Map, String as Str};
use crate::registry::field::RestartPolicy::{AlwaysRestart, ConditionalHotSwap, Free};

/// Every field of the desired-configuration document, in declaration order.
pub fn standard_fields(defaults: &DefaultsConfig) -> Vec<FieldSpec> {
    let mut fields = vec![
        // Identity
        FieldSpec::new(keys::NAME, Str, Free)
            .required()
            .length(1, 80)
            .describe("The name of this virtual machine."),
        FieldSpec::new(keys::GUEST_ID, Str, AlwaysRestart)
            .with_default(defaults.guest_id.as_str())
            .describe("The guest ID for the operating system."),
        FieldSpec::new(keys::ALTERNATE_GUEST_NAME, Str, AlwaysRestart)
            .describe("The guest name for the operating system when guest_id is other or other-64."),
        FieldSpec::new(keys::ANNOTATION, Str, Free)
            .describe("User-provided description of the virtual machine."),
        // CPU
        FieldSpec::new(keys::NUM_CPUS, Int, ConditionalHotSwap)
            .with_default(1i64)
            .at_least(1)
            .describe("The number of virtual processors to assign to this virtual machine."),
        FieldSpec::new(keys::NUM_CORES_PER_SOCKET, Int, AlwaysRestart)
            .with_default(1i64)
            .at_least(1)
            .describe("The number of cores per socket. num_cpus must be evenly divisible by this value."),
        FieldSpec::new(keys::CPU_HOT_ADD_ENABLED, Bool, AlwaysRestart)
            .describe("Allow CPUs to be added to this virtual machine while it is running."),
        FieldSpec::new(keys::CPU_HOT_REMOVE_ENABLED, Bool, AlwaysRestart)
            .describe("Allow CPUs to be removed from this virtual machine while it is running."),
        FieldSpec::new(keys::NESTED_HV_ENABLED, Bool, AlwaysRestart)
            .describe("Enable nested hardware virtualization in the guest."),
        FieldSpec::new(keys::CPU_PERFORMANCE_COUNTERS_ENABLED, Bool, AlwaysRestart)
            .describe("Enable CPU performance counters on this virtual machine."),
        // Memory
        FieldSpec::new(keys::MEMORY, Int, ConditionalHotSwap)
            .with_default(1024i64)
            .at_least(1)
            .describe("The size of the virtual machine's memory, in MB."),
        FieldSpec::new(keys::MEMORY_HOT_ADD_ENABLED, Bool, AlwaysRestart)
            .describe("Allow memory to be added to this virtual machine while it is running."),
        FieldSpec::new(keys::SWAP_PLACEMENT_POLICY, Str, AlwaysRestart)
            .with_default(SwapPlacement::Inherit.as_str())
            .one_of(SwapPlacement::VALUES)
            .describe("The swap file placement policy for this virtual machine."),
        FieldSpec::new(keys::FIRMWARE, Str, AlwaysRestart)
            .with_default(defaults.firmware.as_str())
            .one_of(Firmware::VALUES)
            .describe("The firmware interface to use on the virtual machine."),
        // Flags
        FieldSpec::new(keys::ENABLE_DISK_UUID, Bool, AlwaysRestart)
            .describe("Expose the UUIDs of attached virtual disks to the guest."),
        FieldSpec::new(keys::HV_MODE, Str, AlwaysRestart)
            .with_default(VirtualExecUsage::HvAuto.as_str())
            .one_of(VirtualExecUsage::VALUES)
            .describe("The (non-nested) hardware virtualization setting."),
        FieldSpec::new(keys::EPT_RVI_MODE, Str, AlwaysRestart)
            .with_default(VirtualMmuUsage::Automatic.as_str())
            .one_of(VirtualMmuUsage::VALUES)
            .describe("The EPT/RVI (hardware memory virtualization) setting."),
        FieldSpec::new(keys::ENABLE_LOGGING, Bool, AlwaysRestart)
            .with_default(true)
            .describe("Enable logging on this virtual machine."),
        // Tools
        FieldSpec::new(keys::SYNC_TIME_WITH_HOST, Bool, Free)
            .describe("Enable guest clock synchronization with the host."),
        FieldSpec::new(keys::RUN_TOOLS_SCRIPTS_AFTER_POWER_ON, Bool, AlwaysRestart)
            .with_default(true)
            .describe("Run post-power-on scripts when guest tools are installed."),
        FieldSpec::new(keys::RUN_TOOLS_SCRIPTS_AFTER_RESUME, Bool, AlwaysRestart)
            .with_default(true)
            .describe("Run post-resume scripts when guest tools are installed."),
        FieldSpec::new(keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_REBOOT, Bool, AlwaysRestart)
            .describe("Run pre-reboot scripts when guest tools are installed."),
        FieldSpec::new(keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_SHUTDOWN, Bool, AlwaysRestart)
            .with_default(true)
            .describe("Run pre-shutdown scripts when guest tools are installed."),
        FieldSpec::new(keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_STANDBY, Bool, AlwaysRestart)
            .with_default(true)
            .describe("Run pre-standby scripts when guest tools are installed."),
        // Boot options
        FieldSpec::new(keys::BOOT_DELAY, Int, Free)
            .describe("Milliseconds to wait before starting the boot sequence."),
        FieldSpec::new(keys::BOOT_RETRY_DELAY, Int, Free)
            .with_default(10_000i64)
            .describe("Milliseconds to wait before retrying a failed boot."),
        FieldSpec::new(keys::BOOT_RETRY_ENABLED, Bool, Free)
            .describe("Retry a failed boot after boot_retry_delay."),
        FieldSpec::new(keys::EFI_SECURE_BOOT_ENABLED, Bool, Free)
            .describe("Enable EFI secure boot when firmware is efi."),
    ];

    for kind in AllocationKind::ALL {
        fields.extend(allocation_fields(kind));
    }

    fields.push(
        FieldSpec::new(keys::EXTRA_CONFIG, Map, AlwaysRestart)
            .describe("Extra configuration key/value pairs, such as guestinfo data for cloud-init."),
    );
    fields.push(
        FieldSpec::new(keys::CHANGE_VERSION, Str, Free)
            .computed()
            .describe("Identifier of the last configuration version applied."),
    );
    fields.push(
        FieldSpec::new(keys::UUID, Str, Free)
            .computed()
            .describe("The UUID of the virtual machine."),
    );

    fields
}

fn allocation_fields(kind: AllocationKind) -> [FieldSpec; 4] {
    [
        FieldSpec::new(kind.share_level_key(), Str, Free)
            .with_default(ShareLevel::Normal.as_str())
            .one_of(ShareLevel::VALUES)
            .describe("The allocation level for this resource. Can be one of low, normal, high or custom."),
        FieldSpec::new(kind.share_count_key(), Int, Free)
            .at_least(0)
            .inherit_when_unset()
            .describe("The amount of shares to allocate for a custom share level. Left unset, the live count is kept."),
        FieldSpec::new(kind.limit_key(), Int, Free)
            .with_default(-1i64)
            .at_least(-1)
            .describe("The maximum amount of memory (MB) or CPU (MHz) this virtual machine can consume. -1 is unlimited."),
        FieldSpec::new(kind.reservation_key(), Int, Free)
            .with_default(0i64)
            .at_least(0)
            .describe("The amount of memory (MB) or CPU (MHz) this virtual machine is guaranteed."),
    ]
}
