//! Snapshot mapper: live state → desired-configuration shape.
//!
//! Values the platform omits are filled in from registry defaults, so the
//! result is a complete document. Extra-configuration entries are only surfaced when the target
//! document already declares their key, which makes flatten shaped by the
//! document it flattens into rather than a pure inverse of remote state.

use crate::model::{DesiredConfig, LiveAllocation, LiveSnapshot};
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::extra_config;
use crate::registry::{keys, AllocationKind, FieldKind, FieldRegistry, FieldValue};

#[derive(Debug, Clone, Copy)]
pub struct SnapshotMapper<'r> {
    registry: &'r FieldRegistry,
}

impl<'r> SnapshotMapper<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self { registry }
    }

    /// Flatten `snapshot` into a document shaped like `target`.
    pub fn flatten(&self, snapshot: &LiveSnapshot, target: &DesiredConfig) -> ReconcileResult<DesiredConfig> {
        let mut doc = DesiredConfig::new();

        set_opt(&mut doc, keys::NAME, snapshot.name.clone().filter(|n| !n.is_empty()));
        set_opt(&mut doc, keys::GUEST_ID, snapshot.guest_id.clone());
        set_opt(&mut doc, keys::ALTERNATE_GUEST_NAME, snapshot.alternate_guest_name.clone());
        set_opt(&mut doc, keys::ANNOTATION, snapshot.annotation.clone());

        let hardware = snapshot
            .hardware
            .as_ref()
            .ok_or_else(|| ReconcileError::mapping("hardware", "required live field is absent"))?;
        doc.set(keys::NUM_CPUS, hardware.num_cpu);
        set_opt(&mut doc, keys::NUM_CORES_PER_SOCKET, hardware.num_cores_per_socket);
        doc.set(keys::MEMORY, hardware.memory_mb);

        set_opt(&mut doc, keys::MEMORY_HOT_ADD_ENABLED, snapshot.memory_hot_add_enabled);
        set_opt(&mut doc, keys::CPU_HOT_ADD_ENABLED, snapshot.cpu_hot_add_enabled);
        set_opt(&mut doc, keys::CPU_HOT_REMOVE_ENABLED, snapshot.cpu_hot_remove_enabled);
        set_opt(&mut doc, keys::SWAP_PLACEMENT_POLICY, snapshot.swap_placement.clone());
        set_opt(&mut doc, keys::FIRMWARE, snapshot.firmware.clone());
        set_opt(&mut doc, keys::NESTED_HV_ENABLED, snapshot.nested_hv_enabled);
        set_opt(&mut doc, keys::CPU_PERFORMANCE_COUNTERS_ENABLED, snapshot.vpmc_enabled);
        set_opt(&mut doc, keys::CHANGE_VERSION, snapshot.change_version.clone());
        set_opt(&mut doc, keys::UUID, snapshot.uuid.clone());

        if let Some(tools) = &snapshot.tools {
            set_opt(&mut doc, keys::SYNC_TIME_WITH_HOST, tools.sync_time_with_host);
            set_opt(&mut doc, keys::RUN_TOOLS_SCRIPTS_AFTER_POWER_ON, tools.after_power_on);
            set_opt(&mut doc, keys::RUN_TOOLS_SCRIPTS_AFTER_RESUME, tools.after_resume);
            set_opt(&mut doc, keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_STANDBY, tools.before_guest_standby);
            set_opt(&mut doc, keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_SHUTDOWN, tools.before_guest_shutdown);
            set_opt(&mut doc, keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_REBOOT, tools.before_guest_reboot);
        }

        if let Some(flags) = &snapshot.flags {
            set_opt(&mut doc, keys::ENABLE_DISK_UUID, flags.disk_uuid_enabled);
            set_opt(&mut doc, keys::HV_MODE, flags.virtual_exec_usage.clone());
            set_opt(&mut doc, keys::EPT_RVI_MODE, flags.virtual_mmu_usage.clone());
            set_opt(&mut doc, keys::ENABLE_LOGGING, flags.enable_logging);
        }

        if let Some(boot) = &snapshot.boot_options {
            set_opt(&mut doc, keys::BOOT_DELAY, boot.boot_delay);
            set_opt(&mut doc, keys::EFI_SECURE_BOOT_ENABLED, boot.efi_secure_boot_enabled);
            set_opt(&mut doc, keys::BOOT_RETRY_ENABLED, boot.boot_retry_enabled);
            set_opt(&mut doc, keys::BOOT_RETRY_DELAY, boot.boot_retry_delay);
        }

        flatten_allocation(&mut doc, AllocationKind::Cpu, snapshot.cpu_allocation.as_ref());
        flatten_allocation(&mut doc, AllocationKind::Memory, snapshot.memory_allocation.as_ref());

        doc.extra_config = extra_config::surface_known(&snapshot.extra_config, &target.extra_config);

        for spec in self.registry.all_fields() {
            if doc.contains(spec.name) || spec.kind == FieldKind::Map || spec.computed {
                continue;
            }
            if spec.required {
                return Err(ReconcileError::mapping(spec.name, "required live field is absent"));
            }
            doc.set(spec.name, spec.default_value());
        }

        Ok(doc)
    }
}

fn set_opt<V: Into<FieldValue>>(doc: &mut DesiredConfig, name: &str, value: Option<V>) {
    if let Some(value) = value {
        doc.set(name, value);
    }
}

fn flatten_allocation(doc: &mut DesiredConfig, kind: AllocationKind, allocation: Option<&LiveAllocation>) {
    let Some(allocation) = allocation else {
        return;
    };
    set_opt(doc, kind.limit_key(), allocation.limit);
    set_opt(doc, kind.reservation_key(), allocation.reservation);
    if let Some(shares) = &allocation.shares {
        doc.set(kind.share_level_key(), shares.level.as_str());
        doc.set(kind.share_count_key(), shares.shares);
    }
}
