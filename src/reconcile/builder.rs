//! Request builder: desired configuration → update request.
//!
//! # Responsibilities
//! - Validate the desired document against the registry
//! - Copy every managed field into a fully populated `UpdateRequest`
//! - Classify each field through its registry restart policy and fold the
//!   decisions into a `RestartRequirement`
//! - Delegate the shared extra-configuration map to the differ
//!
//! # Design Decisions
//! - Restart decisions come back from pure classifiers as values; nothing
//!   writes restart state as a side effect of reading a field
//! - Any extra-configuration delta forces a restart: there is no way to know
//!   which arbitrary keys the guest only reads at boot

use std::str::FromStr;

use crate::model::{
    BootOptions, DesiredConfig, FlagInfo, ResourceAllocation, Shares, ToolsConfig, UpdateRequest,
};
use crate::observability::metrics;
use crate::reconcile::changes::{kind_mismatch, FieldChanges};
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::extra_config;
use crate::reconcile::restart::{self, Classified, RestartRequirement};
use crate::registry::{keys, AllocationKind, FieldKind, FieldRegistry, FieldValue, RestartPolicy};

/// An update request and the restart it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub request: UpdateRequest,
    pub restart: RestartRequirement,
}

impl BuildOutput {
    pub fn restart_required(&self) -> bool {
        self.restart.required()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'r> {
    registry: &'r FieldRegistry,
}

impl<'r> RequestBuilder<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self { registry }
    }

    /// Build the update request converging `previous` toward `desired`.
    pub fn build(&self, desired: &DesiredConfig, previous: &DesiredConfig) -> ReconcileResult<BuildOutput> {
        tracing::debug!(instance = %desired.label(), "Building update request");

        self.validate(desired)?;
        let changes = FieldChanges::new(self.registry, desired, previous);
        check_cpu_topology(&changes)?;

        let mut fields = FieldReader {
            changes,
            restart: RestartRequirement::new(),
        };

        let request = UpdateRequest {
            name: fields.string(keys::NAME)?,
            guest_id: fields.string(keys::GUEST_ID)?,
            alternate_guest_name: fields.string(keys::ALTERNATE_GUEST_NAME)?,
            annotation: fields.string(keys::ANNOTATION)?,
            tools: ToolsConfig {
                sync_time_with_host: fields.bool(keys::SYNC_TIME_WITH_HOST)?,
                after_power_on: fields.bool(keys::RUN_TOOLS_SCRIPTS_AFTER_POWER_ON)?,
                after_resume: fields.bool(keys::RUN_TOOLS_SCRIPTS_AFTER_RESUME)?,
                before_guest_standby: fields.bool(keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_STANDBY)?,
                before_guest_shutdown: fields.bool(keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_SHUTDOWN)?,
                before_guest_reboot: fields.bool(keys::RUN_TOOLS_SCRIPTS_BEFORE_GUEST_REBOOT)?,
            },
            flags: FlagInfo {
                disk_uuid_enabled: fields.bool(keys::ENABLE_DISK_UUID)?,
                virtual_exec_usage: fields.enumerated(keys::HV_MODE)?,
                virtual_mmu_usage: fields.enumerated(keys::EPT_RVI_MODE)?,
                enable_logging: fields.bool(keys::ENABLE_LOGGING)?,
            },
            num_cpus: fields.int32(keys::NUM_CPUS)?,
            num_cores_per_socket: fields.int32(keys::NUM_CORES_PER_SOCKET)?,
            memory_mb: fields.int(keys::MEMORY)?,
            memory_hot_add_enabled: fields.bool(keys::MEMORY_HOT_ADD_ENABLED)?,
            cpu_hot_add_enabled: fields.bool(keys::CPU_HOT_ADD_ENABLED)?,
            cpu_hot_remove_enabled: fields.bool(keys::CPU_HOT_REMOVE_ENABLED)?,
            cpu_allocation: fields.allocation(AllocationKind::Cpu)?,
            memory_allocation: fields.allocation(AllocationKind::Memory)?,
            extra_config: fields.extra_config(),
            swap_placement: fields.enumerated(keys::SWAP_PLACEMENT_POLICY)?,
            boot_options: BootOptions {
                boot_delay: fields.int(keys::BOOT_DELAY)?,
                efi_secure_boot_enabled: fields.bool(keys::EFI_SECURE_BOOT_ENABLED)?,
                boot_retry_enabled: fields.bool(keys::BOOT_RETRY_ENABLED)?,
                boot_retry_delay: fields.int(keys::BOOT_RETRY_DELAY)?,
            },
            firmware: fields.enumerated(keys::FIRMWARE)?,
            nested_hv_enabled: fields.bool(keys::NESTED_HV_ENABLED)?,
            vpmc_enabled: fields.bool(keys::CPU_PERFORMANCE_COUNTERS_ENABLED)?,
        };

        Ok(BuildOutput {
            request,
            restart: fields.restart,
        })
    }

    /// Check every declared field against the registry and require the
    /// registry's required fields.
    pub fn validate(&self, desired: &DesiredConfig) -> ReconcileResult<()> {
        for (name, value) in desired.fields() {
            let spec = self
                .registry
                .lookup(name)
                .ok_or_else(|| ReconcileError::validation(name, "unknown configuration field"))?;
            spec.check(value)
                .map_err(|reason| ReconcileError::validation(name, reason))?;
        }

        for spec in self.registry.all_fields().filter(|s| s.required) {
            if !desired.contains(spec.name) {
                return Err(ReconcileError::validation(spec.name, "required field is not set"));
            }
        }

        Ok(())
    }
}

fn check_cpu_topology(changes: &FieldChanges<'_>) -> ReconcileResult<()> {
    let (_, cpus) = changes.int_change(keys::NUM_CPUS)?;
    let (_, cores) = changes.int_change(keys::NUM_CORES_PER_SOCKET)?;
    if cores <= 0 || cpus % cores != 0 {
        return Err(ReconcileError::Consistency(format!(
            "num_cpus {} is not evenly divisible by num_cores_per_socket {}",
            cpus, cores
        )));
    }
    Ok(())
}

/// Reads resolved field values while folding restart decisions.
struct FieldReader<'a> {
    changes: FieldChanges<'a>,
    restart: RestartRequirement,
}

impl FieldReader<'_> {
    fn classify(&self, name: &str) -> ReconcileResult<Classified<FieldValue>> {
        let spec = self.changes.spec(name)?;
        match spec.restart_policy {
            RestartPolicy::Free => Ok(Classified::free(self.changes.new_value(name)?)),
            RestartPolicy::AlwaysRestart => Ok(restart::on_change(
                self.changes.old_value(name)?,
                self.changes.new_value(name)?,
            )),
            RestartPolicy::ConditionalHotSwap => restart::conditional(&self.changes, name),
        }
    }

    fn note(&mut self, name: &str, restart_required: bool) {
        if restart_required {
            tracing::debug!(
                instance = %self.changes.desired().label(),
                field = name,
                "Resource argument requires a VM restart"
            );
            metrics::record_restart_trigger(name);
        }
        self.restart.record(name, restart_required);
    }

    fn take(&mut self, name: &str) -> ReconcileResult<FieldValue> {
        let classified = self.classify(name)?;
        self.note(name, classified.restart_required);
        Ok(classified.value)
    }

    fn bool(&mut self, name: &str) -> ReconcileResult<bool> {
        let value = self.take(name)?;
        value.as_bool().ok_or_else(|| kind_mismatch(name, FieldKind::Bool, &value))
    }

    fn int(&mut self, name: &str) -> ReconcileResult<i64> {
        let value = self.take(name)?;
        value.as_int().ok_or_else(|| kind_mismatch(name, FieldKind::Int, &value))
    }

    fn int32(&mut self, name: &str) -> ReconcileResult<i32> {
        let value = self.int(name)?;
        i32::try_from(value).map_err(|_| ReconcileError::validation(name, format!("{} is out of range", value)))
    }

    fn string(&mut self, name: &str) -> ReconcileResult<String> {
        match self.take(name)? {
            FieldValue::String(s) => Ok(s),
            other => Err(kind_mismatch(name, FieldKind::String, &other)),
        }
    }

    fn enumerated<T: FromStr>(&mut self, name: &str) -> ReconcileResult<T>
    where
        T::Err: std::fmt::Display,
    {
        let raw = self.string(name)?;
        raw.parse()
            .map_err(|e: T::Err| ReconcileError::validation(name, e.to_string()))
    }

    fn allocation(&mut self, kind: AllocationKind) -> ReconcileResult<ResourceAllocation> {
        Ok(ResourceAllocation {
            shares: Shares {
                level: self.enumerated(kind.share_level_key())?,
                count: self.int32(kind.share_count_key())?,
            },
            limit: self.int(kind.limit_key())?,
            reservation: self.int(kind.reservation_key())?,
        })
    }

    fn extra_config(&mut self) -> crate::model::ExtraConfigDelta {
        let delta = extra_config::diff(
            &self.changes.previous().extra_config,
            &self.changes.desired().extra_config,
        );
        self.note(keys::EXTRA_CONFIG, !delta.is_empty());
        delta
    }
}
